//! Test doubles on top of `formula::adapters::mock`.

pub use formula::adapters::mock::InMemoryClipboard;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use formula::error::{FormulaError, FormulaResult};
use formula::fields::{ExpandRequest, FieldExpander};
use formula::models::{FieldMap, FieldNode};

/// Expander that records every request and answers with fixed leaves.
///
/// Set `fail_next` to make the next call fail.
#[derive(Clone, Default)]
pub struct RecordingExpander {
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ExpandRequest>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl RecordingExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ExpandRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }
}

#[async_trait]
impl FieldExpander for RecordingExpander {
    async fn expand(&self, request: &ExpandRequest) -> FormulaResult<FieldMap> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(FormulaError::FieldExpansion {
                path: request.path.clone(),
                message: "backend unavailable".to_string(),
            });
        }

        let mut fields = FieldMap::new();
        fields.insert("first".to_string(), FieldNode::leaf("First"));
        fields.insert("last".to_string(), FieldNode::leaf("Last"));
        Ok(fields)
    }
}
