//! Common test utilities for integration tests.
//!
//! ```ignore
//! let mut formula = FormulaBuilder::new().closers("+-").active().build();
//! type_str(&mut formula, "1+2");
//! ```

pub mod mocks;

pub use mocks::*;

use formula::config::FormulaConfig;
use formula::formula::{Formula, KeyOutcome};
use formula::input::KeyCombo;
use formula::models::{FieldMap, FieldNode};

/// Type every character of `text` as a separate key press.
pub fn type_str(formula: &mut Formula, text: &str) -> Vec<KeyOutcome> {
    text.chars()
        .map(|c| formula.handle_key(KeyCombo::char(c)))
        .collect()
}

/// Display text of every committed token.
pub fn token_texts(formula: &Formula) -> Vec<String> {
    formula
        .tokens()
        .iter()
        .map(|token| token.display().to_string())
        .collect()
}

/// Field tree three levels deep:
///
/// ```text
/// customer            Customer
///   address           Customer > Address
///     city            Customer > Address > City
///   orders (lazy)     Customer > Orders
/// total               Total
/// ```
pub fn sample_fields() -> FieldMap {
    let mut address = FieldMap::new();
    address.insert("city".to_string(), FieldNode::leaf("City"));

    let mut customer = FieldMap::new();
    customer.insert("address".to_string(), FieldNode::branch("Address", address));
    customer.insert(
        "orders".to_string(),
        FieldNode::lazy("Orders").with_custom_data("orders"),
    );

    let mut fields = FieldMap::new();
    fields.insert("customer".to_string(), FieldNode::branch("Customer", customer));
    fields.insert("total".to_string(), FieldNode::leaf("Total"));
    fields
}

/// Builder for formula instances under test.
#[derive(Default)]
pub struct FormulaBuilder {
    config: FormulaConfig,
    active: bool,
}

impl FormulaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separators(mut self, separators: &[&str]) -> Self {
        self.config = self.config.with_separators(separators.iter().copied());
        self
    }

    pub fn closers(mut self, closers: &str) -> Self {
        self.config = self.config.with_closers(closers);
        self
    }

    pub fn fields(mut self, fields: FieldMap) -> Self {
        self.config = self.config.with_custom_fields(fields);
        self
    }

    pub fn config(mut self, f: impl FnOnce(FormulaConfig) -> FormulaConfig) -> Self {
        self.config = f(self.config);
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn build(self) -> Formula {
        let mut formula = Formula::new(self.config).expect("valid test config");
        if self.active {
            formula.activate();
        }
        formula
    }
}
