//! Registry of mounted formula inputs.
//!
//! The host owns every input, keyed by the selector it was mounted on,
//! and routes keyboard focus. Only the focused input receives keys;
//! focusing one input deactivates the others.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::FormulaConfig;
use crate::error::{FormulaError, FormulaResult};
use crate::formula::{Formula, KeyOutcome};
use crate::input::KeyCombo;

/// A keyed set of formula inputs in mount order.
#[derive(Debug, Default)]
pub struct FormulaHost {
    inputs: IndexMap<String, Formula>,
    focused: Option<String>,
}

impl FormulaHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an input from `config` and mount it on `selector`.
    ///
    /// Mounting over an existing selector replaces that input.
    pub fn mount(&mut self, selector: impl Into<String>, config: FormulaConfig) -> FormulaResult<&mut Formula> {
        let selector = selector.into();
        let formula = Formula::new(config)?;

        if let Some(previous) = self.inputs.shift_remove(&selector) {
            warn!(selector = %selector, "Replacing mounted formula input");
            previous.destroy();
            if self.focused.as_deref() == Some(selector.as_str()) {
                self.focused = None;
            }
        }

        info!(selector = %selector, "Mounted formula input");
        let entry = self.inputs.entry(selector).or_insert(formula);
        Ok(entry)
    }

    pub fn is_mounted(&self, selector: &str) -> bool {
        self.inputs.contains_key(selector)
    }

    pub fn get(&self, selector: &str) -> FormulaResult<&Formula> {
        self.inputs
            .get(selector)
            .ok_or_else(|| FormulaError::UnknownMount(selector.to_string()))
    }

    pub fn get_mut(&mut self, selector: &str) -> FormulaResult<&mut Formula> {
        self.inputs
            .get_mut(selector)
            .ok_or_else(|| FormulaError::UnknownMount(selector.to_string()))
    }

    /// Destroy the input mounted on `selector`.
    ///
    /// Returns false if nothing was mounted there.
    pub fn destroy(&mut self, selector: &str) -> bool {
        let Some(formula) = self.inputs.shift_remove(selector) else {
            debug!(selector, "Destroy of unmounted selector ignored");
            return false;
        };
        if self.focused.as_deref() == Some(selector) {
            self.focused = None;
        }
        formula.destroy();
        true
    }

    /// Selectors in mount order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    /// Mounted inputs in mount order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Formula)> {
        self.inputs.iter().map(|(id, formula)| (id.as_str(), formula))
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Activate `selector` and deactivate every other input.
    pub fn focus(&mut self, selector: &str) -> FormulaResult<()> {
        if !self.inputs.contains_key(selector) {
            return Err(FormulaError::UnknownMount(selector.to_string()));
        }
        for (id, formula) in self.inputs.iter_mut() {
            if id == selector {
                formula.activate();
            } else {
                formula.deactivate();
            }
        }
        self.focused = Some(selector.to_string());
        Ok(())
    }

    /// Deactivate every input, as a click outside all of them does.
    pub fn blur(&mut self) {
        for formula in self.inputs.values_mut() {
            formula.deactivate();
        }
        self.focused = None;
    }

    /// Move focus to the next input in mount order, wrapping around.
    pub fn cycle_focus(&mut self) -> Option<&str> {
        if self.inputs.is_empty() {
            return None;
        }
        let next = match self.focused.as_deref().and_then(|id| self.inputs.get_index_of(id)) {
            Some(index) => (index + 1) % self.inputs.len(),
            None => 0,
        };
        let selector = self.inputs.get_index(next).map(|(id, _)| id.clone())?;
        self.focus(&selector).ok()?;
        self.focused()
    }

    /// Route a key press to the focused input.
    pub fn dispatch_key(&mut self, combo: KeyCombo) -> Option<(String, KeyOutcome)> {
        let selector = self.focused.clone()?;
        let formula = self.inputs.get_mut(&selector)?;
        let outcome = formula.handle_key(combo);
        Some((selector, outcome))
    }

    /// Route pasted text to the focused input.
    pub fn dispatch_paste(&mut self, text: &str) -> Option<(String, KeyOutcome)> {
        let selector = self.focused.clone()?;
        let formula = self.inputs.get_mut(&selector)?;
        let outcome = formula.handle_paste(text);
        Some((selector, outcome))
    }
}
