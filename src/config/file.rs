//! JSON configuration file for the terminal host.
//!
//! ```json
//! {
//!   "inputs": [
//!     {
//!       "id": "price",
//!       "closers": "+-*/()",
//!       "initial": "base * 2",
//!       "custom_fields": {
//!         "product": { "name": "Product", "children": true, "customData": "product" }
//!       }
//!     }
//!   ],
//!   "expansions": {
//!     "product": { "cost": { "name": "Cost" } }
//!   }
//! }
//! ```
//!
//! Lazy nodes are served from `expansions`, keyed by the node's string
//! `customData`, or by its dotted path when it has none.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{FormulaConfig, Lang};
use crate::error::{FormulaError, FormulaResult};
use crate::fields::{ExpandRequest, FieldExpander};
use crate::models::{FieldMap, FieldNode};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "FORMULA_CONFIG";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Inputs to mount, in display order.
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
    /// Subtrees served to lazy field nodes.
    #[serde(default)]
    pub expansions: IndexMap<String, FieldMap>,
    /// Artificial latency of lazy expansion, in milliseconds.
    #[serde(default)]
    pub expansion_delay_ms: u64,
}

/// One input of the configuration file. Unset values use the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Mount selector.
    pub id: String,
    #[serde(default)]
    pub separators: Option<Vec<String>>,
    #[serde(default)]
    pub closers: Option<String>,
    #[serde(default)]
    pub lang: Option<Lang>,
    #[serde(default)]
    pub custom_fields: Option<FieldMap>,
    /// Formula text set right after mounting.
    #[serde(default)]
    pub initial: Option<String>,
}

impl InputConfig {
    /// Build the instance configuration, sharing `expander` across inputs.
    pub fn to_formula_config(&self, expander: Arc<dyn FieldExpander>) -> FormulaConfig {
        let mut config = FormulaConfig::default().with_field_expander(expander);
        if let Some(separators) = &self.separators {
            config.separators = separators.clone();
        }
        if let Some(closers) = &self.closers {
            config.closers = closers.clone();
        }
        if let Some(lang) = &self.lang {
            config.lang = lang.clone();
        }
        config.custom_fields = self.custom_fields.clone();
        config
    }
}

impl ConfigFile {
    /// Default location: `<config_dir>/formula/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("formula").join("config.json"))
    }

    /// Pick the config path: explicit argument, then environment, then default.
    pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .or_else(Self::default_path)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> FormulaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FormulaError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| FormulaError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), inputs = config.inputs.len(), "Loaded config file");
        Ok(config)
    }

    /// Load `path` if it exists, else fall back to the demo configuration.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_demo(path: Option<&Path>) -> FormulaResult<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                debug!(path = %path.display(), "No config file, using demo configuration");
                Ok(Self::demo())
            }
            None => Ok(Self::demo()),
        }
    }

    /// Expander serving this file's `expansions`.
    pub fn expander(&self) -> StaticExpander {
        StaticExpander::new(self.expansions.clone())
            .with_delay(Duration::from_millis(self.expansion_delay_ms))
    }

    /// Built-in configuration used when no file exists.
    pub fn demo() -> Self {
        let mut address = FieldMap::new();
        address.insert("city".to_string(), FieldNode::leaf("City"));
        address.insert("zip".to_string(), FieldNode::leaf("Zip code"));

        let mut customer = FieldMap::new();
        customer.insert("name".to_string(), FieldNode::leaf("Name"));
        customer.insert("address".to_string(), FieldNode::branch("Address", address));
        customer.insert(
            "orders".to_string(),
            FieldNode::lazy("Orders").with_custom_data("orders"),
        );

        let mut fields = FieldMap::new();
        fields.insert("customer".to_string(), FieldNode::branch("Customer", customer));
        fields.insert("tax_rate".to_string(), FieldNode::leaf("Tax rate"));

        let mut orders = FieldMap::new();
        orders.insert("count".to_string(), FieldNode::leaf("Count"));
        orders.insert("total".to_string(), FieldNode::leaf("Total"));
        orders.insert(
            "last".to_string(),
            FieldNode::lazy("Last order").with_custom_data("last_order"),
        );

        let mut last_order = FieldMap::new();
        last_order.insert("amount".to_string(), FieldNode::leaf("Amount"));
        last_order.insert("date".to_string(), FieldNode::leaf("Date"));

        let mut expansions = IndexMap::new();
        expansions.insert("orders".to_string(), orders);
        expansions.insert("last_order".to_string(), last_order);

        Self {
            inputs: vec![
                InputConfig {
                    id: "total".to_string(),
                    custom_fields: Some(fields),
                    initial: Some("( 1 + tax_rate ) * 100".to_string()),
                    ..Default::default()
                },
                InputConfig {
                    id: "discount".to_string(),
                    separators: Some(vec![" ".to_string(), ",".to_string()]),
                    closers: Some("+-*/".to_string()),
                    ..Default::default()
                },
            ],
            expansions,
            expansion_delay_ms: 300,
        }
    }
}

/// Expander answering from a fixed table of subtrees.
#[derive(Debug, Clone, Default)]
pub struct StaticExpander {
    expansions: IndexMap<String, FieldMap>,
    delay: Duration,
}

impl StaticExpander {
    pub fn new(expansions: IndexMap<String, FieldMap>) -> Self {
        Self {
            expansions,
            delay: Duration::ZERO,
        }
    }

    /// Simulate a slow field source.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn lookup_key(request: &ExpandRequest) -> &str {
        match &request.custom_data {
            Some(Value::String(key)) => key,
            _ => &request.path,
        }
    }
}

#[async_trait]
impl FieldExpander for StaticExpander {
    async fn expand(&self, request: &ExpandRequest) -> FormulaResult<FieldMap> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let key = Self::lookup_key(request);
        self.expansions
            .get(key)
            .cloned()
            .ok_or_else(|| FormulaError::FieldExpansion {
                path: request.path.clone(),
                message: format!("no fields registered for '{}'", key),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "inputs": [
                    {{
                        "id": "price",
                        "separators": [" "],
                        "closers": "+-",
                        "lang": {{ "field": "Champ" }},
                        "custom_fields": {{
                            "product": {{ "name": "Product", "children": true, "customData": "product" }}
                        }},
                        "initial": "a + b"
                    }}
                ],
                "expansions": {{ "product": {{ "cost": {{ "name": "Cost" }} }} }},
                "expansion_delay_ms": 10
            }}"#
        )
        .unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.inputs.len(), 1);
        let input = &config.inputs[0];
        assert_eq!(input.id, "price");
        assert_eq!(input.initial.as_deref(), Some("a + b"));
        assert_eq!(config.expansions["product"]["cost"].name, "Cost");
        assert_eq!(config.expansion_delay_ms, 10);

        let formula_config = input.to_formula_config(Arc::new(config.expander()));
        assert_eq!(formula_config.separators, vec![" "]);
        assert_eq!(formula_config.closers, "+-");
        assert_eq!(formula_config.lang.field, "Champ");
        assert!(formula_config.custom_fields.is_some());
    }

    #[test]
    fn test_unset_values_use_defaults() {
        let input: InputConfig = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        let config = input.to_formula_config(Arc::new(StaticExpander::default()));
        assert_eq!(config.separators, vec![" ", "Enter"]);
        assert_eq!(config.closers, "+-*/()%^");
        assert_eq!(config.lang.field, "Custom Field");
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = ConfigFile::load(file.path()).unwrap_err();
        assert!(matches!(err, FormulaError::ConfigParse { .. }));
        assert_eq!(err.error_code(), "E_CONFIG_PARSE");
    }

    #[test]
    fn test_missing_file_falls_back_to_demo() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load_or_demo(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, ConfigFile::demo());
    }

    #[test]
    fn test_missing_file_is_read_error_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, FormulaError::ConfigRead { .. }));
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let explicit = PathBuf::from("/tmp/explicit.json");
        assert_eq!(
            ConfigFile::resolve_path(Some(explicit.clone())),
            Some(explicit)
        );
    }

    #[tokio::test]
    async fn test_static_expander_lookup() {
        let expander = ConfigFile::demo().expander().with_delay(Duration::ZERO);
        let request = ExpandRequest {
            node: 3,
            key: "orders".to_string(),
            path: "customer.orders".to_string(),
            label: "Customer > Orders".to_string(),
            custom_data: Some(Value::String("orders".to_string())),
        };
        let children = expander.expand(&request).await.unwrap();
        assert!(children.contains_key("count"));

        let missing = ExpandRequest {
            custom_data: None,
            ..request
        };
        let err = expander.expand(&missing).await.unwrap_err();
        assert!(err.user_message().contains("customer.orders"));
    }
}
