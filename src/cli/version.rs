//! Version and usage output.

use crate::input::{FormulaCommand, KeybindingConfig};

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text printed by `--help`.
pub fn usage() -> String {
    format!(
        "formula {VERSION}\n\
         A tokenizing formula editor for the terminal.\n\n\
         USAGE:\n    formula [OPTIONS]\n\n\
         OPTIONS:\n    \
         -c, --config <PATH>    Input configuration (default: $FORMULA_CONFIG, then the user config dir)\n    \
         -h, --help             Print this help\n    \
         -V, --version          Print the version\n\n\
         KEYS:\n{}    \
         Ctrl+N               Focus the next input\n    \
         Esc                  Leave the input, then quit\n    \
         Ctrl+C               Quit",
        key_help(&KeybindingConfig::default())
    )
}

/// One line per bound command: its keys and description.
fn key_help(bindings: &KeybindingConfig) -> String {
    FormulaCommand::ALL
        .iter()
        .map(|command| {
            let keys: Vec<String> = bindings
                .combos_for(*command)
                .iter()
                .map(ToString::to_string)
                .collect();
            let scope = if command.is_field_panel_command() {
                " (field panel)"
            } else {
                ""
            };
            format!("    {:<20} {}{}\n", keys.join(" / "), command.description(), scope)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_usage_mentions_config_flag() {
        assert!(usage().contains("--config"));
    }

    #[test]
    fn test_usage_lists_bound_commands() {
        let text = usage();
        assert!(text.contains("Ctrl+V / Super+V"));
        assert!(text.contains("Paste from clipboard"));
        assert!(text.contains("Insert field (field panel)"));
        assert!(text.contains("Ctrl+F"));
    }
}
