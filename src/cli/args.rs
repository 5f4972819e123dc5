//! Command-line argument parsing.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the editor (default)
    Run {
        /// Explicit configuration file, overriding `FORMULA_CONFIG`
        config: Option<PathBuf>,
    },
    /// Arguments could not be parsed
    Invalid(String),
}

/// Parse command-line arguments, including the program name.
///
/// Unknown flags are ignored.
///
/// ```
/// use formula::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["formula".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut config = None;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--config" | "-c" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => return CliCommand::Invalid(format!("{} requires a path", arg)),
            },
            other => {
                if let Some(path) = other.strip_prefix("--config=") {
                    config = Some(PathBuf::from(path));
                }
            }
        }
    }

    CliCommand::Run { config }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let args: Vec<String> = std::iter::once("formula")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flags() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_help_flags() {
        assert_eq!(parse(&["--help"]), CliCommand::Help);
        assert_eq!(parse(&["-h"]), CliCommand::Help);
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliCommand::Run { config: None });
    }

    #[test]
    fn test_parse_config_path() {
        let expected = CliCommand::Run {
            config: Some(PathBuf::from("inputs.json")),
        };
        assert_eq!(parse(&["--config", "inputs.json"]), expected);
        assert_eq!(parse(&["-c", "inputs.json"]), expected);
        assert_eq!(parse(&["--config=inputs.json"]), expected);
    }

    #[test]
    fn test_parse_config_without_path() {
        assert!(matches!(parse(&["--config"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(parse(&["--unknown"]), CliCommand::Run { config: None });
    }
}
