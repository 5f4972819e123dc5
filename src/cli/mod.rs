//! Command-line interface: argument parsing, version and help output.
//!
//! ```ignore
//! use formula::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(&command) {
//!     std::process::exit(if result.is_ok() { 0 } else { 2 });
//! }
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{usage, VERSION};

use color_eyre::{eyre::eyre, Result};

/// Run a command that does not need the editor.
///
/// Returns `None` for [`CliCommand::Run`].
pub fn run_cli_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => {
            println!("formula {}", VERSION);
            Some(Ok(()))
        }
        CliCommand::Help => {
            println!("{}", usage());
            Some(Ok(()))
        }
        CliCommand::Invalid(message) => Some(Err(eyre!("{message}\n\n{}", usage()))),
        CliCommand::Run { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_returns_none() {
        assert!(run_cli_command(&CliCommand::Run { config: None }).is_none());
    }

    #[test]
    fn test_invalid_is_an_error() {
        let result = run_cli_command(&CliCommand::Invalid("bad".to_string()));
        assert!(matches!(result, Some(Err(_))));
    }
}
