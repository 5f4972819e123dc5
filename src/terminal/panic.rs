//! Panic hook that restores the terminal before the report is printed.

use super::setup::emergency_restore;
use std::panic;

/// Chain terminal restoration in front of the current panic hook.
///
/// Call after `color_eyre::install()` so its report is printed on the
/// restored screen.
pub fn setup_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        emergency_restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_panic_hook_does_not_panic() {
        setup_panic_hook();
        let _ = panic::take_hook();
    }
}
