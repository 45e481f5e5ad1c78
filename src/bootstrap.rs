//! Engine startup rejection classification
//!
//! The engine's init promise can reject during a perfectly normal start:
//! it uses its exception channel as a non-local exit while handing control
//! to the browser's frame loop. That rejection carries a documented message
//! prefix and must be swallowed. Any other rejection is a real failure and
//! is surfaced to the page unchanged.

use crate::consts::BENIGN_STARTUP_PREFIX;

/// Outcome of classifying an init rejection message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupRejection {
    /// Expected non-local exit during a normal start; treated as success
    BenignControlFlow,
    /// Genuine failure; re-raised to the page's unhandled-error channel
    Fatal,
}

/// Classify an init rejection by its message string.
///
/// The prefix match is fragile by nature (the engine offers only an untyped
/// error channel), so this function is the one place it is allowed to live.
pub fn classify_rejection(message: &str) -> StartupRejection {
    if message.starts_with(BENIGN_STARTUP_PREFIX) {
        StartupRejection::BenignControlFlow
    } else {
        StartupRejection::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_sentinel_is_benign() {
        assert_eq!(
            classify_rejection(BENIGN_STARTUP_PREFIX),
            StartupRejection::BenignControlFlow
        );
    }

    #[test]
    fn sentinel_with_trailing_detail_is_benign() {
        let message = format!("{BENIGN_STARTUP_PREFIX} (frame handoff)");
        assert_eq!(
            classify_rejection(&message),
            StartupRejection::BenignControlFlow
        );
    }

    #[test]
    fn other_messages_are_fatal() {
        assert_eq!(
            classify_rejection("RuntimeError: unreachable executed"),
            StartupRejection::Fatal
        );
        assert_eq!(classify_rejection(""), StartupRejection::Fatal);
    }

    #[test]
    fn truncated_sentinel_is_fatal() {
        let truncated = &BENIGN_STARTUP_PREFIX[..BENIGN_STARTUP_PREFIX.len() - 1];
        assert_eq!(classify_rejection(truncated), StartupRejection::Fatal);
    }

    proptest! {
        /// Any suffix appended to the sentinel stays benign.
        #[test]
        fn prefix_plus_any_suffix_is_benign(suffix in ".*") {
            let message = format!("{BENIGN_STARTUP_PREFIX}{suffix}");
            prop_assert_eq!(
                classify_rejection(&message),
                StartupRejection::BenignControlFlow
            );
        }

        /// Any message that does not start with the sentinel is fatal.
        #[test]
        fn non_prefixed_messages_are_fatal(message in ".*") {
            prop_assume!(!message.starts_with(BENIGN_STARTUP_PREFIX));
            prop_assert_eq!(classify_rejection(&message), StartupRejection::Fatal);
        }
    }
}
