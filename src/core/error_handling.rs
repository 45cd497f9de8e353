//! Generic error handling utilities
//!
//! Errors that reach the top of the CLI are logged through
//! [`log_error_with_context`], which decides between a specific user-facing
//! message and a generic operation context.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// True if the error carries a message the user can act on directly
    /// (a missing repository directory, a malformed pattern in the config file)
    fn is_user_actionable(&self) -> bool;

    /// The message to show when the error is user-actionable
    fn user_message(&self) -> Option<String>;
}

/// Log an error with a detail level suited to its kind.
///
/// User-actionable errors print their own message; system errors print the
/// operation context. Full detail is always available at debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
