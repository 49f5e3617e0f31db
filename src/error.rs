//! Error types reported by the windowing backend.

/// A failed native call together with the operating system's description of the failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.code, .message))]
pub struct NativeError {
    /// Value of `GetLastError` (or the call's own result code) at the time of failure.
    pub code: u32,
    /// System text for `code`, empty when the system has none.
    pub message: String,
}

impl NativeError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

// Some APIs document an error through GetLastError but leave it at 0
fn describe(code: &u32, message: &str) -> String {
    match (*code, message.trim_end()) {
        (0, _) => "no system error reported".to_string(),
        (code, "") => format!("Windows Error #{code}"),
        (code, reason) => format!("Windows Error #{code}. Reason: {reason}"),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    /// No pixel format matches the traits, even after every fallback.
    #[error("[Screen #{screen}] No matching pixel format found based on traits specified")]
    NoMatchingPixelFormat { screen: u32 },

    /// The operating system refused to create or operate on a resource.
    #[error("[Screen #{screen}] {operation}: {source}")]
    Native {
        screen: u32,
        operation: &'static str,
        #[source]
        source: NativeError,
    },

    /// The operation is not allowed in the window's current state.
    #[error("[Screen #{screen}] {message}")]
    InvalidState { screen: u32, message: &'static str },

    #[error("The screen identifier on the Win32 platform must always use display number 0. Value received was {0}")]
    InvalidDisplay(u32),

    #[error("Cannot get information for screen {0} because it does not exist.")]
    NoSuchScreen(u32),

    #[error("[Screen #{screen}] Unable to change the screen settings.{reason} (code {code})")]
    DisplayChange {
        screen: u32,
        code: i32,
        reason: &'static str,
    },
}

impl WindowError {
    pub(crate) fn native(screen: u32, operation: &'static str, source: NativeError) -> Self {
        Self::Native {
            screen,
            operation,
            source,
        }
    }

    pub(crate) fn invalid_state(screen: u32, message: &'static str) -> Self {
        Self::InvalidState { screen, message }
    }
}

/// Reports an error the way every boundary of this crate does: as a warning on the log sink.
pub(crate) fn report(error: &WindowError) {
    log::warn!("Error: {error}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_error_without_code_has_no_reason() {
        let err = NativeError::new(0, "ignored");
        assert_eq!(err.to_string(), "no system error reported");
    }

    #[test]
    fn native_error_formats_code_and_reason() {
        let err = NativeError::new(5, "Access is denied.\r\n");
        assert_eq!(err.to_string(), "Windows Error #5. Reason: Access is denied.");
    }

    #[test]
    fn native_error_with_blank_message_has_no_reason() {
        let err = NativeError::new(1400, " \r\n");
        assert_eq!(err.to_string(), "Windows Error #1400");
    }

    #[test]
    fn native_error_is_the_source_of_window_error() {
        use std::error::Error;

        let err = WindowError::native(
            0,
            "Unable to share OpenGL contexts",
            NativeError::new(6, "The handle is invalid."),
        );
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("Windows Error #6. Reason: The handle is invalid.")
        );
    }

    #[test]
    fn window_error_names_the_screen() {
        let err = WindowError::native(2, "Unable to create window", NativeError::new(8, ""));
        assert_eq!(
            err.to_string(),
            "[Screen #2] Unable to create window: Windows Error #8"
        );
    }
}
