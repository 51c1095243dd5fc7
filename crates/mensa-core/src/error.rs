#![forbid(unsafe_code)]

//! Error type for the preference stack.
//!
//! Nothing in the controller or renderer paths returns these to the host:
//! storage and transport failures are logged and degraded to the DOM-derived
//! defaults. Only configuration loading surfaces errors to the caller.

/// Errors produced by stores and configuration loading.
#[derive(Debug)]
pub enum PrefsError {
    /// The store rejected a write (quota, privacy mode, ...).
    StorageWrite { key: String, reason: String },
    /// Configuration JSON failed to parse.
    Config(serde_json::Error),
    /// Configuration parsed but failed validation.
    Validation(Vec<String>),
}

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageWrite { key, reason } => {
                write!(f, "failed to write storage key {key:?}: {reason}")
            }
            Self::Config(e) => write!(f, "config parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "config validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PrefsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::StorageWrite { .. } | Self::Validation(_) => None,
        }
    }
}

impl From<serde_json::Error> for PrefsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}
