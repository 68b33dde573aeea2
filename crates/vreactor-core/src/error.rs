#![forbid(unsafe_code)]

//! Error type for configuration loading and host adapters.
//!
//! The reactor's own transitions never fail; missing elements are no-ops.

/// Errors surfaced while configuring or mounting a reactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactorError {
    /// The configuration document could not be parsed or failed validation.
    Config(String),
    /// The host environment is missing something the adapter needs
    /// (window, document, body).
    Host(&'static str),
}

impl core::fmt::Display for ReactorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid reactor config: {msg}"),
            Self::Host(what) => write!(f, "host unavailable: {what}"),
        }
    }
}

impl std::error::Error for ReactorError {}

impl From<serde_json::Error> for ReactorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failure() {
        assert_eq!(
            ReactorError::Config("threshold".into()).to_string(),
            "invalid reactor config: threshold"
        );
        assert_eq!(
            ReactorError::Host("document").to_string(),
            "host unavailable: document"
        );
    }

    #[test]
    fn serde_errors_become_config_errors() {
        let err: ReactorError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(matches!(err, ReactorError::Config(_)));
    }
}
