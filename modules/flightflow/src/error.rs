use ai_client::AiError;
use thiserror::Error;

/// Why the remote interpretation path produced nothing usable.
///
/// Never reaches callers of [`crate::Assistant`]: every variant sends the
/// utterance down the offline fallback.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("Remote model unavailable: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unusable model reply: {0}")]
    Parse(String),
}

impl InterpretError {
    pub fn kind(&self) -> &'static str {
        match self {
            InterpretError::Remote(_) => "remote",
            InterpretError::Config(_) => "config",
            InterpretError::Parse(_) => "parse",
        }
    }
}

impl From<AiError> for InterpretError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Config(msg) => InterpretError::Config(msg),
            // A chat envelope that doesn't decode is a provider problem, not a
            // bad interpretation.
            other => InterpretError::Remote(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for InterpretError {
    fn from(e: serde_json::Error) -> Self {
        InterpretError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_stays_a_config_error() {
        let err: InterpretError = AiError::Config("OPENAI_API_KEY not set".into()).into();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn transport_failures_are_remote() {
        for ai in [
            AiError::Network("connection refused".into()),
            AiError::Timeout("30s".into()),
            AiError::Api("500".into()),
            AiError::Parse("bad envelope".into()),
        ] {
            assert_eq!(InterpretError::from(ai).kind(), "remote");
        }
    }
}
