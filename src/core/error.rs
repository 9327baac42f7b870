use reqwest::StatusCode;
use std::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Query parameters or headers attached to a failed request, rendered as
/// `key=value` pairs in error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParts(pub Vec<(String, String)>);

impl fmt::Display for RequestParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("failed to connect to API: {source} (url: {url}, headers: {headers}, params: {params})")]
    Connectivity {
        url: String,
        headers: RequestParts,
        params: RequestParts,
        #[source]
        source: BoxError,
    },

    #[error("API returned status {status} for {url}")]
    ApiStatus { url: String, status: StatusCode },

    #[error("API response is not valid JSON: {0}")]
    InvalidJson(#[source] BoxError),

    #[error("API response is not a JSON object (got {found})")]
    NotAMapping { found: &'static str },

    #[error("key `{0}` is missing")]
    MissingKey(&'static str),

    #[error("key `{key}` must be {expected}, got {found}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("homework list is empty")]
    EmptyHomeworks,

    #[error("unknown homework status: {0:?}")]
    UnknownStatus(String),

    #[error("failed to send message to chat {chat_id}: {reason}")]
    MessageDelivery { chat_id: String, reason: String },
}

impl BotError {
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::MissingCredentials(_) => "missing_credentials",
            BotError::Connectivity { .. } => "connectivity",
            BotError::ApiStatus { .. } => "api_status",
            BotError::InvalidJson(_) => "invalid_json",
            BotError::NotAMapping { .. } => "not_a_mapping",
            BotError::MissingKey(_) => "missing_key",
            BotError::WrongType { .. } => "wrong_type",
            BotError::EmptyHomeworks => "empty_homeworks",
            BotError::UnknownStatus(_) => "unknown_status",
            BotError::MessageDelivery { .. } => "message_delivery",
        }
    }

    /// Whether the failure should be reported to the chat. Delivery failures
    /// are not: the report would go through the channel that just failed.
    pub fn is_reportable(&self) -> bool {
        !matches!(
            self,
            BotError::EmptyHomeworks | BotError::MessageDelivery { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_lists_every_name() {
        let err = BotError::MissingCredentials(vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }

    #[test]
    fn test_connectivity_message_includes_request() {
        let err = BotError::Connectivity {
            url: "https://example.com/api".to_string(),
            headers: RequestParts(vec![(
                "Authorization".to_string(),
                "OAuth ***".to_string(),
            )]),
            params: RequestParts(vec![("from_date".to_string(), "1000".to_string())]),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )),
        };

        let message = err.to_string();
        assert!(message.contains("connection refused"));
        assert!(message.contains("https://example.com/api"));
        assert!(message.contains("{Authorization=OAuth ***}"));
        assert!(message.contains("{from_date=1000}"));
        assert_eq!(err.kind(), "connectivity");
    }

    #[test]
    fn test_reportable_kinds() {
        assert!(BotError::MissingKey("homeworks").is_reportable());
        assert!(BotError::UnknownStatus("lost".to_string()).is_reportable());
        assert!(!BotError::EmptyHomeworks.is_reportable());
        assert!(!BotError::MessageDelivery {
            chat_id: "1".to_string(),
            reason: "blocked".to_string(),
        }
        .is_reportable());
    }
}
