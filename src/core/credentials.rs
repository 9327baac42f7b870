use crate::core::error::BotError;
use std::fmt;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Secrets the bot cannot start without.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    /// Reads the three secrets from the process environment, after loading
    /// `.env` from the working directory when present.
    pub fn from_env() -> Result<Self, BotError> {
        load_dotenv();
        Self::check_tokens(env_lookup)
    }

    /// Collects every secret through `lookup`; empty values count as missing
    /// and all missing names are reported together.
    pub fn check_tokens<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut fetch = |name: &'static str| match lookup(name).filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let practicum_token = fetch(PRACTICUM_TOKEN);
        let telegram_token = fetch(TELEGRAM_TOKEN);
        let telegram_chat_id = fetch(TELEGRAM_CHAT_ID);

        if !missing.is_empty() {
            tracing::error!(missing = ?missing, "Required credentials not found");
            return Err(BotError::MissingCredentials(missing));
        }

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        })
    }
}

/// Only the API token, for commands that never talk to Telegram.
pub fn practicum_token_from_env() -> Result<String, BotError> {
    load_dotenv();
    env_lookup(PRACTICUM_TOKEN)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BotError::MissingCredentials(vec![PRACTICUM_TOKEN]))
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(?path, "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
