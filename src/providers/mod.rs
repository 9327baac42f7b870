mod practicum;

use crate::core::error::BotError;
use async_trait::async_trait;
use serde_json::Value;

pub use practicum::PracticumClient;

/// Source of homework review statuses.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetches the raw API answer for changes since `from_date` (Unix
    /// seconds). A `from_date` of 0 means "now".
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, BotError>;
}
