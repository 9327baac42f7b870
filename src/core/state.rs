use chrono::Utc;

/// In-memory state carried between poll cycles. Reset on every restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    cursor: i64,
    last_sent: Option<String>,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_sent: None,
        }
    }

    pub fn starting_now() -> Self {
        Self::new(Utc::now().timestamp())
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn advance_cursor(&mut self, current_date: i64) {
        if current_date != self.cursor {
            tracing::debug!(from = self.cursor, to = current_date, "Advancing poll cursor");
        }
        self.cursor = current_date;
    }

    #[allow(dead_code)]
    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }

    pub fn is_duplicate(&self, message: &str) -> bool {
        self.last_sent.as_deref() == Some(message)
    }

    pub fn record_sent(&mut self, message: String) {
        self.last_sent = Some(message);
    }
}
