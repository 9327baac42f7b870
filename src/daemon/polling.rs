use crate::core::error::BotError;
use crate::core::notifications::{send_message, Notifier};
use crate::core::state::PollState;
use crate::core::validation::{check_response, is_truthy, parse_status};
use crate::providers::HomeworkSource;
use std::time::Duration;

/// What a single poll cycle ended with.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A new message was delivered.
    Notified(String),
    /// The message equals the last one sent; nothing was delivered.
    Unchanged,
    /// The API answered with an empty homework list.
    NoUpdates,
    /// The API answered with a falsy body; the cursor was left alone.
    EmptyResponse,
    Failed(BotError),
}

pub struct PollingLoop {
    source: Box<dyn HomeworkSource>,
    notifier: Box<dyn Notifier>,
    interval: Duration,
    state: PollState,
}

impl PollingLoop {
    pub fn new(
        source: Box<dyn HomeworkSource>,
        notifier: Box<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        Self::with_state(source, notifier, interval, PollState::starting_now())
    }

    pub fn with_state(
        source: Box<dyn HomeworkSource>,
        notifier: Box<dyn Notifier>,
        interval: Duration,
        state: PollState,
    ) -> Self {
        Self {
            source,
            notifier,
            interval,
            state,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Polls forever with a fixed sleep between cycles.
    pub async fn run(mut self) {
        tracing::info!(
            source = self.source.name(),
            notifier = self.notifier.name(),
            cursor = self.state.cursor(),
            "Polling loop started (interval: {:?})",
            self.interval
        );

        loop {
            match self.poll_once().await {
                CycleOutcome::Notified(message) => {
                    tracing::debug!(%message, "Notification delivered");
                }
                CycleOutcome::Failed(error) => {
                    tracing::debug!(kind = error.kind(), "Cycle failed, retrying after sleep");
                }
                CycleOutcome::Unchanged | CycleOutcome::NoUpdates | CycleOutcome::EmptyResponse => {}
            }
            tracing::info!("Sleeping for {} seconds...", self.interval.as_secs());
            tokio::time::sleep(self.interval).await;
        }
    }

    pub async fn poll_once(&mut self) -> CycleOutcome {
        match self.try_poll().await {
            Ok(outcome) => outcome,
            Err(BotError::EmptyHomeworks) => {
                tracing::info!(cursor = self.state.cursor(), "No homework updates");
                CycleOutcome::NoUpdates
            }
            Err(error) => self.report_failure(error).await,
        }
    }

    async fn try_poll(&mut self) -> Result<CycleOutcome, BotError> {
        let response = self.source.get_api_answer(self.state.cursor()).await?;

        if !is_truthy(&response) {
            tracing::warn!(cursor = self.state.cursor(), "API returned an empty answer");
            return Ok(CycleOutcome::EmptyResponse);
        }

        let checked = check_response(&response)?;
        let report = parse_status(checked.homework)?;
        tracing::info!(?report, "Homework update received");

        let outcome = self.deliver(report.message()).await?;
        self.state.advance_cursor(checked.current_date);
        Ok(outcome)
    }

    async fn deliver(&mut self, message: String) -> Result<CycleOutcome, BotError> {
        if self.state.is_duplicate(&message) {
            tracing::debug!("Message unchanged since last notification, skipping");
            return Ok(CycleOutcome::Unchanged);
        }

        send_message(self.notifier.as_ref(), &message).await?;
        self.state.record_sent(message.clone());
        Ok(CycleOutcome::Notified(message))
    }

    async fn report_failure(&mut self, error: BotError) -> CycleOutcome {
        let message = format!("Сбой в работе программы: {error}");
        tracing::error!(kind = error.kind(), error = %error, "Poll cycle failed");

        if error.is_reportable() {
            if let Err(e) = self.deliver(message).await {
                tracing::warn!(error = %e, "Failed to report poll failure");
            }
        }

        CycleOutcome::Failed(error)
    }
}
