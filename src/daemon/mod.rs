mod polling;

use crate::core::credentials::Credentials;
use crate::core::settings::Settings;
use crate::notifiers::TelegramNotifier;
use crate::providers::PracticumClient;
use anyhow::Result;

use polling::PollingLoop;

pub async fn run(settings: &Settings) -> Result<()> {
    tracing::info!("Starting homework-bot daemon");

    let credentials = Credentials::from_env()?;

    let source = PracticumClient::new(settings.api.endpoint.as_str(), credentials.practicum_token);
    let notifier = TelegramNotifier::new(
        settings.telegram.api_url.as_str(),
        credentials.telegram_token,
        credentials.telegram_chat_id,
    );

    PollingLoop::new(
        Box::new(source),
        Box::new(notifier),
        settings.api.retry_interval(),
    )
    .run()
    .await;

    Ok(())
}
