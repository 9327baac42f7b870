use crate::core::credentials::practicum_token_from_env;
use crate::core::error::BotError;
use crate::core::models::StatusReport;
use crate::core::settings::Settings;
use crate::core::validation::{check_response, parse_status};
use crate::providers::{HomeworkSource, PracticumClient};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize)]
struct StatusOutput {
    source: &'static str,
    from_date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<StatusReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    fetched_at: DateTime<Utc>,
}

pub async fn run(settings: &Settings, json: bool, days: u32) -> Result<()> {
    let token = practicum_token_from_env()?;
    let client = PracticumClient::new(settings.api.endpoint.as_str(), token);

    let from_date = Utc::now().timestamp() - i64::from(days) * SECONDS_PER_DAY;
    tracing::info!(from_date, days, "Checking latest homework status");

    let output = fetch_status(&client, from_date).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_output(&output, days);
    }

    Ok(())
}

async fn fetch_status(source: &dyn HomeworkSource, from_date: i64) -> StatusOutput {
    let mut output = StatusOutput {
        source: source.name(),
        from_date,
        report: None,
        message: None,
        current_date: None,
        error: None,
        fetched_at: Utc::now(),
    };

    match latest_report(source, from_date).await {
        Ok((report, current_date)) => {
            output.message = Some(report.message());
            output.report = Some(report);
            output.current_date = Some(current_date);
        }
        Err(BotError::EmptyHomeworks) => {}
        Err(e) => output.error = Some(e.to_string()),
    }

    output
}

async fn latest_report(
    source: &dyn HomeworkSource,
    from_date: i64,
) -> Result<(StatusReport, i64), BotError> {
    let response = source.get_api_answer(from_date).await?;
    let checked = check_response(&response)?;
    let report = parse_status(checked.homework)?;
    Ok((report, checked.current_date))
}

fn print_text_output(output: &StatusOutput, days: u32) {
    println!("{}", output.source);

    if let Some(error) = &output.error {
        println!("  Error: {}", error);
        return;
    }

    match (&output.report, &output.message) {
        (Some(StatusReport::Submitted { homework_name, status }), Some(message)) => {
            println!("  {:<10} {}", "Homework:", homework_name);
            println!("  {:<10} {}", "Status:", status);
            println!("  {}", message);
        }
        (_, Some(message)) => println!("  {}", message),
        _ => println!("  No homework updates in the last {} days", days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::HomeworkStatus;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct FixedSource(Value);

    #[async_trait]
    impl HomeworkSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn get_api_answer(&self, _from_date: i64) -> Result<Value, BotError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_status_for_latest_homework() {
        let source = FixedSource(json!({
            "homeworks": [{"homework_name": "hw3", "status": "reviewing"}],
            "current_date": 2000
        }));

        let output = fetch_status(&source, 1000).await;

        assert_eq!(
            output.report,
            Some(StatusReport::Submitted {
                homework_name: "hw3".to_string(),
                status: HomeworkStatus::Reviewing,
            })
        );
        assert_eq!(
            output.message.as_deref(),
            Some("Изменился статус проверки работы \"hw3\". Работа взята на проверку ревьюером.")
        );
        assert_eq!(output.current_date, Some(2000));
        assert!(output.error.is_none());
    }

    #[tokio::test]
    async fn test_status_without_updates_is_not_an_error() {
        let source = FixedSource(json!({"homeworks": [], "current_date": 2000}));

        let output = fetch_status(&source, 1000).await;

        assert!(output.report.is_none());
        assert!(output.error.is_none());
    }

    #[tokio::test]
    async fn test_status_reports_validation_errors() {
        let source = FixedSource(json!({"current_date": 2000}));

        let output = fetch_status(&source, 1000).await;

        assert_eq!(output.error.as_deref(), Some("key `homeworks` is missing"));
        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("report").is_none());
        assert_eq!(json["from_date"], 1000);
    }
}
