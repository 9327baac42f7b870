use crate::core::error::{BotError, RequestParts};
use crate::providers::HomeworkSource;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;

pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    fn build_request(&self, from_date: i64) -> reqwest::Result<reqwest::Request> {
        self.client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
    }

    fn connectivity_error(&self, from_date: i64, source: reqwest::Error) -> BotError {
        BotError::Connectivity {
            url: self.endpoint.clone(),
            headers: RequestParts(vec![(
                AUTHORIZATION.as_str().to_string(),
                "OAuth ***".to_string(),
            )]),
            params: RequestParts(vec![("from_date".to_string(), from_date.to_string())]),
            source: Box::new(source),
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    fn name(&self) -> &'static str {
        "Practicum"
    }

    async fn get_api_answer(&self, from_date: i64) -> Result<Value, BotError> {
        let from_date = if from_date == 0 {
            Utc::now().timestamp()
        } else {
            from_date
        };

        let request = self
            .build_request(from_date)
            .map_err(|e| self.connectivity_error(from_date, e))?;

        tracing::debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::error!(endpoint = %self.endpoint, error = %e, "Homework API unreachable");
            self.connectivity_error(from_date, e)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(endpoint = %self.endpoint, %status, "Homework API returned an error");
            return Err(BotError::ApiStatus {
                url: self.endpoint.clone(),
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BotError::InvalidJson(Box::new(e)))
    }
}
