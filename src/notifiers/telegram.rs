use crate::core::error::BotError;
use crate::core::notifications::Notifier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Sends messages to one fixed chat through the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        )
    }

    fn delivery_error(&self, reason: impl Into<String>) -> BotError {
        BotError::MessageDelivery {
            chat_id: self.chat_id.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "Telegram"
    }

    async fn send(&self, text: &str) -> Result<(), BotError> {
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        // The request URL embeds the bot token, so it is stripped from errors.
        let response = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.delivery_error(e.without_url().to_string()))?;

        let status = response.status();
        let reply = response.json::<BotApiResponse>().await.ok();

        match reply {
            Some(reply) if status.is_success() && reply.ok => Ok(()),
            Some(BotApiResponse {
                description: Some(description),
                ..
            }) => Err(self.delivery_error(description)),
            _ => Err(self.delivery_error(format!("Bot API returned status {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_send_message_url() {
        let notifier = TelegramNotifier::new("https://api.telegram.org/", "123:abc", "42");
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[tokio::test]
    async fn test_send_posts_chat_and_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"chat_id": "42", "text": "Привет"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {}}"#)
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(server.url(), "123:abc", "42");
        notifier.send("Привет").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bot_api_rejection_is_delivery_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#,
            )
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(server.url(), "123:abc", "42");
        let err = notifier.send("hello").await.unwrap_err();

        match err {
            BotError::MessageDelivery { chat_id, reason } => {
                assert_eq!(chat_id, "42");
                assert_eq!(reason, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {other}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ok_false_is_delivery_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(200)
            .with_body(r#"{"ok": false}"#)
            .create_async()
            .await;

        let notifier = TelegramNotifier::new(server.url(), "123:abc", "42");
        let err = notifier.send("hello").await.unwrap_err();

        assert!(
            matches!(err, BotError::MessageDelivery { ref reason, .. } if reason.contains("200"))
        );
    }

    #[tokio::test]
    async fn test_unreachable_api_hides_token() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let notifier = TelegramNotifier::new(format!("http://{addr}"), "123:secret", "42");
        let err = notifier.send("hello").await.unwrap_err();

        assert!(matches!(err, BotError::MessageDelivery { .. }));
        assert!(!err.to_string().contains("secret"));
    }
}
