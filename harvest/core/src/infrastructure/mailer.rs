// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Mail Delivery Adapters - Anti-Corruption Layer Implementations
//
// - InMemoryMailer: records messages instead of sending them (tests, previews)
// - HttpMailRelay: POSTs messages as JSON to an HTTP mail relay

use crate::domain::notification::{EmailMessage, Mailer, MailerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone, Default)]
pub struct InMemoryMailer {
    delivered: Arc<Mutex<Vec<EmailMessage>>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first
    pub fn deliveries(&self) -> Vec<EmailMessage> {
        self.delivered
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn deliver(&self, message: &EmailMessage) -> Result<(), MailerError> {
        debug!(to = ?message.to, subject = %message.subject, "Capturing message in memory");
        self.delivered
            .lock()
            .map_err(|_| MailerError::Relay("Mutex poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    cc: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    headers: RelayHeaders<'a>,
}

#[derive(Serialize)]
struct RelayHeaders<'a> {
    #[serde(rename = "Content-Language")]
    content_language: &'a str,
}

#[derive(Deserialize)]
struct RelayResponse {
    #[serde(default)]
    id: Option<String>,
}

pub struct HttpMailRelay {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailRelay {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailerError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailRelay {
    async fn deliver(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let request = RelayRequest {
            from: &message.from,
            to: &message.to,
            cc: (!message.cc.is_empty()).then_some(message.cc.as_slice()),
            reply_to: message.reply_to.as_deref(),
            subject: &message.subject,
            text: &message.text_body,
            html: message.html_body.as_deref(),
            headers: RelayHeaders {
                content_language: &message.locale,
            },
        };

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| MailerError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status == 401 || status == 403 {
                MailerError::Authentication(error_text)
            } else if status == 400 || status == 422 {
                MailerError::Rejected(error_text)
            } else {
                MailerError::Relay(format!("HTTP {}: {}", status, error_text))
            });
        }

        let relay_response: RelayResponse = response.json().await.unwrap_or(RelayResponse { id: None });
        info!(
            to = ?message.to,
            relay_id = relay_response.id.as_deref().unwrap_or("-"),
            "Message accepted by mail relay"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            from: "no-reply@harvest.example".to_string(),
            to: vec!["farm@example.com".to_string()],
            cc: vec!["hub@example.com".to_string()],
            reply_to: Some("hub@example.com".to_string()),
            subject: "[Harvest] Order cycle report for Green Farm".to_string(),
            text_body: "Dear Green Farm".to_string(),
            html_body: None,
            locale: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_mailer_records_messages() {
        let mailer = InMemoryMailer::new();
        mailer.deliver(&message()).await.unwrap();
        mailer.deliver(&message()).await.unwrap();
        assert_eq!(mailer.deliveries().len(), 2);
    }

    #[tokio::test]
    async fn test_http_relay_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("authorization", "Bearer secret-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "to": ["farm@example.com"],
                "cc": ["hub@example.com"],
                "reply_to": "hub@example.com",
                "headers": { "Content-Language": "en" }
            })))
            .with_status(202)
            .with_body(r#"{"id":"msg-1"}"#)
            .create_async()
            .await;

        let relay = HttpMailRelay::new(
            format!("{}/v1/messages", server.url()),
            Some("secret-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        relay.deliver(&message()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_relay_maps_errors() {
        let mut server = mockito::Server::new_async().await;
        let _unauthorised = server
            .mock("POST", "/denied")
            .with_status(401)
            .with_body("bad key")
            .create_async()
            .await;
        let _unavailable = server
            .mock("POST", "/down")
            .with_status(503)
            .create_async()
            .await;

        let denied = HttpMailRelay::new(format!("{}/denied", server.url()), None, Duration::from_secs(5)).unwrap();
        assert!(matches!(denied.deliver(&message()).await, Err(MailerError::Authentication(_))));

        let down = HttpMailRelay::new(format!("{}/down", server.url()), None, Duration::from_secs(5)).unwrap();
        assert!(matches!(down.deliver(&message()).await, Err(MailerError::Relay(_))));
    }
}
