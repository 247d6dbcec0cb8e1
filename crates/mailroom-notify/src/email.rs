// SPDX-FileCopyrightText: 2026 Mailroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound transactional email over an EmailJS-compatible REST API.
//!
//! Every send is one JSON POST carrying the service id, a template id,
//! the public key as `user_id`, the private key as `accessToken`, and a
//! flat map of template parameters. The client distinguishes a missing
//! deployment setting ([`MailroomError::NotConfigured`]) from a delivery
//! failure ([`MailroomError::Email`]); callers decide per call site
//! whether a failure is best-effort or aborts the operation.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use mailroom_config::EmailConfig;
use mailroom_core::{MailroomError, Ticket};

/// Wire payload for the send-email endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken")]
    access_token: &'a str,
    template_params: BTreeMap<&'static str, String>,
}

/// HTTP client for the configured email provider.
#[derive(Debug, Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    config: EmailConfig,
}

impl EmailClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: EmailConfig) -> Result<Self, MailroomError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MailroomError::Email {
                message: "failed to build email http client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { http, config })
    }

    /// Confirmation email to the visitor after their ticket is created.
    pub async fn send_auto_reply(&self, ticket: &Ticket) -> Result<(), MailroomError> {
        let template = self.require("email.template_auto_reply", &self.config.template_auto_reply)?;
        let mut params = BTreeMap::new();
        params.insert("to_name", ticket.name.clone());
        params.insert("to_email", ticket.email.clone());
        params.insert("message", ticket.message.clone());
        params.insert("package_type", ticket.package_type.clone());
        self.send(template, params).await
    }

    /// The admin's reply to a ticket, delivered to the original sender.
    pub async fn send_admin_reply(&self, ticket: &Ticket, reply: &str) -> Result<(), MailroomError> {
        let template =
            self.require("email.template_admin_reply", &self.config.template_admin_reply)?;
        let mut params = BTreeMap::new();
        params.insert("to_name", ticket.name.clone());
        params.insert("to_email", ticket.email.clone());
        params.insert("original_message", ticket.message.clone());
        params.insert("reply", reply.to_string());
        self.send(template, params).await
    }

    /// Heads-up to the admin inbox that a visitor posted a thread message.
    pub async fn notify_admin_thread(
        &self,
        user_session: &str,
        content: &str,
        sender_name: Option<&str>,
        sender_email: Option<&str>,
    ) -> Result<(), MailroomError> {
        let template =
            self.require("email.template_admin_notice", &self.config.template_admin_notice)?;
        let admin_email = self.require("email.admin_email", &self.config.admin_email)?;
        let mut params = BTreeMap::new();
        params.insert("to_email", admin_email.to_string());
        params.insert("user_session", user_session.to_string());
        params.insert("message", content.to_string());
        params.insert("sender_name", sender_name.unwrap_or("Anonymous").to_string());
        params.insert("sender_email", sender_email.unwrap_or("not provided").to_string());
        self.send(template, params).await
    }

    fn require<'a>(
        &self,
        key: &str,
        value: &'a Option<String>,
    ) -> Result<&'a str, MailroomError> {
        value
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| MailroomError::NotConfigured(key.to_string()))
    }

    async fn send(
        &self,
        template_id: &str,
        template_params: BTreeMap<&'static str, String>,
    ) -> Result<(), MailroomError> {
        let service_id = self.require("email.service_id", &self.config.service_id)?;
        let user_id = self.require("email.public_key", &self.config.public_key)?;
        let access_token = self.require("email.private_key", &self.config.private_key)?;

        let request = SendRequest {
            service_id,
            template_id,
            user_id,
            access_token,
            template_params,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailroomError::Email {
                message: "email request failed".to_string(),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, template_id, "email provider rejected send");
            return Err(MailroomError::Email {
                message: format!("email provider returned {status}: {body}"),
                source: None,
            });
        }
        tracing::debug!(template_id, "email dispatched");
        Ok(())
    }
}
