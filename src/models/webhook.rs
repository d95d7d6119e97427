//! Webhook model: a URL notified whenever a station receives a reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Webhook {
    pub id: Uuid,

    pub url: String,

    pub station_id: Uuid,

    /// User who registered the webhook
    pub owner: Uuid,

    /// HMAC key for notification signatures. Only shown once, at registration.
    #[serde(skip_serializing)]
    pub secret: String,

    pub created_at: DateTime<Utc>,
}

/// Body of `POST /webhooks`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewWebhook {
    pub url: String,
    pub station_id: Uuid,
}

impl NewWebhook {
    pub fn validated(&self) -> Result<NewWebhook, ValidationError> {
        Ok(NewWebhook {
            url: validation::webhook_url(&self.url)?.to_string(),
            station_id: self.station_id,
        })
    }
}

/// Registration response: the webhook plus its signing secret.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookCreated {
    #[serde(flatten)]
    pub webhook: Webhook,
    pub secret: String,
}

impl From<Webhook> for WebhookCreated {
    fn from(webhook: Webhook) -> Self {
        let secret = webhook.secret.clone();
        Self { webhook, secret }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_webhook() -> Webhook {
        Webhook {
            id: Uuid::new_v4(),
            url: "https://hooks.example.com/in".to_string(),
            station_id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            secret: "whsec_abc".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_webhook_serialization_hides_secret() {
        let json = serde_json::to_string(&sample_webhook()).expect("Failed to serialize");
        assert!(json.contains("\"url\":\"https://hooks.example.com/in\""));
        assert!(!json.contains("whsec_abc"));
    }

    #[test]
    fn test_webhook_created_includes_secret_once() {
        let created = WebhookCreated::from(sample_webhook());
        let json = serde_json::to_string(&created).expect("Failed to serialize");
        assert_eq!(json.matches("whsec_abc").count(), 1);
        assert!(json.contains("\"station_id\""));
    }

    #[test]
    fn test_new_webhook_rejects_bad_url() {
        let hook = NewWebhook {
            url: "mailto:someone@example.com".to_string(),
            station_id: Uuid::new_v4(),
        };
        assert_eq!(hook.validated().unwrap_err(), ValidationError::Url);
    }
}
