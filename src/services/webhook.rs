//! Webhook registration and delivery.
//!
//! Each new reading is POSTed to every webhook registered for its station.
//! The body is signed with the webhook's secret:
//!
//! ```text
//! X-Njordbreeze-Signature: sha256=<hex(hmac_sha256(secret, body))>
//! ```
//!
//! Delivery is best effort: failures are logged and never retried.

use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use futures::future::join_all;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::Serialize;
use sha2::Sha256;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::webhook::{NewWebhook, Webhook};
use crate::models::WeatherReading;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Njordbreeze-Signature";
pub const READING_CREATED_EVENT: &str = "reading.created";

const WEBHOOK_COLUMNS: &str = "id, url, station_id, owner, secret, created_at";

/// Generates a webhook signing secret (format: whsec_{43 chars}).
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!("whsec_{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// Computes the signature header value for `body`.
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String, hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(body);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

pub async fn create(
    pool: &PgPool,
    owner: Uuid,
    new_webhook: &NewWebhook,
) -> Result<Webhook, sqlx::Error> {
    let webhook = sqlx::query_as::<_, Webhook>(&format!(
        r#"
        INSERT INTO webhooks (url, station_id, owner, secret)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        WEBHOOK_COLUMNS
    ))
    .bind(&new_webhook.url)
    .bind(new_webhook.station_id)
    .bind(owner)
    .bind(generate_secret())
    .fetch_one(pool)
    .await?;

    tracing::info!(
        webhook_id = %webhook.id,
        station_id = %webhook.station_id,
        "Webhook registered"
    );
    Ok(webhook)
}

pub async fn list_for_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Webhook>, sqlx::Error> {
    sqlx::query_as::<_, Webhook>(&format!(
        "SELECT {} FROM webhooks WHERE owner = $1 ORDER BY created_at",
        WEBHOOK_COLUMNS
    ))
    .bind(owner)
    .fetch_all(pool)
    .await
}

pub async fn list_for_station(
    pool: &PgPool,
    station_id: Uuid,
) -> Result<Vec<Webhook>, sqlx::Error> {
    sqlx::query_as::<_, Webhook>(&format!(
        "SELECT {} FROM webhooks WHERE station_id = $1",
        WEBHOOK_COLUMNS
    ))
    .bind(station_id)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Webhook>, sqlx::Error> {
    sqlx::query_as::<_, Webhook>(&format!(
        "DELETE FROM webhooks WHERE id = $1 RETURNING {}",
        WEBHOOK_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn owner_of(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT owner FROM webhooks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Notification body sent to webhook URLs.
#[derive(Debug, Serialize)]
pub struct ReadingNotification<'a> {
    pub event: &'static str,
    pub station_id: Uuid,
    pub reading: &'a WeatherReading,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid webhook secret")]
    InvalidSecret(#[from] hmac::digest::InvalidLength),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Endpoint responded with {0}")]
    Status(reqwest::StatusCode),
}

async fn deliver(
    client: &reqwest::Client,
    webhook: &Webhook,
    body: &[u8],
    timeout: Duration,
) -> Result<(), DeliveryError> {
    let signature = sign_payload(&webhook.secret, body)?;
    let response = client
        .post(&webhook.url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .header(SIGNATURE_HEADER, signature)
        .timeout(timeout)
        .body(body.to_vec())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DeliveryError::Status(status));
    }
    Ok(())
}

/// Sends `reading` to every webhook registered for its station.
///
/// Returns the number of successful deliveries.
pub async fn notify_webhooks(
    pool: &PgPool,
    client: &reqwest::Client,
    reading: &WeatherReading,
    timeout: Duration,
) -> usize {
    match list_for_station(pool, reading.station_id).await {
        Ok(webhooks) => deliver_all(client, &webhooks, reading, timeout).await,
        Err(e) => {
            tracing::warn!(
                station_id = %reading.station_id,
                "Failed to load webhooks: {}", e
            );
            0
        }
    }
}

/// Delivers `reading` to `webhooks` concurrently. Returns how many succeeded.
pub async fn deliver_all(
    client: &reqwest::Client,
    webhooks: &[Webhook],
    reading: &WeatherReading,
    timeout: Duration,
) -> usize {
    if webhooks.is_empty() {
        return 0;
    }

    let notification = ReadingNotification {
        event: READING_CREATED_EVENT,
        station_id: reading.station_id,
        reading,
    };
    let body = match serde_json::to_vec(&notification) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to serialize webhook payload: {}", e);
            return 0;
        }
    };

    let results = join_all(
        webhooks
            .iter()
            .map(|webhook| deliver(client, webhook, &body, timeout)),
    )
    .await;

    let mut delivered = 0;
    for (webhook, result) in webhooks.iter().zip(results) {
        match result {
            Ok(()) => delivered += 1,
            Err(e) => tracing::warn!(
                webhook_id = %webhook.id,
                url = %webhook.url,
                "Webhook delivery failed: {}", e
            ),
        }
    }
    tracing::debug!(
        station_id = %reading.station_id,
        delivered,
        total = webhooks.len(),
        "Webhook notifications sent"
    );
    delivered
}
