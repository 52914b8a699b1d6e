//! Event publisher implementations.
//!
//! Delivery is fire-and-forget and happens strictly after the originating
//! transaction committed: failures are logged, never propagated back into
//! the operation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::services::{
    CityEvent, CountryCascadeEvent, EventPublisher, GovernorEvent, InviteEvent,
};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EventsConfig;

/// Publisher that writes events to the log. Development default.
pub struct LogEventPublisher;

#[async_trait]
impl EventPublisher for LogEventPublisher {
    async fn publish_governor(&self, event: GovernorEvent, recipients: &[Uuid]) {
        debug!(
            event = %event.kind,
            user_id = %event.user_id,
            city_id = %event.city_id,
            recipients = recipients.len(),
            "domain event"
        );
    }

    async fn publish_city(&self, event: CityEvent, recipients: &[Uuid]) {
        debug!(
            event = %event.kind,
            city_id = %event.city_id,
            status = %event.status,
            recipients = recipients.len(),
            "domain event"
        );
    }

    async fn publish_country(&self, event: CountryCascadeEvent) {
        debug!(
            event = %event.kind,
            country_id = %event.country_id,
            affected_cities = event.affected_city_ids.len(),
            "domain event"
        );
    }

    async fn publish_invite(&self, event: InviteEvent, recipients: &[Uuid]) {
        debug!(
            event = %event.kind,
            invite_id = %event.invite_id,
            city_id = %event.city_id,
            recipients = recipients.len(),
            "domain event"
        );
    }
}

/// Publisher that POSTs events to a configured webhook endpoint.
pub struct WebhookEventPublisher {
    client: Client,
    url: String,
}

impl WebhookEventPublisher {
    /// Creates a webhook publisher from configuration.
    pub fn new(config: &EventsConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("Failed to build event delivery HTTP client");

        Self {
            client,
            url: config.webhook_url.clone(),
        }
    }

    async fn deliver<T: Serialize>(&self, event: &T, recipients: &[Uuid]) {
        let payload = match serde_json::to_value(event) {
            Ok(value) => serde_json::json!({
                "event": value,
                "recipients": recipients,
            }),
            Err(err) => {
                warn!(error = %err, "Failed to encode domain event");
                return;
            }
        };

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), "Event delivery rejected");
            }
            Err(err) => {
                warn!(error = %err, "Event delivery failed");
            }
            _ => {}
        }
    }
}

#[async_trait]
impl EventPublisher for WebhookEventPublisher {
    async fn publish_governor(&self, event: GovernorEvent, recipients: &[Uuid]) {
        self.deliver(&event, recipients).await;
    }

    async fn publish_city(&self, event: CityEvent, recipients: &[Uuid]) {
        self.deliver(&event, recipients).await;
    }

    async fn publish_country(&self, event: CountryCascadeEvent) {
        self.deliver(&event, &[]).await;
    }

    async fn publish_invite(&self, event: InviteEvent, recipients: &[Uuid]) {
        self.deliver(&event, recipients).await;
    }
}

/// Builds the configured event publisher.
pub fn create_publisher(config: &EventsConfig) -> Arc<dyn EventPublisher> {
    match config.provider.as_str() {
        "webhook" => Arc::new(WebhookEventPublisher::new(config)),
        _ => Arc::new(LogEventPublisher),
    }
}
