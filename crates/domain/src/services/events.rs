//! Domain event publishing.
//!
//! Events are fire-and-forget notifications emitted strictly after the
//! originating transaction has committed. Implementations live at the
//! application edge; the domain only defines the contract and payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::city::CityStatus;
use crate::models::country::CountryStatus;
use crate::models::role::GovRole;

/// Domain event discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CountryUpdated,
    CityCreated,
    CityUpdated,
    CityStatusChanged,
    InviteCreated,
    InviteAccepted,
    InviteDeclined,
    GovernorCreated,
    GovernorUpdated,
    GovernorDeleted,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::CountryUpdated => "country_updated",
            EventKind::CityCreated => "city_created",
            EventKind::CityUpdated => "city_updated",
            EventKind::CityStatusChanged => "city_status_changed",
            EventKind::InviteCreated => "invite_created",
            EventKind::InviteAccepted => "invite_accepted",
            EventKind::InviteDeclined => "invite_declined",
            EventKind::GovernorCreated => "governor_created",
            EventKind::GovernorUpdated => "governor_updated",
            EventKind::GovernorDeleted => "governor_deleted",
        };
        f.write_str(s)
    }
}

/// Payload for governor lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GovernorEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub user_id: Uuid,
    pub city_id: Uuid,
    pub role: GovRole,
    pub timestamp: DateTime<Utc>,
}

/// Payload for city lifecycle and status events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CityEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub city_id: Uuid,
    pub country_id: Uuid,
    pub status: CityStatus,
    pub timestamp: DateTime<Utc>,
}

/// Batch payload for a country status change and its cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CountryCascadeEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub country_id: Uuid,
    pub status: CountryStatus,
    /// Cities whose status or governors were affected by the cascade.
    pub affected_city_ids: Vec<Uuid>,
    pub timestamp: DateTime<Utc>,
}

/// Payload for invite lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub invite_id: Uuid,
    pub city_id: Uuid,
    pub role: GovRole,
    pub timestamp: DateTime<Utc>,
}

/// Publisher contract for domain events.
///
/// Implementations must not fail the calling operation: delivery errors are
/// logged and swallowed. `recipients` optionally narrows delivery to
/// specific user ids.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_governor(&self, event: GovernorEvent, recipients: &[Uuid]);

    async fn publish_city(&self, event: CityEvent, recipients: &[Uuid]);

    async fn publish_country(&self, event: CountryCascadeEvent);

    async fn publish_invite(&self, event: InviteEvent, recipients: &[Uuid]);
}
