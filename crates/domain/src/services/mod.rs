//! Domain services and contracts.

pub mod events;
pub mod role_policy;

pub use events::{
    CityEvent, CountryCascadeEvent, EventKind, EventPublisher, GovernorEvent, InviteEvent,
};
