//! Core services: invitation lifecycle, governance invariants, status
//! cascade, and event publisher implementations.

pub mod cascade;
pub mod events;
pub mod governance;
pub mod invites;

pub use cascade::CascadeService;
pub use events::{create_publisher, LogEventPublisher, WebhookEventPublisher};
pub use governance::GovernanceService;
pub use invites::InviteService;
