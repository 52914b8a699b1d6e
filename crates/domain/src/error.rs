//! Domain error taxonomy.
//!
//! Every core operation returns a single [`DomainError`]. The string codes
//! returned by [`DomainError::code`] are part of the public contract and must
//! not be renamed; the transport layer maps [`ErrorKind`] to status codes.

use thiserror::Error;

/// Coarse error classification used for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Conflict,
    Forbidden,
    Expired,
    Internal,
}

/// Error type for all governance operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown governance role: {0}")]
    InvalidRole(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Country not found")]
    CountryNotFound,

    #[error("City not found")]
    CityNotFound,

    #[error("Invite not found")]
    InviteNotFound,

    #[error("Governor not found")]
    GovernorNotFound,

    #[error("A country with this name already exists")]
    CountryAlreadyExists,

    #[error("City slug is already taken")]
    SlugAlreadyTaken,

    #[error("Invite has already been answered")]
    InviteAlreadyAnswered,

    #[error("Invite has expired")]
    InviteExpired,

    /// Bad signature, malformed token, stale hash, or claim/record mismatch.
    /// One code for all of these so the caller cannot tell which check failed.
    #[error("Invalid invite token")]
    InvalidInviteToken,

    #[error("User already holds an active governorship")]
    UserAlreadyGovernor,

    #[error("A governor for this city and role already exists")]
    GovernorAlreadyExists,

    #[error("City is not supported")]
    CityNotSupported,

    #[error("Initiator role does not have enough rights")]
    NotEnoughRights,

    #[error("Initiator is not an active governor of this city")]
    NotCityGovernor,

    #[error("The mayor role must be reassigned before its holder can be removed")]
    CannotRefuseMayor,

    #[error("Operator access required")]
    OperatorRequired,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Token backend error: {0}")]
    Token(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// The taxonomy kind this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidRole(_) | DomainError::InvalidInput(_) => ErrorKind::InvalidInput,
            DomainError::CountryNotFound
            | DomainError::CityNotFound
            | DomainError::InviteNotFound
            | DomainError::GovernorNotFound => ErrorKind::NotFound,
            DomainError::CountryAlreadyExists
            | DomainError::SlugAlreadyTaken
            | DomainError::InviteAlreadyAnswered
            | DomainError::UserAlreadyGovernor
            | DomainError::GovernorAlreadyExists
            | DomainError::CityNotSupported => ErrorKind::Conflict,
            DomainError::InvalidInviteToken
            | DomainError::NotEnoughRights
            | DomainError::NotCityGovernor
            | DomainError::CannotRefuseMayor
            | DomainError::OperatorRequired => ErrorKind::Forbidden,
            DomainError::InviteExpired => ErrorKind::Expired,
            DomainError::Database(_) | DomainError::Token(_) | DomainError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Stable string identifier surfaced to the transport layer.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidRole(_) => "invalid_role",
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::CountryNotFound => "country_not_found",
            DomainError::CityNotFound => "city_not_found",
            DomainError::InviteNotFound => "invite_not_found",
            DomainError::GovernorNotFound => "governor_not_found",
            DomainError::CountryAlreadyExists => "country_already_exists",
            DomainError::SlugAlreadyTaken => "slug_already_taken",
            DomainError::InviteAlreadyAnswered => "invite_already_answered",
            DomainError::InviteExpired => "invite_expired",
            DomainError::InvalidInviteToken => "invalid_invite_token",
            DomainError::UserAlreadyGovernor => "user_already_governor",
            DomainError::GovernorAlreadyExists => "governor_already_exists",
            DomainError::CityNotSupported => "city_not_supported",
            DomainError::NotEnoughRights => "not_enough_rights",
            DomainError::NotCityGovernor => "not_city_governor",
            DomainError::CannotRefuseMayor => "cannot_refuse_mayor",
            DomainError::OperatorRequired => "operator_required",
            DomainError::Database(_) | DomainError::Token(_) | DomainError::Internal(_) => {
                "internal_error"
            }
        }
    }
}

impl From<shared::invite_token::InviteTokenError> for DomainError {
    fn from(err: shared::invite_token::InviteTokenError) -> Self {
        match err {
            shared::invite_token::InviteTokenError::Invalid => DomainError::InvalidInviteToken,
            shared::invite_token::InviteTokenError::Signing(msg) => DomainError::Token(msg),
        }
    }
}
