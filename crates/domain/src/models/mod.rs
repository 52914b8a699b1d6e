//! Domain models for city governance.

pub mod city;
pub mod country;
pub mod governor;
pub mod invite;
pub mod role;

pub use city::{
    CityResponse, CityStatus, CreateCityRequest, ListCitiesQuery, SetCityStatusRequest,
    UpdateCityRequest,
};
pub use country::{CountryResponse, CountryStatus, CreateCountryRequest, SetCountryStatusRequest};
pub use governor::{GovernorResponse, UpdateLabelRequest};
pub use invite::{
    AcceptInviteRequest, CreateInviteRequest, CreateInviteResponse, InviteResponse, InviteStatus,
    ListInvitesQuery, DEFAULT_INVITE_TTL_HOURS, MAX_INVITE_TTL_HOURS, MIN_INVITE_TTL_HOURS,
};
pub use role::GovRole;
