//! Governance role policy.
//!
//! Pure lookup tables over [`GovRole`]. Changing who may grant or manage
//! whom is an edit to these tables, not a schema migration.

use crate::models::role::GovRole;

/// Roles each grantor role may hand out via invitation.
///
/// Deputies and moderators may grant peer or lower roles; only the mayor
/// may grant the mayor role itself.
const GRANT_TABLE: [(GovRole, &[GovRole]); 3] = [
    (
        GovRole::Mayor,
        &[GovRole::Mayor, GovRole::Deputy, GovRole::Moderator],
    ),
    (GovRole::Deputy, &[GovRole::Deputy, GovRole::Moderator]),
    (GovRole::Moderator, &[GovRole::Moderator]),
];

/// Whether a city may have at most one concurrent holder of this role.
pub fn is_singleton(role: GovRole) -> bool {
    matches!(role, GovRole::Mayor)
}

/// Whether `grantor` may issue an invite for `grantee`.
pub fn can_grant(grantor: GovRole, grantee: GovRole) -> bool {
    GRANT_TABLE
        .iter()
        .find(|(role, _)| *role == grantor)
        .map(|(_, allowed)| allowed.contains(&grantee))
        .unwrap_or(false)
}

/// Authority rank; management of another governor requires a strictly
/// higher rank.
pub fn rank(role: GovRole) -> u8 {
    match role {
        GovRole::Mayor => 3,
        GovRole::Deputy => 2,
        GovRole::Moderator => 1,
    }
}

/// Whether `actor` outranks `target` (demotion, label edits).
pub fn outranks(actor: GovRole, target: GovRole) -> bool {
    rank(actor) > rank(target)
}
