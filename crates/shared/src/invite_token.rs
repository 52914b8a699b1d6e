//! Invite token codec using HS256 signing.
//!
//! Issues and verifies the signed bearer tokens that accompany invitations.
//! The symmetric secret is loaded once at process start; the codec is
//! read-only afterwards and safe for unsynchronized concurrent reads.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for invite token operations.
#[derive(Debug, Error)]
pub enum InviteTokenError {
    /// Bad signature, malformed structure, or claim-level expiry.
    ///
    /// Collapsed into a single variant so a caller cannot learn which
    /// specific check failed.
    #[error("Invalid invite token")]
    Invalid,

    #[error("Failed to sign invite token: {0}")]
    Signing(String),
}

/// Claims carried by an invite token.
///
/// The claims mirror exactly one persisted invite: `sub` is the invite id,
/// `cid` the city id, `role` the offered role, `exp` the unix expiry copied
/// from the invite record at issue time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteClaims {
    pub sub: Uuid,
    pub cid: Uuid,
    pub role: String,
    pub exp: i64,
}

impl InviteClaims {
    /// The invite record this token refers to.
    pub fn invite_id(&self) -> Uuid {
        self.sub
    }

    /// The city the invitation targets.
    pub fn city_id(&self) -> Uuid {
        self.cid
    }

    /// Claim-level expiry as a UTC timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Codec for signing and verifying invite tokens.
///
/// Signature verification is necessary but not sufficient for redemption:
/// the referenced invite record must independently still be answerable.
#[derive(Clone)]
pub struct InviteTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for InviteTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteTokenCodec")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl InviteTokenCodec {
    /// Creates a codec from the server-held symmetric secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs the claims for one invite and returns the opaque token string.
    ///
    /// Fails only on a signing-backend error.
    pub fn issue(
        &self,
        invite_id: Uuid,
        city_id: Uuid,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, InviteTokenError> {
        let claims = InviteClaims {
            sub: invite_id,
            cid: city_id,
            role: role.to_string(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| InviteTokenError::Signing(e.to_string()))
    }

    /// Verifies a presented token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<InviteClaims, InviteTokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<InviteClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| InviteTokenError::Invalid)?;

        Ok(token_data.claims)
    }
}
