//! Anonymous, possession-based identity.
//!
//! A caller's credential is an opaque random token. Holding the poll's
//! creator token grants creator authority for that poll; any other value, or
//! none, grants respondent authority. Nothing else is consulted.

use std::sync::Arc;

use bffhang_domain::constants::TOKEN_BYTES;
use bffhang_domain::{HangError, Poll, PollSnapshot, Result, Role};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Builder;

/// Source of cryptographically secure random bytes.
pub trait TokenSource: Send + Sync {
    /// Fill `buf` completely or fail. Implementations must never substitute
    /// predictable bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsTokenSource;

impl TokenSource for OsTokenSource {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(buf).map_err(|err| {
            HangError::Security(format!("secure random source unavailable: {err}"))
        })
    }
}

/// Mints credentials and identifiers from a [`TokenSource`].
#[derive(Clone)]
pub struct TokenMinter {
    source: Arc<dyn TokenSource>,
}

impl TokenMinter {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self { source }
    }

    /// 128-bit hex credential.
    pub fn token(&self) -> Result<String> {
        let mut buf = [0u8; TOKEN_BYTES];
        self.source.fill(&mut buf)?;
        Ok(hex::encode(buf))
    }

    /// Random (v4) UUID for poll and response identifiers.
    pub fn id(&self) -> Result<String> {
        let mut buf = [0u8; 16];
        self.source.fill(&mut buf)?;
        Ok(Builder::from_random_bytes(buf).into_uuid().to_string())
    }
}

impl Default for TokenMinter {
    fn default() -> Self {
        Self::new(Arc::new(OsTokenSource))
    }
}

/// The single creator-authority predicate.
pub fn is_creator(poll: &Poll, token: Option<&str>) -> bool {
    let creator = poll.creator_token.trim();
    match token.map(str::trim) {
        Some(caller) => !creator.is_empty() && caller == creator,
        None => false,
    }
}

/// Role of the caller for this request.
pub fn resolve_role(poll: &Poll, token: Option<&str>) -> Role {
    if is_creator(poll, token) {
        Role::Creator
    } else {
        Role::Respondent
    }
}

/// Identifier and creation time a submission under `token` should be stored
/// with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSlot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// True when an earlier response from the same token is being replaced.
    pub existing: bool,
}

/// Reuse the caller's existing response slot, or mint a fresh one.
pub fn resolve_response_slot(
    snapshot: &PollSnapshot,
    token: &str,
    minter: &TokenMinter,
    now: DateTime<Utc>,
) -> Result<ResponseSlot> {
    if let Some(existing) = snapshot.response_for_token(token) {
        return Ok(ResponseSlot {
            id: existing.id.clone(),
            created_at: existing.created_at,
            existing: true,
        });
    }
    Ok(ResponseSlot { id: minter.id()?, created_at: now, existing: false })
}
