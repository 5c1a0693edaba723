use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user as seen outside the store (no credential digest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// An identity row including its credential digest.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    pub identity: Identity,
    pub password_digest: String,
}
