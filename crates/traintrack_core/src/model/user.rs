//! User account record.
//!
//! # Invariants
//! - `email` is stored lowercase on every write path, so equality scans
//!   give case-insensitive lookup without store support.
//! - `password` equal to [`PENDING_SETUP`] means the account cannot log in
//!   until first-login setup completes.

use super::{now_epoch_ms, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Sentinel password for invited accounts awaiting first-login setup.
pub const PENDING_SETUP: &str = "PENDING_SETUP";

/// Access role for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Trainer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Trainer => "Trainer",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "Owner" => Ok(Self::Owner),
            "Trainer" => Ok(Self::Trainer),
            other => Err(ValidationError::BadRole(other.to_string())),
        }
    }
}

/// A user account (owner or trainer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Always lowercase; login lookup relies on it.
    pub email: String,
    /// Plaintext per the source system's posture; may be [`PENDING_SETUP`].
    pub password: String,
    pub role: Role,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl User {
    /// Builds an invited trainer with the pending-setup password.
    ///
    /// # Contract
    /// - `email` is normalized to lowercase.
    /// - The account cannot authenticate until the password is replaced.
    pub fn invited_trainer(id: String, name: impl Into<String>, email: &str) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.trim().to_lowercase(),
            password: PENDING_SETUP.to_string(),
            role: Role::Trainer,
            created_at: now_epoch_ms(),
        }
    }

    /// Whether the account is still waiting for first-login setup.
    pub fn is_pending_setup(&self) -> bool {
        self.password == PENDING_SETUP
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("id", &self.id)?;
        require_non_empty("name", &self.name)?;
        require_non_empty("email", &self.email)?;
        require_non_empty("password", &self.password)?;
        Ok(())
    }
}

/// Projection of a trainer for picker-style listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerSummary {
    pub id: String,
    pub name: String,
}
