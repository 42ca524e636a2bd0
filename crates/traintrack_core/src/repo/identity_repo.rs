//! Identity operations: login check, trainer invites, owner bootstrap.
//!
//! # Responsibility
//! - Own the sole security-relevant decision point (`authenticate`).
//! - Enforce email uniqueness on invite, which the store never does.
//!
//! # Invariants
//! - Emails are normalized to lowercase on every write path, so equality
//!   scans give case-insensitive login lookup.
//! - Deny reasons (unknown user / pending setup / wrong password) are
//!   indistinguishable to the caller.
//! - The invite existence check is read-then-write with no mutual
//!   exclusion; two concurrent invites for one email can both land. Known
//!   race, carried from the source design.

use crate::model::user::{Role, TrainerSummary, User};
use crate::model::{new_prefixed_id, now_epoch_ms};
use crate::repo::{decode_all, encode, RepoError, RepoResult};
use crate::store::{Collection, Filter, RecordStore};
use log::info;
use serde::{Deserialize, Serialize};

/// Prefix for generated user identifiers.
pub const USER_ID_PREFIX: &str = "USR-";

/// Well-known seed Owner created by bootstrap.
pub const SEED_OWNER_ID: &str = "USR-OWNER";
pub const SEED_OWNER_EMAIL: &str = "admin@lms.com";
pub const SEED_OWNER_PASSWORD: &str = "12345";
const SEED_OWNER_NAME: &str = "Admin";

/// Successful login projection handed back to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// User-facing identity operations over any record store.
pub struct IdentityRepository<'s, S: RecordStore> {
    store: &'s S,
}

impl<'s, S: RecordStore> IdentityRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Validates a login attempt.
    ///
    /// # Contract
    /// - Email match is case-insensitive; password match is exact string
    ///   equality (the source system's documented posture).
    /// - Accounts with the pending-setup sentinel cannot log in.
    /// - Every failure is the same [`RepoError::Denied`].
    pub fn authenticate(&self, email: &str, password: &str) -> RepoResult<AuthenticatedUser> {
        let normalized = email.trim().to_lowercase();
        let rows = self
            .store
            .scan(Collection::Users, &[Filter::eq("email", normalized)])?;
        let users: Vec<User> = decode_all("user", rows)?;

        let Some(user) = users.into_iter().next() else {
            info!("event=login module=identity status=denied");
            return Err(RepoError::Denied);
        };

        if user.is_pending_setup() || user.password != password {
            info!("event=login module=identity status=denied");
            return Err(RepoError::Denied);
        }

        info!(
            "event=login module=identity status=ok user_id={} role={}",
            user.id,
            user.role.as_str()
        );
        Ok(AuthenticatedUser {
            id: user.id,
            name: user.name,
            role: user.role,
        })
    }

    /// Invites a new trainer by email.
    ///
    /// # Contract
    /// - Fails with [`RepoError::DuplicateEmail`] and writes nothing when
    ///   any account already uses the (lowercased) email.
    /// - The created account carries the pending-setup password and cannot
    ///   authenticate until setup completes.
    pub fn invite_trainer(&self, name: &str, email: &str) -> RepoResult<User> {
        let normalized = email.trim().to_lowercase();
        let existing = self
            .store
            .scan(Collection::Users, &[Filter::eq("email", normalized.clone())])?;
        if !existing.is_empty() {
            return Err(RepoError::DuplicateEmail(normalized));
        }

        let user = User::invited_trainer(new_prefixed_id(USER_ID_PREFIX), name, &normalized);
        user.validate()?;
        self.store.put(Collection::Users, &user.id, &encode(&user)?)?;

        info!(
            "event=trainer_invited module=identity status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Lists all trainer accounts, projected to `(id, name)`.
    pub fn list_trainers(&self) -> RepoResult<Vec<TrainerSummary>> {
        let rows = self
            .store
            .scan(Collection::Users, &[Filter::eq("role", Role::Trainer.as_str())])?;
        let users: Vec<User> = decode_all("user", rows)?;
        Ok(users
            .into_iter()
            .map(|user| TrainerSummary {
                id: user.id,
                name: user.name,
            })
            .collect())
    }

    /// Idempotently creates the well-known seed Owner account.
    ///
    /// # Contract
    /// - Re-running against a seeded store is a silent no-op, never an
    ///   error and never a duplicate.
    pub fn ensure_seed_owner(&self) -> RepoResult<()> {
        if self.store.get(Collection::Users, SEED_OWNER_ID)?.is_some() {
            return Ok(());
        }

        let owner = User {
            id: SEED_OWNER_ID.to_string(),
            name: SEED_OWNER_NAME.to_string(),
            email: SEED_OWNER_EMAIL.to_string(),
            password: SEED_OWNER_PASSWORD.to_string(),
            role: Role::Owner,
            created_at: now_epoch_ms(),
        };
        self.store
            .put(Collection::Users, SEED_OWNER_ID, &encode(&owner)?)?;

        info!("event=seed_owner module=identity status=created");
        Ok(())
    }
}
