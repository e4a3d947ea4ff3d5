//! User repository.

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use expensa_core::user::{NewUser, User, UserError};
use expensa_shared::types::{PageRequest, PageResponse, UserId};
use tracing::info;

/// User repository with a unique, case-insensitive email index.
#[derive(Debug, Default)]
pub struct UserRepository {
    users: DashMap<UserId, User>,
    by_email: DashMap<String, UserId>,
}

impl UserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a new user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed request and `EmailTaken` if
    /// the email is already registered.
    pub fn onboard(&self, request: NewUser) -> Result<User, UserError> {
        let user = request.validate(Utc::now())?;

        match self.by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(UserError::EmailTaken(user.email)),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
            }
        }

        info!(
            user_id = %user.id,
            roles = ?user.role_names(),
            "User onboarded"
        );
        Ok(user)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such user exists.
    pub fn get(&self, id: UserId) -> Result<User, UserError> {
        self.users
            .get(&id)
            .map(|u| u.value().clone())
            .ok_or(UserError::NotFound(id))
    }

    /// Returns true if no user has been onboarded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Lists users in onboarding order.
    #[must_use]
    pub fn list(&self, page: PageRequest) -> PageResponse<User> {
        let mut items: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        PageResponse::from_items(items, page)
    }
}
