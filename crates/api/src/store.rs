//! In-memory backing store for the API.
//!
//! Users live in a [`DashMap`] keyed by id, with a second map enforcing
//! unique emails. The sound library is read-only once seeded; gift codes
//! grow as batches are issued.

use std::sync::{Mutex, PoisonError, RwLock};

use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::rngs::StdRng;
use sleepdash_core::gift_codes::{GiftCode, GiftCodeBatch};
use sleepdash_core::sounds::Sound;
use sleepdash_core::users::User;
use sleepdash_shared::AppError;
use sleepdash_shared::types::UserId;
use thiserror::Error;

/// Errors from store writes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Another user already has this email.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => Self::Conflict("User already exists".to_string()),
        }
    }
}

/// User records.
#[derive(Debug, Default)]
pub struct UserStore {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
}

impl UserStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store, skipping users whose email is already taken.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        for user in users {
            if let Err(e) = store.insert(user) {
                tracing::debug!(error = %e, "Skipping duplicate fixture user");
            }
        }
        store
    }

    /// Adds a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEmail` if the email is registered.
    /// Emails compare case-insensitively.
    pub fn insert(&self, user: User) -> Result<(), StoreError> {
        match self.emails.entry(normalize_email(&user.email)) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail(user.email)),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user);
                Ok(())
            }
        }
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }

    /// Looks up a user by email, ignoring case.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.emails.get(&normalize_email(email))?;
        self.get(id)
    }

    /// All users, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        users
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if the store has no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Catalog data: the sound library and the gift code ledger.
#[derive(Debug)]
pub struct Library {
    /// Sound library.
    pub sounds: Vec<Sound>,
    gift_codes: RwLock<Vec<GiftCode>>,
    rng: Mutex<StdRng>,
}

impl Library {
    /// A library seeded with `sounds` and `gift_codes`. New batches draw
    /// their codes from `rng`.
    #[must_use]
    pub fn new(sounds: Vec<Sound>, gift_codes: Vec<GiftCode>, rng: StdRng) -> Self {
        Self {
            sounds,
            gift_codes: RwLock::new(gift_codes),
            rng: Mutex::new(rng),
        }
    }

    /// Issued gift codes, newest batch first.
    #[must_use]
    pub fn gift_codes(&self) -> Vec<GiftCode> {
        self.gift_codes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Generates `batch` and records it ahead of earlier codes.
    pub fn issue(&self, batch: &GiftCodeBatch, today: NaiveDate) -> Vec<GiftCode> {
        let issued = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            batch.generate(&mut *rng, today)
        };
        let mut codes = self.gift_codes.write().unwrap_or_else(PoisonError::into_inner);
        let older = std::mem::replace(&mut *codes, issued.clone());
        codes.extend(older);
        issued
    }
}
