//! Persistent bearer-token session.
//!
//! All reads and writes of the token, its expiry and the cached user go
//! through [`TokenStore`]. Writing the token is reserved to the auth service
//! (`save` is crate-private); anyone holding a handle may `clear`.

use chrono::{DateTime, Duration, Utc};
use std::rc::Rc;

use crate::{
    api::User,
    config,
    utils::{
        storage::{self, SharedStore},
        time::{self, Clock, SystemClock},
    },
};

pub const TOKEN_KEY: &str = "token";
pub const EXPIRES_AT_KEY: &str = "token_expires_at";
pub const USER_KEY: &str = "user_info";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.expires_at.is_none() && self.user.is_none()
    }
}

#[derive(Clone)]
pub struct TokenStore {
    store: SharedStore,
    clock: Rc<dyn Clock>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new(store: SharedStore, clock: Rc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            ttl: Duration::hours(config::SESSION_TTL_HOURS),
        }
    }

    /// Session backed by the platform's persistent storage and wall-clock time.
    pub fn platform() -> Self {
        Self::new(storage::persistent_store(), Rc::new(SystemClock))
    }

    pub(crate) fn save(&self, token: &str, user: &User) {
        let expires_at = self.clock.now() + self.ttl;
        let user_json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("failed to serialize user snapshot: {}", err);
                String::new()
            }
        };
        for (key, value) in [
            (TOKEN_KEY, token.to_string()),
            (EXPIRES_AT_KEY, time::to_millis(expires_at).to_string()),
            (USER_KEY, user_json),
        ] {
            if let Err(err) = self.store.set(key, &value) {
                log::warn!("{}", err);
            }
        }
        log::debug!("session saved for {}, expires at {}", user.username, expires_at);
    }

    /// Replaces the cached user; token and expiry are left as they are.
    pub(crate) fn update_user(&self, user: &User) {
        if self.token().is_none() {
            return;
        }
        match serde_json::to_string(user) {
            Ok(json) => {
                if let Err(err) = self.store.set(USER_KEY, &json) {
                    log::warn!("{}", err);
                }
            }
            Err(err) => log::warn!("failed to serialize user snapshot: {}", err),
        }
    }

    pub fn read(&self) -> Session {
        Session {
            token: self.token(),
            expires_at: self
                .store
                .get(EXPIRES_AT_KEY)
                .and_then(|raw| time::from_millis(&raw)),
            user: self
                .store
                .get(USER_KEY)
                .and_then(|raw| serde_json::from_str(&raw).ok()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<User> {
        self.read().user
    }

    /// True while a token is held and has not outlived its expiry. A token
    /// that is present but expired (or has no readable expiry) is swept here,
    /// as are expiry and user entries left behind without a usable token.
    pub fn is_valid(&self) -> bool {
        let session = self.read();
        if session.token.is_none() {
            if self.has_leftovers() {
                log::info!("session has no usable token; clearing stored credentials");
                self.clear();
            }
            return false;
        }
        match session.expires_at {
            Some(expires_at) if self.clock.now() <= expires_at => true,
            _ => {
                log::info!("session expired; clearing stored credentials");
                self.clear();
                false
            }
        }
    }

    fn has_leftovers(&self) -> bool {
        [TOKEN_KEY, EXPIRES_AT_KEY, USER_KEY]
            .iter()
            .any(|key| self.store.get(key).is_some())
    }

    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(EXPIRES_AT_KEY);
        self.store.remove(USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{
        storage::{KeyValueStore, MemoryStorage},
        time::ManualClock,
    };
    use chrono::TimeZone;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".into(),
            role: "hr".into(),
            employee_id: Some(7),
            email: None,
        }
    }

    fn fixture() -> (TokenStore, MemoryStorage, ManualClock) {
        let storage = MemoryStorage::new();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap());
        let store = TokenStore::new(Rc::new(storage.clone()), Rc::new(clock.clone()));
        (store, storage, clock)
    }

    #[test]
    fn save_sets_expiry_one_ttl_ahead() {
        let (store, _, clock) = fixture();
        store.save("tok-1", &alice());
        let session = store.read();
        assert_eq!(session.token.as_deref(), Some("tok-1"));
        assert_eq!(session.expires_at, Some(clock.now() + Duration::hours(24)));
        assert_eq!(session.user, Some(alice()));
        assert!(store.is_valid());
    }

    #[test]
    fn valid_up_to_and_including_expiry_instant() {
        let (store, _, clock) = fixture();
        store.save("tok-1", &alice());
        clock.advance(Duration::hours(24));
        assert!(store.is_valid());
    }

    #[test]
    fn expired_token_is_invalid_and_swept() {
        let (store, storage, clock) = fixture();
        store.save("tok-1", &alice());
        clock.advance(Duration::hours(24) + Duration::milliseconds(1));
        assert!(store.read().token.is_some());
        assert!(!store.is_valid());
        assert!(store.read().is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn token_without_expiry_is_swept() {
        let (store, storage, _) = fixture();
        storage.set(TOKEN_KEY, "orphan").unwrap();
        assert!(!store.is_valid());
        assert!(store.read().is_empty());
    }

    #[test]
    fn blank_token_sweeps_expiry_and_user() {
        let (store, storage, _) = fixture();
        store.save("tok-1", &alice());
        storage.set(TOKEN_KEY, "").unwrap();
        assert!(!store.is_valid());
        assert!(store.read().is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn expiry_without_token_is_swept() {
        let (store, storage, _) = fixture();
        store.save("tok-1", &alice());
        storage.remove(TOKEN_KEY);
        assert!(!store.is_valid());
        assert!(storage.is_empty());
    }

    #[test]
    fn read_has_no_side_effects() {
        let (store, storage, clock) = fixture();
        store.save("tok-1", &alice());
        clock.advance(Duration::days(3));
        let _ = store.read();
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn clear_is_idempotent() {
        let (store, storage, _) = fixture();
        store.save("tok-1", &alice());
        store.clear();
        store.clear();
        assert!(storage.is_empty());
        assert!(!store.is_valid());
    }

    #[test]
    fn update_user_keeps_token_and_expiry() {
        let (store, _, _) = fixture();
        store.save("tok-1", &alice());
        let before = store.read();
        let renamed = User {
            username: "alice.w".into(),
            ..alice()
        };
        store.update_user(&renamed);
        let after = store.read();
        assert_eq!(after.token, before.token);
        assert_eq!(after.expires_at, before.expires_at);
        assert_eq!(after.user.map(|u| u.username), Some("alice.w".to_string()));
    }

    #[test]
    fn update_user_without_session_writes_nothing() {
        let (store, storage, _) = fixture();
        store.update_user(&alice());
        assert!(storage.is_empty());
    }
}
