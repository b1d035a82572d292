//! Sign-in gate for the dashboard. Credentials live in the same key-value backend as the
//! tasks and are compared verbatim: this is a convenience gate, not a security boundary.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::storage::{load_json, save_json, KeyValueStore, StorageError, SESSION_KEY, USERS_KEY};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
struct StoredUser {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug)]
pub enum AuthError {
    Invalid(&'static str),
    EmailTaken,
    InvalidCredentials,
    Storage(StorageError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Invalid(field) => write!(f, "{field} is required"),
            AuthError::EmailTaken => write!(f, "an account with this email already exists"),
            AuthError::InvalidCredentials => write!(f, "invalid email or password"),
            AuthError::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StorageError> for AuthError {
    fn from(value: StorageError) -> Self {
        AuthError::Storage(value)
    }
}

#[derive(Clone)]
pub struct AuthService {
    current: Arc<Mutex<Option<User>>>,
    backend: Arc<dyn KeyValueStore>,
}

impl AuthService {
    /// Restores a previous session if one was saved.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let current = match load_json::<User>(backend.as_ref(), SESSION_KEY) {
            Ok(user) => user,
            Err(err) => {
                log::warn!("discarding unreadable session: {err}");
                None
            }
        };
        Self {
            current: Arc::new(Mutex::new(current)),
            backend,
        }
    }

    fn session(&self) -> MutexGuard<'_, Option<User>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_user(&self) -> Option<User> {
        self.session().clone()
    }

    /// Creates the account and signs it in.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AuthError::Invalid("name"));
        }
        if email.is_empty() {
            return Err(AuthError::Invalid("email"));
        }
        if password.is_empty() {
            return Err(AuthError::Invalid("password"));
        }

        let mut users = self.users()?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }
        users.push(StoredUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
        save_json(self.backend.as_ref(), USERS_KEY, &users)?;
        log::info!("account registered email={email}");

        let user = User {
            name: name.to_string(),
            email: email.to_string(),
        };
        self.begin_session(user.clone());
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        let user = self
            .users()?
            .into_iter()
            .find(|u| u.email == email && u.password == password)
            .map(|u| User {
                name: u.name,
                email: u.email,
            })
            .ok_or(AuthError::InvalidCredentials)?;
        self.begin_session(user.clone());
        Ok(user)
    }

    pub fn logout(&self) {
        *self.session() = None;
        if let Err(err) = self.backend.remove(SESSION_KEY) {
            log::warn!("failed to clear session: {err}");
        }
    }

    fn users(&self) -> Result<Vec<StoredUser>, AuthError> {
        Ok(load_json(self.backend.as_ref(), USERS_KEY)?.unwrap_or_default())
    }

    fn begin_session(&self, user: User) {
        if let Err(err) = save_json(self.backend.as_ref(), SESSION_KEY, &user) {
            log::warn!("failed to persist session: {err}");
        }
        *self.session() = Some(user);
    }
}
