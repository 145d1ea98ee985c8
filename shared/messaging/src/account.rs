//! Login and registration payloads with their local validation rules.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::{ModelError, Result};

pub const MIN_PASSWORD_LEN: usize = 8;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Body of `POST /login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Builds credentials, trimming the email the way the login form does.
    pub fn new(email: &str, password: impl Into<String>) -> Result<Self> {
        let credentials = Self {
            email: email.trim().to_string(),
            password: password.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(ModelError::Validation(
                "email and password are required".to_string(),
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(ModelError::Validation(
                "please enter a valid email address".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Registration {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(ModelError::Validation(
                "please fill all required fields".to_string(),
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(ModelError::Validation(
                "please enter a valid email address".to_string(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ModelError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if let Some(image) = &self.image {
            if !image.starts_with("http") {
                return Err(ModelError::Validation(
                    "image should be a valid URL".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("image", &self.image)
            .finish()
    }
}

/// Response of `POST /login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Opaque session token issued by the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}
