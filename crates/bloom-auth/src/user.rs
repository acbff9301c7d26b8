//! User types.

use bloom_commerce::UserId;
use serde::{Deserialize, Serialize};

/// A signed-in customer as served by `/api/auth/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(alias = "firstname", default)]
    pub first_name: String,
    #[serde(alias = "lastname", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Loyalty points balance.
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: None,
            phone: None,
            points: None,
            created_at: None,
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// First and last name, or the email when no name is known.
    pub fn full_name(&self) -> String {
        let name = match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name.trim(), last),
            _ => self.first_name.trim().to_string(),
        };
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }

    /// Short greeting name.
    pub fn display_name(&self) -> &str {
        match self.first_name.trim() {
            "" => &self.email,
            first => first,
        }
    }
}

/// Reply of `POST /api/auth/signin` and `/api/auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}
