//! Auth form validation and request bodies.

use bloom_commerce::validate::{is_digits, is_valid_email};
use bloom_commerce::FieldErrors;
use serde::{Deserialize, Serialize};

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Country code prepended to sign-up phone numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Key for messages that belong to the whole form.
pub const FORM_FIELD: &str = "form";

/// Sign-up form as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Country code and number, e.g. `+919876543210`.
    pub phone: String,
    pub password: String,
}

impl SignUpForm {
    /// Validate and build the request body.
    ///
    /// The confirmation check runs before the length check, so a short
    /// mismatched password reports the mismatch.
    pub fn validate(&self) -> Result<SignUpRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.first_name.trim().is_empty() {
            errors.add("firstName", "First name is required");
        }
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "Please enter a valid email address");
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.add("phone", "Phone number is required");
        } else if !is_digits(phone, phone.len()) {
            errors.add("phone", "Phone number must contain digits only");
        }

        if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "Password must be at least 6 characters long");
        }

        errors.into_result()?;

        let country_code = match self.country_code.trim() {
            "" => DEFAULT_COUNTRY_CODE,
            code => code,
        };

        Ok(SignUpRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: format!("{}{}", country_code, phone),
            password: self.password.clone(),
        })
    }
}

/// Sign-in form, also the body of `POST /api/auth/signin`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.email.is_empty() || self.password.is_empty() {
            errors.add(FORM_FIELD, "Please fill in all fields");
        }
        errors.into_result()
    }
}

/// Forgot-password request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "Please enter a valid email address");
        }
        errors.into_result()
    }
}

/// Password reset with the token from the emailed link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let token = self.token.trim();
        if token.is_empty()
            || !token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.add("token", "Invalid or missing reset link");
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "Password must be at least 6 characters long");
        }
        if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }

        errors.into_result()
    }
}
