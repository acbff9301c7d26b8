//! Authentication for the Bouquet Bar storefront.
//!
//! Form validation for sign-up, sign-in and password recovery, parsing of the
//! auth API's error bodies, one-time passcodes, and the signed-in session
//! persisted through `bloom-cache`.

mod error;
mod forms;
mod otp;
mod server;
mod session;
mod user;

pub use error::AuthError;
pub use forms::{
    ForgotPasswordForm, ResetPasswordForm, SignInForm, SignUpForm, SignUpRequest,
    DEFAULT_COUNTRY_CODE, FORM_FIELD, MIN_PASSWORD_LEN,
};
pub use otp::{OtpChallenge, MAX_OTP_ATTEMPTS, OTP_LENGTH, OTP_TTL_SECS, RESEND_COOLDOWN_SECS};
pub use server::parse_server_error;
pub use session::{AuthSession, AuthStore};
pub use user::{AuthResponse, User};
