//! One-time passcodes for phone/email verification.

use crate::AuthError;
use serde::{Deserialize, Serialize};

/// Digits in a code.
pub const OTP_LENGTH: usize = 6;
/// Code lifetime.
pub const OTP_TTL_SECS: i64 = 10 * 60;
/// Wrong guesses allowed per code.
pub const MAX_OTP_ATTEMPTS: u32 = 5;
/// Minimum gap between sends.
pub const RESEND_COOLDOWN_SECS: i64 = 30;

/// An issued code and its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpChallenge {
    /// Phone number or email the code was sent to.
    pub destination: String,
    code: String,
    pub issued_at: i64,
    pub expires_at: i64,
    pub attempts: u32,
    pub verified: bool,
}

impl OtpChallenge {
    /// Issue a fresh random code at `now` (Unix seconds).
    pub fn issue(destination: impl Into<String>, now: i64) -> Self {
        Self::with_code(destination, generate_code(), now)
    }

    /// Issue a known code. Used when the code comes from elsewhere.
    pub fn with_code(destination: impl Into<String>, code: impl Into<String>, now: i64) -> Self {
        Self {
            destination: destination.into(),
            code: code.into(),
            issued_at: now,
            expires_at: now + OTP_TTL_SECS,
            attempts: 0,
            verified: false,
        }
    }

    /// The code to deliver.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    pub fn remaining_attempts(&self) -> u32 {
        MAX_OTP_ATTEMPTS.saturating_sub(self.attempts)
    }

    /// Check a typed code. Spaces and dashes in the input are ignored.
    pub fn verify(&mut self, input: &str, now: i64) -> Result<(), AuthError> {
        if self.verified {
            return Ok(());
        }
        if self.remaining_attempts() == 0 {
            return Err(AuthError::OtpAttemptsExceeded);
        }
        if self.is_expired(now) {
            return Err(AuthError::OtpExpired);
        }

        let typed: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        if typed.len() == OTP_LENGTH && constant_time_eq(typed.as_bytes(), self.code.as_bytes())
        {
            self.verified = true;
            tracing::debug!(destination = %self.destination, "otp verified");
            return Ok(());
        }

        self.attempts += 1;
        tracing::debug!(
            destination = %self.destination,
            attempts = self.attempts,
            "otp mismatch"
        );
        match self.remaining_attempts() {
            0 => Err(AuthError::OtpAttemptsExceeded),
            remaining => Err(AuthError::OtpMismatch { remaining }),
        }
    }

    /// Seconds until another code may be sent.
    pub fn resend_wait(&self, now: i64) -> i64 {
        (self.issued_at + RESEND_COOLDOWN_SECS - now).max(0)
    }

    /// Replace the code, resetting lifetime and attempts.
    pub fn resend(&mut self, now: i64) -> Result<(), AuthError> {
        let wait_secs = self.resend_wait(now);
        if wait_secs > 0 {
            return Err(AuthError::ResendTooSoon { wait_secs });
        }
        *self = Self::issue(std::mem::take(&mut self.destination), now);
        Ok(())
    }
}

fn generate_code() -> String {
    use rand::Rng;

    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_issue_generates_six_digits() {
        let challenge = OtpChallenge::issue("+919876543210", NOW);
        assert_eq!(challenge.code().len(), OTP_LENGTH);
        assert!(challenge.code().chars().all(|c| c.is_ascii_digit()));
        assert_eq!(challenge.expires_at, NOW + 600);
    }

    #[test]
    fn test_verify_success_ignores_spacing() {
        let mut challenge = OtpChallenge::with_code("a@b.co", "123456", NOW);
        challenge.verify("123 456", NOW + 5).unwrap();
        assert!(challenge.verified);
    }

    #[test]
    fn test_verify_expired() {
        let mut challenge = OtpChallenge::with_code("a@b.co", "123456", NOW);
        assert!(matches!(
            challenge.verify("123456", NOW + OTP_TTL_SECS),
            Err(AuthError::OtpExpired)
        ));
    }

    #[test]
    fn test_attempts_run_out() {
        let mut challenge = OtpChallenge::with_code("a@b.co", "123456", NOW);
        for remaining in (1..MAX_OTP_ATTEMPTS).rev() {
            match challenge.verify("000000", NOW) {
                Err(AuthError::OtpMismatch { remaining: r }) => assert_eq!(r, remaining),
                other => panic!("unexpected: {:?}", other),
            }
        }
        assert!(matches!(
            challenge.verify("000000", NOW),
            Err(AuthError::OtpAttemptsExceeded)
        ));
        assert!(matches!(
            challenge.verify("123456", NOW),
            Err(AuthError::OtpAttemptsExceeded)
        ));
    }

    #[test]
    fn test_resend_cooldown() {
        let mut challenge = OtpChallenge::with_code("a@b.co", "123456", NOW);
        challenge.verify("000000", NOW).unwrap_err();

        match challenge.resend(NOW + 10) {
            Err(AuthError::ResendTooSoon { wait_secs }) => assert_eq!(wait_secs, 20),
            other => panic!("unexpected: {:?}", other),
        }

        challenge.resend(NOW + RESEND_COOLDOWN_SECS).unwrap();
        assert_eq!(challenge.attempts, 0);
        assert_eq!(challenge.destination, "a@b.co");
        assert_eq!(challenge.issued_at, NOW + RESEND_COOLDOWN_SECS);
    }
}
