//! Error bodies returned by the auth API.

use crate::AuthError;
use bloom_commerce::FieldErrors;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Option<FieldErrors>,
    #[serde(default)]
    message: Option<String>,
}

/// Turn a failed auth response into an [`AuthError`].
///
/// `{errors:{field:msg}}` becomes field errors whose messages are joined for
/// the summary; `{message}` is used as is; any other body is shown raw, and
/// an empty body falls back to `fallback`.
pub fn parse_server_error(status: u16, body: &str, fallback: &str) -> AuthError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

    let (message, field_errors) = match parsed {
        Some(ErrorBody {
            errors: Some(errors),
            ..
        }) if !errors.is_empty() => {
            let joined = errors
                .iter()
                .map(|(_, msg)| msg)
                .collect::<Vec<_>>()
                .join(", ");
            (joined, errors)
        }
        Some(ErrorBody {
            message: Some(message),
            ..
        }) if !message.trim().is_empty() => (message, FieldErrors::new()),
        _ if !body.trim().is_empty() && parsed_is_not_object(body) => {
            (body.trim().to_string(), FieldErrors::new())
        }
        _ => (fallback.to_string(), FieldErrors::new()),
    };

    if status == 401 && field_errors.is_empty() && message == fallback {
        return AuthError::InvalidCredentials;
    }

    AuthError::Server {
        status,
        message,
        field_errors,
    }
}

fn parsed_is_not_object(body: &str) -> bool {
    !matches!(
        serde_json::from_str::<serde_json::Value>(body),
        Ok(serde_json::Value::Object(_))
    )
}
