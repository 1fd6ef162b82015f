//! One-shot notifications.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

impl ToastLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A notification shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Queue a toast.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_toast(
    session: &Session,
    level: ToastLevel,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut toasts: Vec<Toast> = session
        .get(keys::TOASTS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    toasts.push(Toast {
        level,
        message: message.into(),
    });
    session.insert(keys::TOASTS, toasts).await
}

/// Queue a success toast.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn toast_success(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push_toast(session, ToastLevel::Success, message).await
}

/// Queue an error toast.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn toast_error(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    push_toast(session, ToastLevel::Error, message).await
}

/// Drain every queued toast.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_toasts(session: &Session) -> Result<Vec<Toast>, tower_sessions::session::Error> {
    match session.remove::<Vec<Toast>>(keys::TOASTS).await {
        Ok(toasts) => Ok(toasts.unwrap_or_default()),
        Err(tower_sessions::session::Error::SerdeJson(_)) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
