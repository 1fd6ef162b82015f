//! View models shared by templates.
//!
//! Pages build plain structs here and in their route modules; templates
//! only format what they are handed.

mod chart;
mod pagination;

pub use chart::TrendChart;
pub use pagination::{PageLink, Pagination};

use chrono::{DateTime, Utc};
use tower_sessions::Session;

use crate::middleware::CspNonce;
use crate::models::{AuthStore, CartStore, SessionUser, Toast, take_toasts};

/// The header's user menu.
#[derive(Debug, Clone)]
pub struct UserMenu {
    pub name: String,
    pub email: String,
    pub initial: String,
    pub is_admin: bool,
}

impl From<&SessionUser> for UserMenu {
    fn from(user: &SessionUser) -> Self {
        Self {
            name: user.info.name.clone(),
            email: user.info.email.clone(),
            initial: user.initial(),
            is_admin: user.is_admin(),
        }
    }
}

/// Data every page's layout needs: nonce, header state, and pending toasts.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub nonce: String,
    pub user: Option<UserMenu>,
    pub cart_count: usize,
    pub toasts: Vec<Toast>,
}

impl Layout {
    /// Read the header state and drain the toast queue.
    ///
    /// Call this only when a page is about to render, or queued toasts
    /// are lost.
    ///
    /// # Errors
    ///
    /// Returns an error if the session backend fails.
    pub async fn load(
        session: &Session,
        CspNonce(nonce): CspNonce,
    ) -> Result<Self, tower_sessions::session::Error> {
        let user = AuthStore::current(session).await?;
        let cart = CartStore::load(session).await?;
        let toasts = take_toasts(session).await?;

        Ok(Self {
            nonce,
            user: user.as_ref().map(UserMenu::from),
            cart_count: cart.line_count(),
            toasts,
        })
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

/// Render a timestamp as `M/D/YYYY`.
#[must_use]
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// Render an optional timestamp, `-` when absent.
#[must_use]
pub fn format_optional_date(at: Option<&DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), format_date)
}

/// One star of a rating row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

impl Star {
    /// CSS class suffix.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::Empty => "empty",
        }
    }
}

/// Five stars for a 0-5 rating, halves rounded to the nearest half.
#[must_use]
pub fn rating_stars(rating: f64) -> Vec<Star> {
    let halves = (rating.clamp(0.0, 5.0) * 2.0).round();
    (1..=5_u8)
        .map(|i| {
            let full_at = f64::from(i) * 2.0;
            if halves >= full_at {
                Star::Full
            } else if halves + 1.0 >= full_at {
                Star::Half
            } else {
                Star::Empty
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 15, 0, 0).unwrap();
        assert_eq!(format_date(&at), "3/7/2024");
        assert_eq!(format_optional_date(None), "-");
    }

    #[test]
    fn test_rating_stars() {
        use Star::{Empty, Full, Half};
        assert_eq!(rating_stars(3.5), vec![Full, Full, Full, Half, Empty]);
        assert_eq!(rating_stars(0.0), vec![Empty; 5]);
        assert_eq!(rating_stars(4.8), vec![Full; 5]);
        assert_eq!(rating_stars(1.2), vec![Full, Empty, Empty, Empty, Empty]);
    }
}
