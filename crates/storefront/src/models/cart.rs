//! The `cart-storage` store.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use shopeasy_core::Price;

use crate::api::CartItem;

use super::session::keys;

/// Last known cart contents.
///
/// The backend cart is authoritative; this copy feeds the header badge and
/// lets guests see what they had before their session expired.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartStore {
    pub cart_items: Vec<CartItem>,
}

impl CartStore {
    /// Read the store, treating a missing or unreadable entry as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the session backend fails.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        match session.get::<Self>(keys::CART_STORAGE).await {
            Ok(store) => Ok(store.unwrap_or_default()),
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                tracing::warn!(error = %e, "Discarding unreadable cart-storage");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_cart_items(
        session: &Session,
        cart_items: Vec<CartItem>,
    ) -> Result<(), tower_sessions::session::Error> {
        session
            .insert(keys::CART_STORAGE, Self { cart_items })
            .await
    }

    /// Empty the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear_cart(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::CART_STORAGE, Self::default()).await
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.cart_items.len()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart_items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of price times quantity over every line.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart_items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }
}
