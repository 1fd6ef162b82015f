//! Session keys.

/// Session keys for visitor state.
pub mod keys {
    /// Key for the authenticated user store.
    pub const AUTH_STORAGE: &str = "auth-storage";

    /// Key for the cart store.
    pub const CART_STORAGE: &str = "cart-storage";

    /// Key for queued toast notifications.
    pub const TOASTS: &str = "toasts";
}
