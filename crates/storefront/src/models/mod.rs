//! Session-persisted stores.
//!
//! Visitor state lives in the server-side session under fixed keys:
//!
//! - [`AuthStore`] under `auth-storage`: the signed-in user and their token
//! - [`CartStore`] under `cart-storage`: the last known cart contents
//! - [`Toast`] queue under `toasts`: one-shot notifications for the next page

mod auth;
mod cart;
pub mod session;
mod toast;

pub use auth::{AuthStore, SessionUser};
pub use cart::CartStore;
pub use session::keys as session_keys;
pub use toast::{Toast, ToastLevel, push_toast, take_toasts, toast_error, toast_success};
