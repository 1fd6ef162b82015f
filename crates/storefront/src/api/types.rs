//! Backend record types.
//!
//! Field names follow the backend's JSON (camelCase, `_id` identifiers).
//! The same types are stored in the session, so every type that lands in a
//! session store round-trips through serde unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use shopeasy_core::{OrderId, OrderStatus, Price, ProductId, UserId};

/// Image shown when a product has none.
pub const DEFAULT_PRODUCT_IMAGE: &str = "/static/images/default-product.svg";

// =============================================================================
// Users
// =============================================================================

/// A backend user as returned by login, profile, and the admin user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_blocked: bool,
}

/// Login response: the user record plus a token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserInfo,
}

// =============================================================================
// Products
// =============================================================================

/// A product image reference. The backend stores either `{ url }` objects
/// or bare URL strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Object { url: String },
    Url(String),
}

impl ImageRef {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Object { url } | Self::Url(url) => url,
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default, alias = "countInStock", deserialize_with = "lenient_count")]
    pub stock: u32,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub num_reviews: u32,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Every image URL, falling back to the legacy single `image` field.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        let urls: Vec<String> = self
            .images
            .iter()
            .map(ImageRef::url)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            self.image
                .iter()
                .filter(|url| !url.is_empty())
                .cloned()
                .collect()
        } else {
            urls
        }
    }

    /// The first image, or the shop's placeholder.
    #[must_use]
    pub fn primary_image(&self) -> String {
        self.image_urls()
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_string())
    }

    /// The struck-through list price, when it is above the selling price.
    #[must_use]
    pub fn discounted_from(&self) -> Option<Price> {
        self.original_price.filter(|original| *original > self.price)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Clamp a requested quantity into `1..=stock`.
    ///
    /// Returns `None` when the product is out of stock.
    #[must_use]
    pub fn clamp_quantity(&self, requested: u32) -> Option<u32> {
        if self.in_stock() {
            Some(requested.clamp(1, self.stock))
        } else {
            None
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Cart line as the backend sends it; the product is null when it was
/// deleted after being added.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCartItem {
    pub product: Option<Product>,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

// =============================================================================
// Orders
// =============================================================================

/// Shipping destination of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The customer attached to an order: populated, or a bare user ID.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OrderCustomer {
    Populated {
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: String,
        #[serde(default)]
        phone: Option<String>,
    },
    Id(String),
}

impl OrderCustomer {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated { name, .. } if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Populated { email, .. } if !email.is_empty() => Some(email),
            _ => None,
        }
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        match self {
            Self::Populated { phone, .. } => phone.as_deref().filter(|p| !p.is_empty()),
            Self::Id(_) => None,
        }
    }
}

/// The product an order line refers to: populated, or a bare product ID.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ItemProduct {
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
    Id(String),
}

impl ItemProduct {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Populated { id } | Self::Id(id) => id,
        }
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product: Option<ItemProduct>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Price,
    #[serde(default = "one", alias = "qty")]
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub user: Option<OrderCustomer>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub total_price: Price,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// Status as the backend reports it; unknown names are kept verbatim.
    #[serde(default = "default_status", deserialize_with = "lenient_status")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// One month of the revenue trend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevenueTrend {
    pub month: String,
    #[serde(default)]
    pub revenue: Price,
    #[serde(default)]
    pub orders: u64,
}

/// Admin dashboard summary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub users_count: u64,
    #[serde(default)]
    pub products_count: u64,
    #[serde(default)]
    pub orders_count: u64,
    #[serde(default)]
    pub revenue: Price,
    #[serde(default)]
    pub revenue_trends: Vec<RevenueTrend>,
    #[serde(default)]
    pub recent_orders: Vec<Order>,
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a list endpoint.
///
/// List endpoints answer either with a bare array or with
/// `{ <items>, page, pages }` where `<items>` is named after the resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub pages: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "products", alias = "orders", alias = "users")]
        items: Vec<T>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default)]
        pages: Option<u32>,
    },
}

impl<T> From<PageRepr<T>> for Page<T> {
    fn from(repr: PageRepr<T>) -> Self {
        match repr {
            PageRepr::Bare(items) => Self {
                items,
                page: 1,
                pages: 1,
            },
            PageRepr::Wrapped { items, page, pages } => {
                let page = page.unwrap_or(1).max(1);
                Self {
                    items,
                    page,
                    pages: pages.unwrap_or(1).max(page),
                }
            }
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PageRepr::deserialize(deserializer).map(Self::from)
    }
}

// =============================================================================
// Lenient numbers
// =============================================================================

/// Read a JSON number that may arrive as a string or null.
fn lenient_number(value: Option<&serde_json::Value>) -> Option<f64> {
    value
        .and_then(|v| match v {
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        })
        .filter(|n| n.is_finite())
}

fn default_status() -> String {
    OrderStatus::default().to_string()
}

/// Accept any status string; null or non-string values mean the default.
fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
        _ => default_status(),
    })
}

/// Accept integers, floats, numeric strings, and null for counts.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to u32 range
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(lenient_number(value.as_ref())
        .map_or(0, |n| n.clamp(0.0, f64::from(u32::MAX)) as u32))
}

/// Accept numbers, numeric strings, and null for ratings.
fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(lenient_number(value.as_ref()).map_or(0.0, |n| n.clamp(0.0, 5.0)))
}
