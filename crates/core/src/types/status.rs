//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known [`OrderStatus`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid order status: {0}")]
pub struct StatusParseError(pub String);

/// Order lifecycle status as tracked by the backend.
///
/// Serialized with the same capitalized names the backend uses
/// (`"Placed"`, `"Shipped"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Placed,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Placed,
        Self::Packed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "Placed",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_wire_names() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "Lost".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order status: Lost");
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_capitalized_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivered).unwrap(),
            "\"Delivered\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }
}
