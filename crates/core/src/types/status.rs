//! Status enums and listing filters.
//!
//! Order statuses arrive in two vocabularies: string labels (`"Pending"`) and
//! legacy numeric codes (`1`..=`5`). Both deserialize into [`OrderStatus`];
//! outbound filters always use the string label.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Order lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Canceled,
    /// A label this client does not recognize, kept verbatim.
    Other(String),
}

impl OrderStatus {
    /// Every status this client knows, in lifecycle order.
    pub const KNOWN: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Completed,
        Self::Canceled,
    ];

    /// Canonical label sent to and shown from the API.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
            Self::Other(label) => label,
        }
    }

    /// Map a legacy numeric status code.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Pending,
            2 => Self::Processing,
            3 => Self::Shipped,
            4 => Self::Completed,
            5 => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }

    /// Parse a label (case-insensitive) or a numeric code given as text.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "completed" => Self::Completed,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Other(trimmed.to_owned()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i64),
            Label(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Self::from_code(code),
            Repr::Label(label) => Self::parse(&label),
        })
    }
}

/// Status filter for the order listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderStatusFilter {
    /// No status restriction; the parameter is omitted.
    #[default]
    All,
    Only(OrderStatus),
}

impl OrderStatusFilter {
    /// Query value to send, or `None` to omit the parameter.
    #[must_use]
    pub fn query_value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status.label()),
        }
    }
}

impl std::str::FromStr for OrderStatusFilter {
    type Err = std::convert::Infallible;

    /// `all` (and its legacy label `Todos`) or empty means no filter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("todos")
        {
            Ok(Self::All)
        } else {
            Ok(Self::Only(OrderStatus::parse(trimmed)))
        }
    }
}

/// Status filter for the admin product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatusFilter {
    /// Active and inactive products; the parameter is omitted.
    #[default]
    All,
    Active,
    Inactive,
}

impl ProductStatusFilter {
    /// Query value to send, or `None` to omit the parameter.
    #[must_use]
    pub const fn query_value(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Active => Some("true"),
            Self::Inactive => Some("false"),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All products",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for ProductStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for ProductStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            "active" | "true" => Ok(Self::Active),
            "inactive" | "false" => Ok(Self::Inactive),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_from_legacy_codes() {
        assert_eq!(OrderStatus::from_code(1), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_code(4), OrderStatus::Completed);
        assert_eq!(OrderStatus::from_code(5), OrderStatus::Canceled);
        assert_eq!(OrderStatus::from_code(9), OrderStatus::Other("9".to_string()));
    }

    #[test]
    fn test_order_status_deserializes_both_vocabularies() {
        let numeric: OrderStatus = serde_json::from_str("2").unwrap();
        let label: OrderStatus = serde_json::from_str("\"Shipped\"").unwrap();
        let text_code: OrderStatus = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(numeric, OrderStatus::Processing);
        assert_eq!(label, OrderStatus::Shipped);
        assert_eq!(text_code, OrderStatus::Shipped);
    }

    #[test]
    fn test_order_status_serializes_canonical_label() {
        let json = serde_json::to_string(&OrderStatus::from_code(5)).unwrap();
        assert_eq!(json, "\"Canceled\"");
    }

    #[test]
    fn test_order_status_filter_all_is_omitted() {
        assert_eq!("Todos".parse::<OrderStatusFilter>().unwrap(), OrderStatusFilter::All);
        assert_eq!(OrderStatusFilter::All.query_value(), None);
        let pending: OrderStatusFilter = "1".parse().unwrap();
        assert_eq!(pending.query_value(), Some("Pending"));
    }

    #[test]
    fn test_product_status_filter_query_values() {
        assert_eq!(ProductStatusFilter::All.query_value(), None);
        assert_eq!(ProductStatusFilter::Active.query_value(), Some("true"));
        assert_eq!(ProductStatusFilter::Inactive.query_value(), Some("false"));
        assert_eq!(
            "inactive".parse::<ProductStatusFilter>().unwrap(),
            ProductStatusFilter::Inactive
        );
        assert!("bogus".parse::<ProductStatusFilter>().is_err());
    }
}
