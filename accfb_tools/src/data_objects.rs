use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use pgs_common::Baht;
use serde::{Deserialize, Serialize};

pub const STATUS_DELETED: &str = "DELETED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

//--------------------------------------      OrderId       -----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub i64);

impl FromStr for OrderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

//--------------------------------------       Order        -----------------------------------------------------------
/// A purchase record as served by the orders backend.
///
/// The backend owns every field; this side never enforces anything about them beyond
/// presence or absence, so all display attributes are optional. `id` is the sole stable
/// key used for diffing between polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_no: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_slug: Option<String>,
    #[serde(default)]
    pub qty: Option<i64>,
    #[serde(default)]
    pub total_price: Option<Baht>,
    #[serde(default)]
    pub buyer_email: Option<String>,
    #[serde(default)]
    pub slip_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub detels: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn new(id: i64) -> Self {
        Self {
            id: OrderId(id),
            order_no: None,
            product_name: None,
            product_slug: None,
            qty: None,
            total_price: None,
            buyer_email: None,
            slip_url: None,
            status: None,
            detels: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn status_uppercase(&self) -> String {
        self.status.as_deref().unwrap_or_default().trim().to_uppercase()
    }

    /// Soft-deleted and cancelled orders are hidden from every listing and must never be
    /// diffed as new.
    pub fn is_visible(&self) -> bool {
        let status = self.status_uppercase();
        status != STATUS_DELETED && status != STATUS_CANCELLED
    }
}

//--------------------------------------    DeleteOutcome   -----------------------------------------------------------
/// Which of the delete strategies ended up succeeding for an order. The backend's delete
/// semantics are not documented, so [`crate::OrdersApi::soft_delete`] walks these in
/// order and reports the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    HardDeleteOrdersPath,
    HardDeleteDeletePath,
    HardDeleteQueryParam,
    StatusPatchedDeleted,
    StatusPatchedCancelled,
}

impl Display for DeleteOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::HardDeleteOrdersPath => "hard delete via /orders/{id}",
            Self::HardDeleteDeletePath => "hard delete via /delete/{id}",
            Self::HardDeleteQueryParam => "hard delete via /delete?id=",
            Self::StatusPatchedDeleted => "status patched to DELETED",
            Self::StatusPatchedCancelled => "status patched to CANCELLED",
        };
        f.write_str(s)
    }
}
