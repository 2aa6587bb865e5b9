//! # Customer Module
//!
//! Customer là chủ sở hữu account. PIN là credential dạng số, opaque với core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ID của customer, do storage cấp
pub type CustomerId = i64;

/// Thông tin khách hàng.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    /// Tên hiển thị, cũng dùng để đăng nhập
    pub name: String,
    /// PIN không bao giờ được serialize ra ngoài
    #[serde(skip_serializing, default)]
    pub pin: i64,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>, pin: i64) -> Self {
        Self {
            id,
            name: name.into(),
            pin,
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer{{id={}, name='{}'}}", self.id, self.name)
    }
}
