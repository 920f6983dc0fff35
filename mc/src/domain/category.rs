//! Problem category tags

use serde::{Deserialize, Serialize};

use crate::error::CoordError;

/// A problem category an agent can claim
///
/// Categories are trimmed on construction and compared exactly. An empty
/// category is never valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Built-in category claimed by Atlas
    pub const MALL_EVENT: &'static str = "mall-event";
    /// Built-in category claimed by Aurora
    pub const CUSTOMER_EXPERIENCE: &'static str = "customer-experience";
    /// Built-in category claimed by Mercury
    pub const RETAIL_OPERATIONS: &'static str = "retail-operations";
    /// Built-in category claimed by Sentinel
    pub const SECURITY_COMPLIANCE: &'static str = "security-compliance";

    /// Create a category, rejecting empty or whitespace-only tags
    pub fn new(tag: impl AsRef<str>) -> Result<Self, CoordError> {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoordError::InvalidCategory("category must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap one of the built-in tags above
    pub(crate) fn builtin(tag: &'static str) -> Self {
        Self(tag.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Category {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Category {
    type Error = CoordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
