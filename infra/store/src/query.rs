use dropcatch_domain::{Competitor, Drop};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    DropTime,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortField {
    /// Lenient parse; unknown values fall back to the default field.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("created_at") => Self::CreatedAt,
            _ => Self::DropTime,
        }
    }
}

impl SortOrder {
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropQuery {
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: usize,
}

impl Default for DropQuery {
    fn default() -> Self {
        Self { sort: SortField::default(), order: SortOrder::default(), limit: 20 }
    }
}

/// A drop with its competitors, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropListing {
    #[serde(flatten)]
    pub drop: Drop,
    pub competitors: Vec<Competitor>,
}
