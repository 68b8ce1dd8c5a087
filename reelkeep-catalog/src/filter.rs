//! Filter request and criterion types.
//!
//! A query is described by a [`FindFilter`] (free-text search, sort,
//! pagination) plus an optional entity-specific filter made of criteria. Each
//! criterion pairs a value with a [`CriterionModifier`]; the database layer
//! turns them into SQL fragments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the request does not specify one.
pub const DEFAULT_PER_PAGE: i64 = 25;

/// Largest page size a request may ask for.
pub const MAX_PER_PAGE: i64 = 120;

// ── Find Filter ─────────────────────────────────────────────────────────────

/// Sort, search, and pagination settings shared by every entity query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FindFilter {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl FindFilter {
    /// Resolved page number, never below 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Resolved page size, clamped to `[1, MAX_PER_PAGE]`.
    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Row offset of the first item on the resolved page. Saturates at
    /// `i64::MAX` for page numbers past any real result set.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    /// Requested sort key, or `default` if none was given.
    pub fn sort_or<'a>(&'a self, default: &'a str) -> &'a str {
        match self.sort.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => default,
        }
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
            .as_deref()
            .map(SortDirection::from_str_loose)
            .unwrap_or_default()
    }

    /// The search text, if any non-blank text was given.
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.trim().is_empty())
    }
}

/// Ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Anything other than "DESC" (any case) sorts ascending.
    pub fn from_str_loose(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

// ── Criterion Modifier ──────────────────────────────────────────────────────

/// Comparison operator applied by a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionModifier {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    IsNull,
    NotNull,
    Includes,
    Excludes,
}

/// A modifier string that names no known operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown criterion modifier '{0}'")]
pub struct UnknownModifier(pub String);

impl CriterionModifier {
    pub const ALL: [CriterionModifier; 8] = [
        Self::Equals,
        Self::NotEquals,
        Self::GreaterThan,
        Self::LessThan,
        Self::IsNull,
        Self::NotNull,
        Self::Includes,
        Self::Excludes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
            Self::IsNull => "IS_NULL",
            Self::NotNull => "NOT_NULL",
            Self::Includes => "INCLUDES",
            Self::Excludes => "EXCLUDES",
        }
    }

    /// True for INCLUDES/EXCLUDES, which bind one argument per value.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Includes | Self::Excludes)
    }

    /// Render the comparison that follows a column name, and the number of
    /// `?` placeholders it contains.
    ///
    /// `len` is the size of the value collection; only INCLUDES and EXCLUDES
    /// look at it.
    ///
    /// ```
    /// use reelkeep_catalog::CriterionModifier;
    ///
    /// assert_eq!(CriterionModifier::GreaterThan.render(1), ("> ?".to_string(), 1));
    /// assert_eq!(CriterionModifier::IsNull.render(0), ("IS NULL".to_string(), 0));
    /// assert_eq!(CriterionModifier::Includes.render(3), ("IN (?, ?, ?)".to_string(), 3));
    /// ```
    pub fn render(&self, len: usize) -> (String, usize) {
        match self {
            Self::Equals => ("= ?".to_string(), 1),
            Self::NotEquals => ("!= ?".to_string(), 1),
            Self::GreaterThan => ("> ?".to_string(), 1),
            Self::LessThan => ("< ?".to_string(), 1),
            Self::IsNull => ("IS NULL".to_string(), 0),
            Self::NotNull => ("IS NOT NULL".to_string(), 0),
            Self::Includes => (format!("IN {}", in_binding(len)), len),
            Self::Excludes => (format!("NOT IN {}", in_binding(len)), len),
        }
    }
}

fn in_binding(len: usize) -> String {
    format!("({})", vec!["?"; len].join(", "))
}

impl fmt::Display for CriterionModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CriterionModifier {
    type Err = UnknownModifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownModifier(s.to_string()))
    }
}

// ── Criteria ────────────────────────────────────────────────────────────────

/// Compare an integer column against one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntCriterion {
    #[serde(default)]
    pub value: i64,
    pub modifier: CriterionModifier,
}

impl IntCriterion {
    pub fn new(modifier: CriterionModifier, value: i64) -> Self {
        Self { value, modifier }
    }
}

/// Compare a text column against one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringCriterion {
    #[serde(default)]
    pub value: String,
    pub modifier: CriterionModifier,
}

impl StringCriterion {
    pub fn new(modifier: CriterionModifier, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            modifier,
        }
    }
}

/// Match a relation against a set of entity ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCriterion {
    #[serde(default)]
    pub value: Vec<i64>,
    pub modifier: CriterionModifier,
}

impl MultiCriterion {
    pub fn new(modifier: CriterionModifier, value: Vec<i64>) -> Self {
        Self { value, modifier }
    }
}

// ── Entity Filters ──────────────────────────────────────────────────────────

/// A scene field or relation that may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingField {
    Title,
    Url,
    Date,
    Studio,
    Performers,
    Tags,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFilter {
    pub rating: Option<IntCriterion>,
    pub path: Option<StringCriterion>,
    pub is_missing: Option<MissingField>,
    pub studios: Option<MultiCriterion>,
    pub tags: Option<MultiCriterion>,
    pub performers: Option<MultiCriterion>,
    /// Number of distinct performers linked to the scene.
    pub performer_count: Option<IntCriterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformerFilter {
    pub favorite: Option<bool>,
    pub country: Option<StringCriterion>,
    pub scene_count: Option<IntCriterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioFilter {
    pub scene_count: Option<IntCriterion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TagFilter {
    pub scene_count: Option<IntCriterion>,
}
