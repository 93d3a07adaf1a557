//! Filter state for the feedback and user list views.
//!
//! Filters are plain values. They are created with defaults when a view is
//! opened, changed only by explicit user input, and serialized into query
//! pairs in a fixed key order so that two equal filters always produce the
//! same request.

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};

pub const DEFAULT_FEEDBACK_SORT: &str = "last_feedback_time";
pub const DEFAULT_USER_SORT: &str = "level";

/// Ordered list of query parameters.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Which image population a feedback listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Real,
    Ai,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Real => "real",
            Category::Ai => "ai",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Category::All),
            "real" => Ok(Category::Real),
            "ai" => Ok(Category::Ai),
            _ => Err(AdminError::Other(format!(
                "invalid image type '{s}', expected one of: all, real, ai"
            ))),
        }
    }
}

/// Tri-state resolution filter.
///
/// `Any` means "do not filter": the `resolved` parameter is left out of the
/// request entirely instead of being sent as a placeholder string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedFilter {
    Resolved,
    Unresolved,
    #[default]
    Any,
}

impl ResolvedFilter {
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            ResolvedFilter::Resolved => Some("true"),
            ResolvedFilter::Unresolved => Some("false"),
            ResolvedFilter::Any => None,
        }
    }
}

impl From<Option<bool>> for ResolvedFilter {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => ResolvedFilter::Resolved,
            Some(false) => ResolvedFilter::Unresolved,
            None => ResolvedFilter::Any,
        }
    }
}

impl fmt::Display for ResolvedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedFilter::Resolved => write!(f, "yes"),
            ResolvedFilter::Unresolved => write!(f, "no"),
            ResolvedFilter::Any => write!(f, "any"),
        }
    }
}

impl FromStr for ResolvedFilter {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "true" | "complete" | "resolved" => Ok(ResolvedFilter::Resolved),
            "no" | "false" | "incomplete" | "unresolved" => Ok(ResolvedFilter::Unresolved),
            "any" | "all" => Ok(ResolvedFilter::Any),
            _ => Err(AdminError::Other(format!(
                "invalid resolved filter '{s}', expected one of: yes, no, any"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn is_desc(&self) -> bool {
        matches!(self, SortOrder::Desc)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AdminError::Other(format!(
                "invalid sort order '{s}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

/// Dashboard shortcut a feedback listing can start from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Preset {
    Real,
    Ai,
    Complete,
    Incomplete,
}

/// Query state of the feedback list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackFilters {
    pub category: Category,
    pub resolved: ResolvedFilter,
    pub sort_field: String,
    pub sort_order: SortOrder,
    pub page: NonZeroU32,
}

impl Default for FeedbackFilters {
    fn default() -> Self {
        Self {
            category: Category::All,
            resolved: ResolvedFilter::Any,
            sort_field: DEFAULT_FEEDBACK_SORT.to_string(),
            sort_order: SortOrder::Asc,
            page: NonZeroU32::MIN,
        }
    }
}

impl FeedbackFilters {
    /// Seed filters from a dashboard shortcut.
    pub fn from_preset(preset: Preset) -> Self {
        let mut filters = Self::default();
        match preset {
            Preset::Real => filters.category = Category::Real,
            Preset::Ai => filters.category = Category::Ai,
            Preset::Complete => filters.resolved = ResolvedFilter::Resolved,
            Preset::Incomplete => filters.resolved = ResolvedFilter::Unresolved,
        }
        filters
    }

    pub fn with_page(mut self, page: NonZeroU32) -> Self {
        self.page = page;
        self
    }

    /// Parameters shared by the row and count requests, in order.
    ///
    /// `resolved` is left out for [`ResolvedFilter::Any`]; no other field is
    /// ever omitted.
    ///
    /// Both requests must be built from this so pagination always matches the
    /// displayed set.
    pub fn count_query(&self) -> QueryPairs {
        let mut pairs: QueryPairs = vec![("image_type", self.category.as_str().to_string())];
        if let Some(resolved) = self.resolved.as_param() {
            pairs.push(("resolved", resolved.to_string()));
        }
        pairs
    }

    /// Full parameter list for one page of rows.
    pub fn list_query(&self, page: NonZeroU32, limit: u32) -> QueryPairs {
        let mut pairs = self.count_query();
        pairs.push(("sort_by", self.sort_field.clone()));
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));
        pairs.push(("page", page.to_string()));
        pairs.push(("limit", limit.to_string()));
        pairs
    }
}

/// Query state of the user list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilters {
    pub tags: BTreeSet<String>,
    /// Require every tag instead of any of them
    pub match_all: bool,
    pub sort_field: String,
    pub sort_order: SortOrder,
}

impl Default for UserFilters {
    fn default() -> Self {
        Self {
            tags: BTreeSet::new(),
            match_all: false,
            sort_field: DEFAULT_USER_SORT.to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

impl UserFilters {
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags
            .into_iter()
            .map(Into::into)
            .map(|t: String| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    pub fn query(&self) -> QueryPairs {
        let mut pairs: QueryPairs = self.tags.iter().map(|t| ("tags", t.clone())).collect();
        pairs.push(("all", self.match_all.to_string()));
        pairs.push(("sort_by", self.sort_field.clone()));
        pairs.push(("desc", self.sort_order.is_desc().to_string()));
        pairs
    }
}
