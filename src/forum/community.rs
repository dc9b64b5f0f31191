use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::forum::errors::ScrapeError;

/// A community name that passed allow-list validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Community(String);

impl Community {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Community {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of communities the front-ends are allowed to scrape, in configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityAllowList {
    communities: Vec<Community>,
}

impl CommunityAllowList {
    /// Parse a comma separated list such as `"privacy, scams"`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut communities: Vec<Community> = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(format!("'{}' is not a valid community name", name));
            }
            if !communities
                .iter()
                .any(|c| c.0.eq_ignore_ascii_case(name))
            {
                communities.push(Community(name.to_string()));
            }
        }

        if communities.is_empty() {
            return Err("at least one community is required".to_string());
        }
        Ok(Self { communities })
    }

    /// Resolve a user-supplied name against the list. Matching ignores ASCII case.
    pub fn resolve(&self, name: &str) -> Result<Community, ScrapeError> {
        let name = name.trim();
        self.communities
            .iter()
            .find(|c| c.0.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| ScrapeError::UnknownCommunity(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Community> {
        self.communities.iter()
    }

    pub fn to_vec(&self) -> Vec<Community> {
        self.communities.clone()
    }
}

/// Listing order, used verbatim as the listing URL path segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Hot,
    New,
    Rising,
    Top,
    Controversial,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::New => "new",
            SortMode::Rising => "rising",
            SortMode::Top => "top",
            SortMode::Controversial => "controversial",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(SortMode::Hot),
            "new" => Ok(SortMode::New),
            "rising" => Ok(SortMode::Rising),
            "top" => Ok(SortMode::Top),
            "controversial" => Ok(SortMode::Controversial),
            other => Err(format!("unknown sort mode '{}'", other)),
        }
    }
}
