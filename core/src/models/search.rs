use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Extra;
use crate::pagination::{Cursor, Page};

/// URL prefix of LinkedIn Sales Navigator search pages.
pub const SALES_SEARCH_URL_PREFIX: &str = "https://www.linkedin.com/sales/search";

/// Body of `POST linkedin/search`, discriminated by `api`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "api", rename_all = "snake_case")]
pub enum SearchPayload {
    Classic(ClassicSearch),
    SalesNavigator(SalesNavigatorSearch),
    /// Replays a search page URL copied from the LinkedIn UI.
    Url(UrlSearch),
}

impl SearchPayload {
    pub fn url(url: impl Into<String>) -> Self {
        SearchPayload::Url(UrlSearch { url: url.into() })
    }

    /// Whether the search runs against Sales Navigator, either explicitly or
    /// through a Sales Navigator URL.
    pub fn is_sales_navigator(&self) -> bool {
        match self {
            SearchPayload::Classic(_) => false,
            SearchPayload::SalesNavigator(_) => true,
            SearchPayload::Url(search) => search.url.starts_with(SALES_SEARCH_URL_PREFIX),
        }
    }
}

impl From<ClassicSearch> for SearchPayload {
    fn from(value: ClassicSearch) -> Self {
        SearchPayload::Classic(value)
    }
}

impl From<SalesNavigatorSearch> for SearchPayload {
    fn from(value: SalesNavigatorSearch) -> Self {
        SearchPayload::SalesNavigator(value)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    #[default]
    People,
    Companies,
    Posts,
    Jobs,
}

/// Keyword filters scoped to one profile field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvancedKeywords {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

/// Filters of a classic LinkedIn search. List filters take the IDs returned
/// by the search-parameters route, not raw text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassicSearch {
    #[serde(default)]
    pub category: SearchCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_language: Option<Vec<String>>,
    /// Degrees of connection, 1 to 3.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_distance: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_company: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_keywords: Option<AdvancedKeywords>,
    /// Any filter without a dedicated field.
    #[serde(flatten)]
    pub filters: Extra,
}

impl ClassicSearch {
    pub fn people(keywords: impl Into<String>) -> Self {
        Self {
            keywords: Some(keywords.into()),
            ..Self::default()
        }
    }
}

/// Filters of a Sales Navigator search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesNavigatorSearch {
    #[serde(default)]
    pub category: SearchCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_search_id: Option<String>,
    #[serde(flatten)]
    pub filters: Extra,
}

impl SalesNavigatorSearch {
    pub fn people(keywords: impl Into<String>) -> Self {
        Self {
            keywords: Some(keywords.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlSearch {
    pub url: String,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub object: Option<String>,
    pub items: Vec<SearchResult>,
    /// Effective search configuration as echoed by the remote.
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub paging: Option<SearchPaging>,
    #[serde(default)]
    pub cursor: Option<Cursor>,
}

impl Page for SearchResponse {
    type Item = SearchResult;

    fn into_parts(self) -> (Vec<SearchResult>, Option<Cursor>) {
        (self.items, self.cursor)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchPaging {
    #[serde(default)]
    pub start: Option<u64>,
    #[serde(default)]
    pub page_count: u64,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// A search hit. Result kinds without a dedicated variant decode as `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchResult {
    People(PeopleResult),
    Company(CompanyResult),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeopleResult {
    pub id: String,
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// `SELF`, `DISTANCE_1` .. `DISTANCE_3` or `OUT_OF_NETWORK`.
    #[serde(default)]
    pub network_distance: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyResult {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub followers_count: Option<u64>,
    #[serde(default)]
    pub headcount: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Kinds of ID lookups accepted by `linkedin/search/parameters`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchParameterType {
    Location,
    People,
    Company,
    School,
    Industry,
    Service,
    JobFunction,
    JobTitle,
    EmploymentType,
    Skill,
}

impl SearchParameterType {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchParameterType::Location => "LOCATION",
            SearchParameterType::People => "PEOPLE",
            SearchParameterType::Company => "COMPANY",
            SearchParameterType::School => "SCHOOL",
            SearchParameterType::Industry => "INDUSTRY",
            SearchParameterType::Service => "SERVICE",
            SearchParameterType::JobFunction => "JOB_FUNCTION",
            SearchParameterType::JobTitle => "JOB_TITLE",
            SearchParameterType::EmploymentType => "EMPLOYMENT_TYPE",
            SearchParameterType::Skill => "SKILL",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchParameter {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub additional_data: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchParameterList {
    #[serde(default)]
    pub object: Option<String>,
    pub items: Vec<SearchParameter>,
    #[serde(default)]
    pub paging: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
