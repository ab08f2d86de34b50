use crate::call::Call;
use crate::execute::Execute;
use crate::models::{
    CompanyProfile, SearchParameterList, SearchParameterType, SearchPayload, SearchResponse,
};
use crate::pagination::Cursor;

/// Page sizes used when a search is issued without an explicit `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub classic: u32,
    pub sales_navigator: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            classic: 50,
            sales_navigator: 100,
        }
    }
}

impl SearchLimits {
    pub fn for_payload(&self, payload: &SearchPayload) -> u32 {
        if payload.is_sales_navigator() {
            self.sales_navigator
        } else {
            self.classic
        }
    }
}

/// LinkedIn people and company search.
pub struct Search<'a, E> {
    exec: &'a E,
    limits: SearchLimits,
}

impl<'a, E: Execute> Search<'a, E> {
    pub fn new(exec: &'a E) -> Self {
        Self {
            exec,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Run one page of a search. Without `limit`, the page size follows
    /// [`SearchLimits`] for the payload's API.
    pub fn search(
        &self,
        account_id: &str,
        payload: &SearchPayload,
        cursor: Option<Cursor>,
        limit: Option<u32>,
    ) -> E::Output<SearchResponse> {
        let limit = limit.unwrap_or_else(|| self.limits.for_payload(payload));
        self.exec.execute(
            Call::post("linkedin/search")
                .require("account_id", !account_id.is_empty())
                .query("cursor", cursor)
                .query("account_id", account_id)
                .query("limit", limit)
                .json(payload),
        )
    }

    /// Resolve free text to the IDs search filters expect.
    pub fn parameters(
        &self,
        account_id: &str,
        kind: SearchParameterType,
        keywords: &str,
    ) -> E::Output<SearchParameterList> {
        self.exec.execute(
            Call::get("linkedin/search/parameters")
                .require("account_id", !account_id.is_empty())
                .query("account_id", account_id)
                .query("type", kind.as_str())
                .query("keywords", keywords),
        )
    }

    /// Company profile by name or ID.
    pub fn retrieve_company(
        &self,
        account_id: &str,
        identifier: &str,
    ) -> E::Output<CompanyProfile> {
        self.exec.execute(
            Call::get(format!("linkedin/company/{identifier}"))
                .require("account_id", !account_id.is_empty())
                .require("identifier", !identifier.is_empty())
                .query("account_id", account_id),
        )
    }
}
