//! Typed request payloads and response models.
//!
//! # Design
//! Only the fields callers commonly read are typed. Responses ignore unknown
//! fields, and the open-ended profile types keep everything else in a
//! flattened `extra` map so nothing the remote sends is lost. Optional
//! request fields are omitted from the JSON body when `None`.

mod accounts;
mod hosted;
mod messaging;
mod search;
mod users;

use serde::{Deserialize, Serialize};

pub use accounts::{Account, AccountProvider, AccountSource, ConnectAccount, ConnectAccountResponse};
pub use hosted::{HostedLink, HostedLinkRequest, HostedLinkType};
pub use messaging::{Chat, ChatAttendee, ChatStarted, Message, MessageSent};
pub use search::{
    AdvancedKeywords, ClassicSearch, CompanyProfile, CompanyResult, PeopleResult,
    SalesNavigatorSearch, SearchCategory, SearchPaging, SearchParameter, SearchParameterList,
    SearchParameterType, SearchPayload, SearchResponse, SearchResult, UrlSearch,
};
pub use users::{InvitationSent, InvitePayload, OwnerProfile, UserProfile, UserRelation};

/// Acknowledgement returned by delete operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    #[serde(default)]
    pub object: Option<String>,
}

pub(crate) type Extra = serde_json::Map<String, serde_json::Value>;
