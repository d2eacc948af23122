//! Store protocol schema.
//!
//! The subset of the store's protobuf schema that the catalog operations
//! read and write. Messages use proto2 semantics: every singular field is an
//! `Option`, so "unset" and "set to the default" stay distinguishable.
//!
//! Every message also derives `Serialize` with the schema's camelCase field
//! names. That derived metadata is what [`crate::codec::to_value`] and
//! [`crate::codec::to_text`] walk to project any message generically.
//!
//! # Layout
//!
//! ```text
//! ResponseWrapper
//!   ├── payload: Payload
//!   │     ├── listResponse / searchResponse   (DocV2 pages)
//!   │     ├── detailsResponse / bulkDetailsResponse
//!   │     ├── browseResponse / reviewResponse
//!   │     └── buyResponse / deliveryResponse  (AndroidAppDeliveryData)
//!   ├── commands: ServerCommands
//!   ├── preFetch: [PreFetch { url, response }]
//!   └── notification: [Notification]
//! ```

mod delivery;
mod document;
mod responses;

pub use delivery::{
    AndroidAppDeliveryData, AppFileMetadata, BuyResponse, DeliveryResponse, HttpCookie,
    PurchaseStatusResponse,
};
pub use document::{
    AggregateRating, AppDetails, Bucket, ContainerMetadata, DocV1, DocV2, DocumentDetails, Image,
    Offer,
};
pub use responses::{
    BrowseLink, BrowseResponse, BulkDetailsEntry, BulkDetailsRequest, BulkDetailsResponse,
    DetailsResponse, GetReviewsResponse, ListResponse, Review, ReviewResponse, SearchResponse,
};

use serde::Serialize;

/// Top-level message of every `fdfe` response.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseWrapper {
    #[prost(message, optional, tag = "1")]
    pub payload: Option<Payload>,
    #[prost(message, optional, tag = "2")]
    pub commands: Option<ServerCommands>,
    #[prost(message, repeated, tag = "3")]
    pub pre_fetch: Vec<PreFetch>,
    #[prost(message, repeated, tag = "4")]
    pub notification: Vec<Notification>,
}

/// Operation-specific response payloads. At most one is expected per response.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[prost(message, optional, tag = "1")]
    pub list_response: Option<ListResponse>,
    #[prost(message, optional, tag = "2")]
    pub details_response: Option<DetailsResponse>,
    #[prost(message, optional, tag = "3")]
    pub review_response: Option<ReviewResponse>,
    #[prost(message, optional, tag = "4")]
    pub buy_response: Option<BuyResponse>,
    #[prost(message, optional, tag = "5")]
    pub search_response: Option<SearchResponse>,
    #[prost(message, optional, tag = "7")]
    pub browse_response: Option<BrowseResponse>,
    #[prost(message, optional, tag = "8")]
    pub purchase_status_response: Option<PurchaseStatusResponse>,
    #[prost(message, optional, tag = "19")]
    pub bulk_details_response: Option<BulkDetailsResponse>,
    #[prost(message, optional, tag = "21")]
    pub delivery_response: Option<DeliveryResponse>,
}

/// Server-side instructions attached to a response.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCommands {
    #[prost(bool, optional, tag = "1")]
    pub clear_cache: Option<bool>,
    #[prost(string, optional, tag = "2")]
    pub display_error_message: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub log_error_stacktrace: Option<String>,
}

/// Account event pushed alongside a response, e.g. a completed install.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[prost(int32, optional, tag = "1")]
    pub notification_type: Option<i32>,
    #[prost(int64, optional, tag = "3")]
    pub timestamp: Option<i64>,
    #[prost(string, optional, tag = "5")]
    pub doc_title: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub user_email: Option<String>,
    #[prost(message, optional, tag = "8")]
    pub app_delivery_data: Option<AndroidAppDeliveryData>,
    #[prost(string, optional, tag = "13")]
    pub notification_id: Option<String>,
}

/// A response the server already computed for a path the client will likely
/// request next.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreFetch {
    #[prost(string, optional, tag = "1")]
    pub url: Option<String>,
    /// Raw, undecoded `ResponseWrapper` bytes.
    #[prost(bytes = "vec", optional, tag = "2")]
    #[serde(serialize_with = "crate::codec::projection::escaped_bytes")]
    pub response: Option<Vec<u8>>,
    #[prost(string, optional, tag = "3")]
    pub etag: Option<String>,
    #[prost(int64, optional, tag = "4")]
    pub ttl: Option<i64>,
    #[prost(int64, optional, tag = "5")]
    pub soft_ttl: Option<i64>,
}
