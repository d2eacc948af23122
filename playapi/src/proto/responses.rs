//! Catalog request and response messages.

use serde::Serialize;

use super::document::{Bucket, DocV1, DocV2};

/// One page of search results.
///
/// The first top-level document is the result container: its `child`
/// documents are the hits and its container metadata carries the
/// continuation path.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[prost(string, optional, tag = "1")]
    pub original_query: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub suggested_query: Option<String>,
    #[prost(bool, optional, tag = "3")]
    pub aggregate_query: Option<bool>,
    #[prost(message, repeated, tag = "4")]
    pub bucket: Vec<Bucket>,
    #[prost(message, repeated, tag = "5")]
    pub doc: Vec<DocV2>,
}

impl SearchResponse {
    /// Hits of every result container, in page order.
    pub fn items(&self) -> impl Iterator<Item = &DocV2> {
        self.doc.iter().flat_map(|container| container.child.iter())
    }

    pub fn item_count(&self) -> usize {
        self.doc.iter().map(|container| container.child.len()).sum()
    }

    /// Continuation path of this page.
    pub fn next_page_url(&self) -> Option<&str> {
        self.doc.first().and_then(DocV2::next_page_url)
    }
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsResponse {
    #[prost(message, optional, tag = "1")]
    pub doc_v1: Option<DocV1>,
    #[prost(string, optional, tag = "2")]
    pub analytics_cookie: Option<String>,
    #[prost(message, optional, tag = "3")]
    pub user_review: Option<Review>,
    #[prost(message, optional, tag = "4")]
    pub doc_v2: Option<DocV2>,
    #[prost(string, optional, tag = "5")]
    pub footer_html: Option<String>,
}

/// Body of the `bulkDetails` POST.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDetailsRequest {
    #[prost(string, repeated, tag = "1")]
    pub docid: Vec<String>,
    #[prost(bool, optional, tag = "2")]
    pub include_child_docs: Option<bool>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDetailsResponse {
    #[prost(message, repeated, tag = "1")]
    pub entry: Vec<BulkDetailsEntry>,
}

/// One entry per requested id, in request order. `doc` is unset for
/// unknown packages.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDetailsEntry {
    #[prost(message, optional, tag = "1")]
    pub doc: Option<DocV2>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    #[prost(string, optional, tag = "1")]
    pub contents_url: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub promo_url: Option<String>,
    #[prost(message, repeated, tag = "3")]
    pub category: Vec<BrowseLink>,
    #[prost(message, repeated, tag = "4")]
    pub breadcrumb: Vec<BrowseLink>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseLink {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub data_url: Option<String>,
}

/// Apps of a subcategory, or the subcategories of a category when no
/// subcategory was requested.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[prost(message, repeated, tag = "1")]
    pub bucket: Vec<Bucket>,
    #[prost(message, repeated, tag = "2")]
    pub doc: Vec<DocV2>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    #[prost(message, optional, tag = "1")]
    pub get_response: Option<GetReviewsResponse>,
    #[prost(string, optional, tag = "2")]
    pub next_page_url: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetReviewsResponse {
    #[prost(message, repeated, tag = "1")]
    pub review: Vec<Review>,
    #[prost(int64, optional, tag = "2")]
    pub matching_count: Option<i64>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[prost(string, optional, tag = "1")]
    pub author_name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub url: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub source: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub document_version: Option<String>,
    #[prost(int64, optional, tag = "5")]
    pub timestamp_msec: Option<i64>,
    #[prost(int32, optional, tag = "6")]
    pub star_rating: Option<i32>,
    #[prost(string, optional, tag = "7")]
    pub title: Option<String>,
    #[prost(string, optional, tag = "8")]
    pub comment: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub comment_id: Option<String>,
    #[prost(string, optional, tag = "19")]
    pub device_name: Option<String>,
    #[prost(string, optional, tag = "29")]
    pub reply_text: Option<String>,
    #[prost(int64, optional, tag = "30")]
    pub reply_timestamp_msec: Option<i64>,
}
