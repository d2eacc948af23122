//! Catalog documents: apps, containers and their metadata.

use serde::Serialize;

/// A catalog document. Containers (search result groups, list pages) hold
/// their items in `child`.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocV2 {
    #[prost(string, optional, tag = "1")]
    pub docid: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub backend_docid: Option<String>,
    #[prost(int32, optional, tag = "3")]
    pub doc_type: Option<i32>,
    #[prost(int32, optional, tag = "4")]
    pub backend_id: Option<i32>,
    #[prost(string, optional, tag = "5")]
    pub title: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub creator: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub description_html: Option<String>,
    #[prost(message, repeated, tag = "8")]
    pub offer: Vec<Offer>,
    #[prost(message, repeated, tag = "10")]
    pub image: Vec<Image>,
    #[prost(message, repeated, tag = "11")]
    pub child: Vec<DocV2>,
    #[prost(message, optional, tag = "12")]
    pub container_metadata: Option<ContainerMetadata>,
    #[prost(message, optional, tag = "13")]
    pub details: Option<DocumentDetails>,
    #[prost(message, optional, tag = "14")]
    pub aggregate_rating: Option<AggregateRating>,
    #[prost(string, optional, tag = "16")]
    pub details_url: Option<String>,
    #[prost(string, optional, tag = "17")]
    pub share_url: Option<String>,
    #[prost(string, optional, tag = "18")]
    pub reviews_url: Option<String>,
    #[prost(string, optional, tag = "19")]
    pub backend_url: Option<String>,
    #[prost(string, optional, tag = "20")]
    pub purchase_details_url: Option<String>,
    #[prost(bool, optional, tag = "21")]
    pub details_reusable: Option<bool>,
    #[prost(string, optional, tag = "22")]
    pub subtitle: Option<String>,
}

impl DocV2 {
    /// Continuation path for the next page of this container, if any.
    pub fn next_page_url(&self) -> Option<&str> {
        self.container_metadata
            .as_ref()
            .and_then(|meta| meta.next_page_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Version code of the app this document describes.
    pub fn version_code(&self) -> Option<i32> {
        self.details
            .as_ref()
            .and_then(|d| d.app_details.as_ref())
            .and_then(|app| app.version_code)
    }
}

/// Legacy document shape still used inside buckets.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocV1 {
    #[prost(string, optional, tag = "2")]
    pub docid: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub details_url: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub reviews_url: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub share_url: Option<String>,
    #[prost(string, optional, tag = "8")]
    pub creator: Option<String>,
    #[prost(string, optional, tag = "10")]
    pub description_html: Option<String>,
    #[prost(string, optional, tag = "14")]
    pub more_by_header: Option<String>,
    #[prost(string, optional, tag = "15")]
    pub title: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMetadata {
    #[prost(string, optional, tag = "1")]
    pub browse_url: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub next_page_url: Option<String>,
    #[prost(double, optional, tag = "3")]
    pub relevance: Option<f64>,
    #[prost(int64, optional, tag = "4")]
    pub estimated_results: Option<i64>,
    #[prost(string, optional, tag = "5")]
    pub analytics_cookie: Option<String>,
    #[prost(bool, optional, tag = "6")]
    pub ordered: Option<bool>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[prost(int64, optional, tag = "1")]
    pub micros: Option<i64>,
    #[prost(string, optional, tag = "2")]
    pub currency_code: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub formatted_amount: Option<String>,
    #[prost(bool, optional, tag = "5")]
    pub checkout_flow_required: Option<bool>,
    #[prost(int64, optional, tag = "6")]
    pub full_price_micros: Option<i64>,
    #[prost(string, optional, tag = "7")]
    pub formatted_full_amount: Option<String>,
    #[prost(int32, optional, tag = "8")]
    pub offer_type: Option<i32>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[prost(int32, optional, tag = "1")]
    pub image_type: Option<i32>,
    #[prost(string, optional, tag = "5")]
    pub image_url: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub alt_text_localized: Option<String>,
    #[prost(bool, optional, tag = "8")]
    pub supports_fife_url_options: Option<bool>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    #[prost(int32, optional, tag = "1")]
    pub r#type: Option<i32>,
    #[prost(float, optional, tag = "2")]
    pub star_rating: Option<f32>,
    #[prost(uint64, optional, tag = "3")]
    pub ratings_count: Option<u64>,
    #[prost(uint64, optional, tag = "4")]
    pub one_star_ratings: Option<u64>,
    #[prost(uint64, optional, tag = "5")]
    pub two_star_ratings: Option<u64>,
    #[prost(uint64, optional, tag = "6")]
    pub three_star_ratings: Option<u64>,
    #[prost(uint64, optional, tag = "7")]
    pub four_star_ratings: Option<u64>,
    #[prost(uint64, optional, tag = "8")]
    pub five_star_ratings: Option<u64>,
    #[prost(uint64, optional, tag = "11")]
    pub comment_count: Option<u64>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetails {
    #[prost(message, optional, tag = "1")]
    pub app_details: Option<AppDetails>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDetails {
    #[prost(string, optional, tag = "1")]
    pub developer_name: Option<String>,
    #[prost(int32, optional, tag = "2")]
    pub major_version_number: Option<i32>,
    #[prost(int32, optional, tag = "3")]
    pub version_code: Option<i32>,
    #[prost(string, optional, tag = "4")]
    pub version_string: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub title: Option<String>,
    #[prost(string, repeated, tag = "7")]
    pub app_category: Vec<String>,
    #[prost(int32, optional, tag = "8")]
    pub content_rating: Option<i32>,
    #[prost(int64, optional, tag = "9")]
    pub installation_size: Option<i64>,
    #[prost(string, repeated, tag = "10")]
    pub permission: Vec<String>,
    #[prost(string, optional, tag = "11")]
    pub developer_email: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub developer_website: Option<String>,
    #[prost(string, optional, tag = "13")]
    pub num_downloads: Option<String>,
    #[prost(string, optional, tag = "14")]
    pub package_name: Option<String>,
    #[prost(string, optional, tag = "15")]
    pub recent_changes_html: Option<String>,
    #[prost(string, optional, tag = "16")]
    pub upload_date: Option<String>,
}

/// A titled group of documents in list and search responses.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    #[prost(message, repeated, tag = "1")]
    pub document: Vec<DocV1>,
    #[prost(bool, optional, tag = "2")]
    pub multi_corpus: Option<bool>,
    #[prost(string, optional, tag = "3")]
    pub title: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub icon_url: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub full_contents_url: Option<String>,
    #[prost(double, optional, tag = "6")]
    pub relevance: Option<f64>,
    #[prost(int64, optional, tag = "7")]
    pub estimated_results: Option<i64>,
    #[prost(string, optional, tag = "8")]
    pub analytics_cookie: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub full_contents_list_url: Option<String>,
    #[prost(string, optional, tag = "10")]
    pub next_page_url: Option<String>,
    #[prost(bool, optional, tag = "11")]
    pub ordered: Option<bool>,
}
