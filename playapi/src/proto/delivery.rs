//! Purchase and delivery messages.

use serde::Serialize;

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyResponse {
    #[prost(string, optional, tag = "8")]
    pub continue_via_url: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub purchase_status_url: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub checkout_service_id: Option<String>,
    #[prost(bool, optional, tag = "13")]
    pub checkout_token_required: Option<bool>,
    #[prost(string, optional, tag = "14")]
    pub base_checkout_url: Option<String>,
    #[prost(message, optional, tag = "39")]
    pub purchase_status_response: Option<PurchaseStatusResponse>,
    #[prost(string, optional, tag = "46")]
    pub purchase_cookie: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStatusResponse {
    #[prost(int32, optional, tag = "1")]
    pub status: Option<i32>,
    #[prost(string, optional, tag = "2")]
    pub status_msg: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub status_title: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub brief_message: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub info_url: Option<String>,
    #[prost(message, optional, tag = "8")]
    pub app_delivery_data: Option<AndroidAppDeliveryData>,
}

/// Returned for apps the account already owns.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    #[prost(int32, optional, tag = "1")]
    pub status: Option<i32>,
    #[prost(message, optional, tag = "2")]
    pub app_delivery_data: Option<AndroidAppDeliveryData>,
}

/// Where and how to fetch an APK.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidAppDeliveryData {
    #[prost(int64, optional, tag = "1")]
    pub download_size: Option<i64>,
    #[prost(string, optional, tag = "2")]
    pub signature: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub download_url: Option<String>,
    #[prost(message, repeated, tag = "4")]
    pub additional_file: Vec<AppFileMetadata>,
    #[prost(message, repeated, tag = "5")]
    pub download_auth_cookie: Vec<HttpCookie>,
    #[prost(bool, optional, tag = "6")]
    pub forward_locked: Option<bool>,
    #[prost(int64, optional, tag = "7")]
    pub refund_timeout: Option<i64>,
    #[prost(bool, optional, tag = "8")]
    pub server_initiated: Option<bool>,
    #[prost(int64, optional, tag = "9")]
    pub post_install_refund_window_millis: Option<i64>,
    #[prost(bool, optional, tag = "10")]
    pub immediate_start_needed: Option<bool>,
}

/// Expansion files (OBBs) shipped alongside an APK.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFileMetadata {
    #[prost(int32, optional, tag = "1")]
    pub file_type: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub version_code: Option<i32>,
    #[prost(int64, optional, tag = "3")]
    pub size: Option<i64>,
    #[prost(string, optional, tag = "4")]
    pub download_url: Option<String>,
}

#[derive(Clone, PartialEq, Eq, prost::Message, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpCookie {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub value: Option<String>,
}
