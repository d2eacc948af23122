//! Purchase and delivery of APKs.
//!
//! Both flows end in a [`DownloadTicket`] (signed URL + first auth cookie)
//! handed to the binary fetcher. `purchase` is a POST that also acquires
//! free apps; `delivery` is a GET for apps the account already owns.

use tracing::debug;
use url::form_urlencoded;

use super::{quote, take_payload, PlayApi};
use crate::error::{ApiResult, ProtocolError};
use crate::executor::RequestBody;
use crate::fetcher::{AuthCookie, DownloadTicket, Progress};
use crate::proto::AndroidAppDeliveryData;
use crate::transport::Transport;

/// Offer type of a regular app install.
pub const DEFAULT_OFFER_TYPE: i32 = 1;

impl<T: Transport> PlayApi<T> {
    /// Purchases (or acquires, if free) an app version and returns where to
    /// download it.
    pub fn purchase_ticket(
        &mut self,
        package: &str,
        version_code: i32,
        offer_type: i32,
    ) -> ApiResult<DownloadTicket> {
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("ot", &offer_type.to_string())
            .append_pair("doc", package)
            .append_pair("vc", &version_code.to_string())
            .finish();

        let message = self.executor.execute("purchase", Some(RequestBody::Form(form)))?;
        let status = take_payload(message, "download", "buyResponse", |p| p.buy_response)?
            .purchase_status_response
            .ok_or(ProtocolError::MissingPayload {
                operation: "download",
                field: "buyResponse.purchaseStatusResponse",
            })?;

        ticket_from(status.app_delivery_data, "download").map_err(Into::into)
    }

    /// Returns where to download an app version the account already owns.
    pub fn delivery_ticket(
        &mut self,
        package: &str,
        version_code: i32,
        offer_type: i32,
    ) -> ApiResult<DownloadTicket> {
        let path = format!(
            "delivery?ot={}&doc={}&vc={}",
            offer_type,
            quote(package),
            version_code
        );

        let message = self.executor.execute(&path, None)?;
        let delivery =
            take_payload(message, "delivery", "deliveryResponse", |p| p.delivery_response)?;

        ticket_from(delivery.app_delivery_data, "delivery").map_err(Into::into)
    }

    /// Purchases an app version and downloads its APK.
    ///
    /// With `progress`, the APK is streamed and the callback receives
    /// `(bytes_so_far, total_expected)` per chunk.
    pub fn download(
        &mut self,
        package: &str,
        version_code: i32,
        offer_type: i32,
        progress: Option<Progress<'_>>,
    ) -> ApiResult<Vec<u8>> {
        let ticket = self.purchase_ticket(package, version_code, offer_type)?;
        debug!(package, version_code, "Purchase accepted, fetching APK");
        self.fetcher.fetch(&ticket, progress).map_err(Into::into)
    }

    /// Downloads the APK of an app version the account already owns.
    pub fn delivery(
        &mut self,
        package: &str,
        version_code: i32,
        offer_type: i32,
        progress: Option<Progress<'_>>,
    ) -> ApiResult<Vec<u8>> {
        let ticket = self.delivery_ticket(package, version_code, offer_type)?;
        debug!(package, version_code, "Delivery accepted, fetching APK");
        self.fetcher.fetch(&ticket, progress).map_err(Into::into)
    }
}

fn ticket_from(
    data: Option<AndroidAppDeliveryData>,
    operation: &'static str,
) -> Result<DownloadTicket, ProtocolError> {
    let data = data.ok_or(ProtocolError::MissingDeliveryData { operation })?;

    let url = data
        .download_url
        .filter(|url| !url.is_empty())
        .ok_or(ProtocolError::MissingDownloadUrl { operation })?;

    let cookie = data
        .download_auth_cookie
        .into_iter()
        .next()
        .ok_or(ProtocolError::MissingAuthCookie { operation })?;

    Ok(DownloadTicket {
        url,
        cookie: AuthCookie {
            name: cookie.name.unwrap_or_default(),
            value: cookie.value.unwrap_or_default(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{api_with, wrap};
    use crate::error::ApiError;
    use crate::proto::{BuyResponse, DeliveryResponse, HttpCookie, Payload, PurchaseStatusResponse};
    use crate::transport::{MockTransport, RequestMethod};

    fn delivery_data() -> AndroidAppDeliveryData {
        AndroidAppDeliveryData {
            download_url: Some("https://dl.example/apk?sig=abc".to_string()),
            download_auth_cookie: vec![
                HttpCookie {
                    name: Some("MarketDA".to_string()),
                    value: Some("first".to_string()),
                },
                HttpCookie {
                    name: Some("Second".to_string()),
                    value: Some("ignored".to_string()),
                },
            ],
            download_size: Some(4),
            ..Default::default()
        }
    }

    fn buy_response(data: Option<AndroidAppDeliveryData>) -> Vec<u8> {
        wrap(Payload {
            buy_response: Some(BuyResponse {
                purchase_status_response: Some(PurchaseStatusResponse {
                    status: Some(1),
                    app_delivery_data: data,
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn delivery_response(data: Option<AndroidAppDeliveryData>) -> Vec<u8> {
        wrap(Payload {
            delivery_response: Some(DeliveryResponse {
                status: Some(1),
                app_delivery_data: data,
            }),
            ..Default::default()
        })
    }

    #[test]
    fn test_download_purchases_then_fetches_with_first_cookie() {
        let (transport, mut api) = api_with(MockTransport::with_responses([
            buy_response(Some(delivery_data())),
            b"APK!".to_vec(),
        ]));

        let apk = api.download("com.example.app", 42, DEFAULT_OFFER_TYPE, None).unwrap();
        assert_eq!(apk, b"APK!");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);

        assert_eq!(requests[0].method, RequestMethod::Post);
        assert!(requests[0].url.ends_with("/fdfe/purchase"));
        assert_eq!(
            requests[0].body.as_deref(),
            Some(&b"ot=1&doc=com.example.app&vc=42"[..])
        );

        assert_eq!(requests[1].url, "https://dl.example/apk?sig=abc");
        assert_eq!(requests[1].header_values("Cookie"), vec!["MarketDA=first"]);
    }

    #[test]
    fn test_delivery_gets_then_fetches_with_first_cookie() {
        let (transport, mut api) = api_with(MockTransport::with_responses([
            delivery_response(Some(delivery_data())),
            b"APK!".to_vec(),
        ]));

        let apk = api.delivery("com.example.app", 42, 1, None).unwrap();
        assert_eq!(apk, b"APK!");

        let requests = transport.requests();
        assert_eq!(requests[0].method, RequestMethod::Get);
        assert!(requests[0]
            .url
            .ends_with("/fdfe/delivery?ot=1&doc=com.example.app&vc=42"));
        assert_eq!(requests[1].url, "https://dl.example/apk?sig=abc");
        assert_eq!(requests[1].header_values("Cookie"), vec!["MarketDA=first"]);
    }

    #[test]
    fn test_tickets_match_across_response_shapes() {
        let (_, mut api) = api_with(MockTransport::with_responses([
            buy_response(Some(delivery_data())),
            delivery_response(Some(delivery_data())),
        ]));

        let purchased = api.purchase_ticket("com.example.app", 1, 1).unwrap();
        let delivered = api.delivery_ticket("com.example.app", 1, 1).unwrap();
        assert_eq!(purchased, delivered);
        assert_eq!(
            purchased.cookie,
            AuthCookie {
                name: "MarketDA".to_string(),
                value: "first".to_string(),
            }
        );
    }

    #[test]
    fn test_download_streams_with_progress() {
        let (_, mut api) = api_with(MockTransport::with_responses([
            buy_response(Some(delivery_data())),
            vec![0u8; 3000],
        ]));

        let mut calls = 0;
        let mut on_progress = |_: u64, total: Option<u64>| {
            assert_eq!(total, Some(3000));
            calls += 1;
        };
        let apk = api
            .download("com.example.app", 1, 1, Some(&mut on_progress))
            .unwrap();
        assert_eq!(apk.len(), 3000);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_missing_delivery_data() {
        let (transport, mut api) = api_with(MockTransport::with_responses([buy_response(None)]));

        let err = api.download("com.example.app", 1, 1, None).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Protocol(ProtocolError::MissingDeliveryData { operation: "download" })
        ));
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_missing_cookie() {
        let mut data = delivery_data();
        data.download_auth_cookie.clear();
        let (_, mut api) = api_with(MockTransport::with_responses([delivery_response(Some(data))]));

        let err = api.delivery("com.example.app", 1, 1, None).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Protocol(ProtocolError::MissingAuthCookie { operation: "delivery" })
        ));
    }

    #[test]
    fn test_missing_url() {
        let mut data = delivery_data();
        data.download_url = None;
        let (_, mut api) = api_with(MockTransport::with_responses([delivery_response(Some(data))]));

        let err = api.delivery_ticket("com.example.app", 1, 1).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Protocol(ProtocolError::MissingDownloadUrl { .. })
        ));
    }

    #[test]
    fn test_delivery_wrong_payload_shape() {
        let (_, mut api) = api_with(MockTransport::with_responses([buy_response(Some(
            delivery_data(),
        ))]));

        let err = api.delivery_ticket("com.example.app", 1, 1).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Protocol(ProtocolError::MissingPayload {
                field: "deliveryResponse",
                ..
            })
        ));
    }
}
