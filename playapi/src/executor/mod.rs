//! Central request dispatcher for `fdfe` endpoints.
//!
//! Every catalog operation funnels through [`RequestExecutor::execute`]:
//!
//! ```text
//! execute(path, body)
//!     │
//!     ├── no body and path pre-fetched? ── yes ──> cached bytes
//!     │                                  no
//!     ├── build headers, GET or POST via Transport ──> raw bytes
//!     │
//!     ├── decode ResponseWrapper (DecodeError on bad bytes)
//!     │
//!     └── harvest preFetch entries into the session cache
//! ```
//!
//! Nothing is retried here; transport and decode failures propagate as-is.

pub mod headers;

use std::sync::Arc;

use tracing::debug;

use crate::codec;
use crate::error::ApiResult;
use crate::proto::ResponseWrapper;
use crate::session::Session;
use crate::transport::Transport;

pub use headers::Endpoints;

/// Body of a POST request. The variant decides the `Content-Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` fields, already encoded.
    Form(String),
    /// A protobuf-encoded request message.
    Protobuf(Vec<u8>),
}

impl RequestBody {
    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::Form(_) => headers::FORM_CONTENT_TYPE,
            RequestBody::Protobuf(_) => headers::PROTOBUF_CONTENT_TYPE,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RequestBody::Form(form) => form.as_bytes(),
            RequestBody::Protobuf(bytes) => bytes,
        }
    }
}

/// Executes `fdfe` requests on behalf of a [`Session`].
pub struct RequestExecutor<T: Transport> {
    transport: Arc<T>,
    session: Session,
    endpoints: Endpoints,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: Arc<T>, session: Session, endpoints: Endpoints) -> Self {
        Self {
            transport,
            session,
            endpoints,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Executes a request against `path`, relative to the API base.
    ///
    /// Without a body the request is a GET, unless the path was pre-fetched
    /// by an earlier response, in which case no request is made at all.
    /// With a body it is always a POST.
    pub fn execute(&mut self, path: &str, body: Option<RequestBody>) -> ApiResult<ResponseWrapper> {
        let raw = match body {
            None => match self.session.prefetch().get(path) {
                Some(cached) => {
                    debug!(path, "Serving from pre-fetch cache");
                    cached.to_vec()
                }
                None => self.send(path, None)?,
            },
            Some(body) => self.send(path, Some(&body))?,
        };

        let message = codec::decode_response(&raw)?;

        let harvested = self.session.prefetch_mut().harvest(&message.pre_fetch);
        if harvested > 0 {
            debug!(path, harvested, "Stored pre-fetch entries");
        }

        Ok(message)
    }

    fn send(&self, path: &str, body: Option<&RequestBody>) -> ApiResult<Vec<u8>> {
        let url = self.endpoints.api_url(path);
        let mut request_headers = headers::api_headers(&self.session, &self.endpoints.host);

        let raw = match body {
            Some(body) => {
                request_headers.push(("Content-Type", body.content_type().to_string()));
                debug!(%url, content_type = body.content_type(), "POST");
                self.transport.post(&url, &request_headers, body.as_bytes())?
            }
            None => {
                debug!(%url, "GET");
                self.transport.get(&url, &request_headers)?
            }
        };

        debug!(%url, bytes = raw.len(), "Response received");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, TransportError};
    use crate::proto::{DetailsResponse, DocV2, Payload, PreFetch};
    use crate::session::DeviceIdentity;
    use crate::transport::{MockTransport, RequestMethod};

    fn details_bytes(docid: &str) -> Vec<u8> {
        codec::encode(&ResponseWrapper {
            payload: Some(Payload {
                details_response: Some(DetailsResponse {
                    doc_v2: Some(DocV2 {
                        docid: Some(docid.to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn executor(mock: MockTransport) -> (Arc<MockTransport>, RequestExecutor<MockTransport>) {
        let transport = Arc::new(mock);
        let mut session = Session::new(DeviceIdentity::new("dev", "en_US"));
        session.authenticate_with_token("tok");
        let executor = RequestExecutor::new(transport.clone(), session, Endpoints::default());
        (transport, executor)
    }

    fn docid(message: &ResponseWrapper) -> Option<&str> {
        message
            .payload
            .as_ref()?
            .details_response
            .as_ref()?
            .doc_v2
            .as_ref()?
            .docid
            .as_deref()
    }

    #[test]
    fn test_get_without_body() {
        let (transport, mut executor) =
            executor(MockTransport::with_responses([details_bytes("a")]));

        let message = executor.execute("details?doc=a", None).unwrap();
        assert_eq!(docid(&message), Some("a"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, RequestMethod::Get);
        assert_eq!(
            requests[0].url,
            "https://android.clients.google.com/fdfe/details?doc=a"
        );
        assert_eq!(requests[0].header("Authorization"), Some("GoogleLogin auth=tok"));
        assert_eq!(requests[0].header("Content-Type"), None);
    }

    #[test]
    fn test_post_sets_content_type_from_body() {
        let (transport, mut executor) = executor(MockTransport::with_responses([
            details_bytes("a"),
            details_bytes("b"),
        ]));

        executor
            .execute("purchase", Some(RequestBody::Form("ot=1".to_string())))
            .unwrap();
        executor
            .execute("bulkDetails", Some(RequestBody::Protobuf(vec![0x0a, 0x00])))
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, RequestMethod::Post);
        assert_eq!(requests[0].header("Content-Type"), Some(headers::FORM_CONTENT_TYPE));
        assert_eq!(requests[0].body.as_deref(), Some(&b"ot=1"[..]));
        assert_eq!(
            requests[1].header("Content-Type"),
            Some(headers::PROTOBUF_CONTENT_TYPE)
        );
    }

    #[test]
    fn test_pre_fetch_entries_served_without_network() {
        let first = codec::encode(&ResponseWrapper {
            pre_fetch: vec![
                PreFetch {
                    url: Some("details?doc=x".to_string()),
                    response: Some(details_bytes("x")),
                    ..Default::default()
                },
                PreFetch {
                    url: Some("details?doc=y".to_string()),
                    response: Some(details_bytes("y")),
                    ..Default::default()
                },
            ],
            ..Default::default()
        });
        let (transport, mut executor) = executor(MockTransport::with_responses([first]));

        executor.execute("search?c=3&q=x", None).unwrap();
        assert!(executor.session().prefetch().contains("details?doc=x"));
        assert!(executor.session().prefetch().contains("details?doc=y"));
        assert_eq!(transport.call_count(), 1);

        let message = executor.execute("details?doc=x", None).unwrap();
        assert_eq!(docid(&message), Some("x"));
        let message = executor.execute("details?doc=y", None).unwrap();
        assert_eq!(docid(&message), Some("y"));
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_pre_fetch_hit_is_repeatable() {
        let (transport, mut executor) = executor(MockTransport::new());
        executor
            .session_mut()
            .prefetch_mut()
            .insert("details?doc=x", details_bytes("x"));

        executor.execute("details?doc=x", None).unwrap();
        executor.execute("details?doc=x", None).unwrap();
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_body_bypasses_pre_fetch_cache() {
        let (transport, mut executor) =
            executor(MockTransport::with_responses([details_bytes("net")]));
        executor
            .session_mut()
            .prefetch_mut()
            .insert("purchase", details_bytes("cached"));

        let message = executor
            .execute("purchase", Some(RequestBody::Form("doc=a".to_string())))
            .unwrap();
        assert_eq!(docid(&message), Some("net"));
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_identical_posts_are_not_deduplicated() {
        let (transport, mut executor) = executor(MockTransport::with_responses([
            details_bytes("a"),
            details_bytes("a"),
        ]));
        let body = RequestBody::Form("ot=1&doc=a&vc=1".to_string());

        executor.execute("purchase", Some(body.clone())).unwrap();
        executor.execute("purchase", Some(body)).unwrap();
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_corrupt_response_is_decode_error() {
        let (_, mut executor) = executor(MockTransport::with_responses([vec![0x0a, 0x10, 0x01]]));

        let err = executor.execute("details?doc=a", None).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(executor.session().prefetch().is_empty());
    }

    #[test]
    fn test_corrupt_pre_fetched_entry_is_decode_error() {
        let (transport, mut executor) = executor(MockTransport::new());
        executor
            .session_mut()
            .prefetch_mut()
            .insert("details?doc=x", vec![0xff]);

        let err = executor.execute("details?doc=x", None).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_transport_error_propagates() {
        let mock = MockTransport::new();
        mock.push_error(TransportError::Status {
            url: "u".to_string(),
            status: 401,
        });
        let (_, mut executor) = executor(mock);

        let err = executor.execute("details?doc=a", None).unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Status { status: 401, .. })));
    }

    #[test]
    fn test_custom_endpoints() {
        let transport = Arc::new(MockTransport::with_responses([details_bytes("a")]));
        let session = Session::new(DeviceIdentity::new("dev", "en_US"));
        let mut executor =
            RequestExecutor::new(transport.clone(), session, Endpoints::for_host("mirror.test"));

        executor.execute("details?doc=a", None).unwrap();
        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://mirror.test/fdfe/details?doc=a");
        assert_eq!(request.header("Host"), Some("mirror.test"));
        assert_eq!(request.header("Authorization"), Some("GoogleLogin auth="));
    }
}
