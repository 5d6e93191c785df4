//! Wrapped HTTP calls against the voting backend.
//! - Builds one request per call from an endpoint and [`RequestOptions`].
//! - Decodes JSON bodies, substituting a sentinel payload for undecodable ones.
//! - Maps failing statuses and transport failures to [`ApiError`].

pub mod api;
pub mod errors;
pub mod request;
pub mod resolver;
pub mod response;

pub use api::ApiClient;
pub use errors::{classify, ApiError, TransportFailure};
pub use request::{build_request, HttpMethod, RequestDescriptor, RequestOptions};
pub use response::{decode_payload, error_message};
