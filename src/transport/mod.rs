//! HTTP transport seam
//!
//! Gateway operations describe requests as [`RequestDescriptor`] values and
//! hand them to an [`HttpTransport`] implementation. Adapters only move
//! bytes: [`ReqwestTransport`] for anything with a socket, [`MockTransport`]
//! for tests. Status interpretation, error mapping, and session teardown
//! live above this seam in the gateway.

mod http;
mod mock;
mod traits;

pub use http::ReqwestTransport;
pub use mock::MockTransport;
pub use traits::{HttpTransport, Method, RawResponse, RequestBody, RequestDescriptor, MULTIPART_FIELD};
