//! Wire layer for kotori.
//!
//! Everything that touches bytes on the network lives here:
//!
//! - [`codec`] — the ledger document format: pretty-printed UTF-8 JSON,
//!   base64-encoded for the content API
//! - [`contents`] — request/response types and URL builders for the
//!   Git-hosting content API
//! - [`http`] — the transport-agnostic [`HttpTransport`] seam plus plain
//!   request/response structs
//! - [`transport`] — the production hyper-based transport
//!
//! Clients above this crate never construct hyper types; they build
//! [`HttpRequest`] values and hand them to a transport, which keeps the
//! ledger and reaction clients testable with a scripted fake.

pub mod codec;
pub mod contents;
pub mod error;
pub mod http;
pub mod transport;

pub use codec::{commit_message, decode_document, decode_plain_document, encode_document};
pub use contents::{ContentsPutRequest, ContentsPutResponse, ContentsResponse, LEDGER_PATH};
pub use error::{CodecError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use transport::HyperTransport;
