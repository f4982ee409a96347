//! HTTP/1.x message model.
//!
//! - **Headers** ([`header`]): [`HeaderStore`], the case-sensitive, name
//!   ordered header bag shared by both message kinds
//! - **Requests** ([`request`]): [`Request`] with its request line fields
//! - **Responses** ([`response`]): [`Response`] with its status line fields,
//!   body and the default status description table
//! - **Messages** ([`message`]): the closed [`Message`] pair, plus the
//!   [`Frame`], [`PayloadItem`] and [`PayloadSize`] vocabulary used by the
//!   streaming decoders
//! - **Errors** ([`error`]): [`ParseError`], [`TransportError`] and the
//!   top-level [`HttpError`]

mod header;
pub use header::CRLF;
pub use header::HEADER_DELIMITER;
pub use header::HeaderStore;
pub use header::Iter as HeaderIter;

mod message;
pub use message::Frame;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

pub mod request;
pub use request::Request;

pub mod response;
pub use response::Response;
pub use response::default_status_description;
pub use response::http_date;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::TransportError;
