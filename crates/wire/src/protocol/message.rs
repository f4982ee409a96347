use bytes::Bytes;

use crate::protocol::{HeaderStore, Request, Response};

/// An HTTP/1.x message: exactly one of a request or a response.
///
/// Both variants carry a [`HeaderStore`]; the first-line fields belong to
/// the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Request(Request),
    Response(Response),
}

impl Message {
    pub fn headers(&self) -> &HeaderStore {
        match self {
            Message::Request(request) => request.headers(),
            Message::Response(response) => response.headers(),
        }
    }

    pub fn headers_mut(&mut self) -> &mut HeaderStore {
        match self {
            Message::Request(request) => request.headers_mut(),
            Message::Response(response) => response.headers_mut(),
        }
    }

    /// Serializes the first line and header block.
    pub fn serialize(&self) -> String {
        match self {
            Message::Request(request) => request.serialize(),
            Message::Response(response) => response.serialize(),
        }
    }

    #[inline]
    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(_))
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        matches!(self, Message::Response(_))
    }

    pub fn into_request(self) -> Option<Request> {
        match self {
            Message::Request(request) => Some(request),
            Message::Response(_) => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Message::Request(_) => None,
            Message::Response(response) => Some(response),
        }
    }
}

impl From<Request> for Message {
    fn from(request: Request) -> Self {
        Message::Request(request)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Message::Response(response)
    }
}

/// One item produced by a streaming decoder: the parsed head of a message,
/// then its payload.
///
/// The generic parameter `T` is the head type, typically [`Response`].
#[derive(Debug)]
pub enum Frame<T> {
    /// The parsed first line and headers
    Head(T),
    /// A piece of payload data or the EOF marker
    Payload(PayloadItem),
}

impl<T> Frame<T> {
    /// Returns true if this frame contains payload data
    #[inline]
    pub fn is_payload(&self) -> bool {
        matches!(self, Frame::Payload(_))
    }

    /// Returns true if this frame contains the message head
    #[inline]
    pub fn is_head(&self) -> bool {
        matches!(self, Frame::Head(_))
    }

    /// Converts the frame into a PayloadItem if it contains payload data
    pub fn into_payload_item(self) -> Option<PayloadItem> {
        match self {
            Frame::Head(_) => None,
            Frame::Payload(payload_item) => Some(payload_item),
        }
    }
}

/// Represents an item in the HTTP message payload stream.
///
/// Body decoders produce either data chunks or signal the end of the payload
/// stream (EOF).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem {
    /// A chunk of payload data
    Chunk(Bytes),
    /// Marks the end of the payload stream
    Eof,
}

impl PayloadItem {
    /// Returns true if this item represents the end of the payload stream
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, PayloadItem::Eof)
    }

    /// Returns true if this item contains chunk data
    #[inline]
    pub fn is_chunk(&self) -> bool {
        matches!(self, PayloadItem::Chunk(_))
    }

    /// Returns a reference to the contained bytes if this is a Chunk
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            PayloadItem::Chunk(bytes) => Some(bytes),
            PayloadItem::Eof => None,
        }
    }

    /// Consumes the PayloadItem and returns the contained bytes if this is a Chunk
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            PayloadItem::Chunk(bytes) => Some(bytes),
            PayloadItem::Eof => None,
        }
    }
}

/// How the body after a message head is framed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes
    Length(u64),
    /// Payload using chunked transfer encoding
    Chunked,
    /// Payload that runs until the peer closes the connection
    UntilClose,
    /// Empty payload (no body)
    Empty,
}

impl PayloadSize {
    /// Returns true if the payload uses chunked transfer encoding
    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, PayloadSize::Chunked)
    }

    /// Returns true if the payload is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, PayloadSize::Empty | PayloadSize::Length(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_exposes_variant_headers() {
        let mut request = Request::create_default_get_request("/index.m3u8");
        request.set_host("example.org");
        let mut message = Message::from(request);

        assert!(message.is_request());
        assert_eq!(message.headers().get("Host"), Some("example.org"));

        message.headers_mut().set("Accept", "*/*");
        assert_eq!(message.serialize(), "GET /index.m3u8 HTTP/1.1\r\nAccept: */*\r\nHost: example.org\r\n\r\n");
        assert!(message.clone().into_response().is_none());
        assert!(message.into_request().is_some());
    }

    #[test]
    fn response_variant() {
        let message = Message::from(Response::create_standard_response(0, 404, None, "HTTP/1.1"));
        assert!(message.is_response());
        assert_eq!(message.headers().get("Content-Length"), Some("0"));
    }
}
