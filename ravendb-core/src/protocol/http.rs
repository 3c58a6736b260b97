//! Transport-neutral HTTP request and response types.
//!
//! Commands render themselves into an [`HttpRequest`]; a transport turns it into
//! bytes on the wire and hands back an [`HttpResponse`]. No I/O happens here.

use std::fmt;

use bytes::Bytes;

use super::constants::*;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the method token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    name: String,
    content_type: &'static str,
    fields: Vec<(String, String)>,
    content: Bytes,
}

impl MultipartPart {
    /// Returns the form-data name of the part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the media type of the part.
    pub fn content_type(&self) -> &str {
        self.content_type
    }

    /// Returns the extra header fields of the part.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Returns the value of an extra header field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the part payload.
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

/// A `multipart/form-data` body: one JSON part named `main` followed by
/// attachment parts named `attachment1..N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    parts: Vec<MultipartPart>,
}

impl MultipartBody {
    /// Creates a multipart body whose first part is the given JSON document.
    pub fn new(main: Bytes) -> Self {
        Self {
            parts: vec![MultipartPart {
                name: MULTIPART_MAIN_PART.to_string(),
                content_type: APPLICATION_JSON,
                fields: Vec::new(),
                content: main,
            }],
        }
    }

    /// Appends an attachment stream part. Parts are numbered from 1 in the order
    /// they are added.
    pub fn add_attachment(&mut self, content: Bytes) {
        let number = self.parts.len();
        self.parts.push(MultipartPart {
            name: format!("{MULTIPART_ATTACHMENT_PART_PREFIX}{number}"),
            content_type: APPLICATION_OCTET_STREAM,
            fields: vec![(
                COMMAND_TYPE_FIELD.to_string(),
                ATTACHMENT_STREAM_COMMAND_TYPE.to_string(),
            )],
            content,
        });
    }

    /// Returns the JSON part.
    pub fn main(&self) -> &Bytes {
        &self.parts[0].content
    }

    /// Returns the attachment parts, in order.
    pub fn attachments(&self) -> &[MultipartPart] {
        &self.parts[1..]
    }

    /// Returns all parts, `main` first.
    pub fn parts(&self) -> &[MultipartPart] {
        &self.parts
    }
}

/// Rendered request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// A plain `application/json` entity.
    Json(Bytes),
    /// JSON plus binary attachment parts.
    Multipart(MultipartBody),
}

impl RequestBody {
    /// Returns the JSON document of the body, regardless of framing.
    pub fn json(&self) -> &Bytes {
        match self {
            Self::Json(json) => json,
            Self::Multipart(multipart) => multipart.main(),
        }
    }
}

/// An outbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the full URL including the query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the query string (without `?`), if any.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// Returns all headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the value of the first header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the value of the first header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
