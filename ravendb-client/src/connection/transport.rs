//! HTTP transport seam and its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use ravendb_core::protocol::constants::{APPLICATION_JSON, HEADER_CONTENT_TYPE};
use ravendb_core::{
    HttpMethod, HttpRequest, HttpResponse, MultipartBody, RavenError, RequestBody, Result,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// Sends rendered requests to a node.
///
/// Implementations only move bytes; status codes are interpreted by the
/// [`RequestExecutor`](super::RequestExecutor).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and returns the raw response, whatever its status.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RavenError::Connection(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn map_send_error(e: reqwest::Error) -> RavenError {
    if e.is_timeout() {
        RavenError::Timeout(format!("HTTP request timed out: {}", e))
    } else {
        RavenError::Connection(format!("HTTP request failed: {}", e))
    }
}

fn invalid_part(part: &str, e: impl std::fmt::Display) -> RavenError {
    RavenError::IllegalArgument(format!("Invalid multipart part '{part}': {e}"))
}

/// Maps a multipart body onto a reqwest form. Payloads are shared, not copied.
fn to_form(multipart: &MultipartBody) -> Result<Form> {
    let mut form = Form::new();
    for part in multipart.parts() {
        let mut headers = HeaderMap::new();
        for (name, value) in part.fields() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| invalid_part(part.name(), e))?;
            let value = HeaderValue::from_str(value).map_err(|e| invalid_part(part.name(), e))?;
            headers.insert(name, value);
        }
        let content = part.content().clone();
        let length = content.len() as u64;
        let wire_part = Part::stream_with_length(content, length)
            .mime_str(part.content_type())
            .map_err(|e| invalid_part(part.name(), e))?
            .headers(headers);
        form = form.part(part.name().to_string(), wire_part);
    }
    Ok(form)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), request.url());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body() {
            Some(RequestBody::Json(json)) => builder
                .header(HEADER_CONTENT_TYPE, APPLICATION_JSON)
                .body(json.clone()),
            Some(RequestBody::Multipart(multipart)) => {
                debug!(parts = multipart.parts().len(), "sending multipart body");
                builder.multipart(to_form(multipart)?)
            }
            None => builder,
        };

        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| {
            RavenError::Connection(format!("Failed to read response body: {}", e))
        })?;

        debug!(status, bytes = body.len(), "received HTTP response");

        Ok(headers
            .into_iter()
            .fold(HttpResponse::new(status, body), |response, (name, value)| {
                response.with_header(name, value)
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Accepts one connection, returns the raw request and answers 201.
    async fn capture_one_request(listener: TcpListener) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
            if raw.ends_with(b"--\r\n") {
                break;
            }
        }
        socket
            .write_all(b"HTTP/1.1 201 Created\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}")
            .await
            .unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest_method(HttpMethod::Post), reqwest::Method::POST);
        assert_eq!(to_reqwest_method(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(HttpMethod::Put), reqwest::Method::PUT);
        assert_eq!(to_reqwest_method(HttpMethod::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn test_form_from_multipart_body() {
        let mut multipart = MultipartBody::new(Bytes::from_static(b"{}"));
        multipart.add_attachment(Bytes::from_static(b"abc"));
        let form = to_form(&multipart).unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[tokio::test]
    async fn test_multipart_body_on_the_wire() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/databases/db/bulk_docs?", listener.local_addr().unwrap());
        let server = tokio::spawn(capture_one_request(listener));

        let mut multipart = MultipartBody::new(Bytes::from_static(b"{\"Commands\":[]}"));
        multipart.add_attachment(Bytes::from_static(b"attachment-bytes"));
        let request = HttpRequest::new(HttpMethod::Post, url)
            .with_body(RequestBody::Multipart(multipart));

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status(), 201);

        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.contains("content-type: multipart/form-data; boundary="));
        assert!(raw.contains("name=\"main\""));
        assert!(raw.contains("content-type: application/json"));
        assert!(raw.contains("{\"commands\":[]}"));
        assert!(raw.contains("name=\"attachment1\""));
        assert!(raw.contains("content-type: application/octet-stream"));
        assert!(raw.contains("command-type: attachmentstream"));
        assert!(raw.contains("attachment-bytes"));
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestTransport>();
    }

    #[tokio::test]
    async fn test_unreachable_node_is_connection_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let request = HttpRequest::new(HttpMethod::Get, "http://127.0.0.1:1/databases");
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(
            err,
            RavenError::Connection(_) | RavenError::Timeout(_)
        ));
    }
}
