// src/services/fetcher.rs

//! Single-attempt page fetcher.
//!
//! Issues one GET and folds every possible result into a [`FetchOutcome`].
//! Nothing here returns an error: missing pages and flaky upstreams are
//! values the caller decides about.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::models::{FetchOutcome, TransientReason};

/// Source of page fetches.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Make one attempt at `url`.
    async fn fetch(&self, url: &Url) -> FetchOutcome;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, url: &Url) -> FetchOutcome {
        (**self).fetch(url).await
    }
}

/// Fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wrap a client built by [`create_async_client`](crate::utils::http::create_async_client).
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchOutcome {
        log::debug!("Fetch {}", url);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Transient(TransientReason::Transport(e.to_string())),
        };

        let status = response.status();
        log::debug!(
            "Got {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );

        // Only a 200 body is worth reading
        if status != StatusCode::OK {
            return classify(status, String::new());
        }

        match response.text().await {
            Ok(body) => classify(status, body),
            Err(e) => FetchOutcome::Transient(TransientReason::Transport(e.to_string())),
        }
    }
}

/// Map a status and decoded body to an outcome.
pub fn classify(status: StatusCode, body: String) -> FetchOutcome {
    match status {
        StatusCode::OK if body.is_empty() => FetchOutcome::Transient(TransientReason::EmptyBody),
        StatusCode::OK => FetchOutcome::Found(body),
        StatusCode::NOT_FOUND => FetchOutcome::Absent,
        other => FetchOutcome::Transient(TransientReason::Status(other.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::models::CrawlerConfig;
    use crate::utils::http::create_async_client;

    /// Answer one connection with `response` and return the request head.
    async fn serve_once(response: String) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (Url::parse(&format!("http://{addr}/user/1")).unwrap(), handle)
    }

    fn response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(create_async_client(&CrawlerConfig::default()).unwrap())
    }

    #[test]
    fn test_ok_with_body_is_found() {
        assert_eq!(
            classify(StatusCode::OK, "<html></html>".into()),
            FetchOutcome::Found("<html></html>".into())
        );
    }

    #[test]
    fn test_ok_with_empty_body_is_transient() {
        assert_eq!(
            classify(StatusCode::OK, String::new()),
            FetchOutcome::Transient(TransientReason::EmptyBody)
        );
    }

    #[test]
    fn test_not_found_is_absent() {
        // Body of a 404 is irrelevant
        assert_eq!(
            classify(StatusCode::NOT_FOUND, "not here".into()),
            FetchOutcome::Absent
        );
    }

    #[test]
    fn test_other_statuses_are_transient() {
        for status in [
            StatusCode::NO_CONTENT,
            StatusCode::MOVED_PERMANENTLY,
            StatusCode::FORBIDDEN,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert_eq!(
                classify(status, "body".into()),
                FetchOutcome::Transient(TransientReason::Status(status.as_u16())),
                "status {status}"
            );
        }
    }

    #[tokio::test]
    async fn test_connection_failure_is_transient() {
        // Port 9 on loopback with nothing listening refuses the connection
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let fetcher = HttpFetcher::new(client);
        let url = Url::parse("http://127.0.0.1:9/user/1").unwrap();

        let outcome = fetcher.fetch(&url).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Transient(TransientReason::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_served_page_is_found_and_sends_user_agent() {
        let body = r#"<a href="/user/1/tags/sea">sea</a>"#;
        let (url, server) = serve_once(response("200 OK", body)).await;

        let outcome = fetcher().fetch(&url).await;
        assert_eq!(outcome, FetchOutcome::Found(body.into()));

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /user/1 "));
        assert!(request.contains("user-agent: archiveteam"));
    }

    #[tokio::test]
    async fn test_served_empty_200_is_transient() {
        let (url, server) = serve_once(response("200 OK", "")).await;

        assert_eq!(
            fetcher().fetch(&url).await,
            FetchOutcome::Transient(TransientReason::EmptyBody)
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_served_404_is_absent() {
        let (url, server) = serve_once(response("404 Not Found", "not found")).await;

        assert_eq!(fetcher().fetch(&url).await, FetchOutcome::Absent);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_served_503_is_transient() {
        let (url, server) = serve_once(response("503 Service Unavailable", "busy")).await;

        assert_eq!(
            fetcher().fetch(&url).await,
            FetchOutcome::Transient(TransientReason::Status(503))
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_truncated_body_is_transport_failure() {
        // Promises 100 bytes, sends 5, then closes
        let raw = "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nhello";
        let (url, server) = serve_once(raw.to_string()).await;

        assert!(matches!(
            fetcher().fetch(&url).await,
            FetchOutcome::Transient(TransientReason::Transport(_))
        ));
        server.await.unwrap();
    }
}
