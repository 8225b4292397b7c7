// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Async HTTP client wrapping reqwest.
//!
//! One shared connection pool for every source. Each call carries its own
//! timeout, and there are no retries: a failed call advances the fallback
//! chain instead.

use anyhow::Result;
use std::time::Duration;

/// Response from an upstream request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, decoded using the charset the server declared.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client shared by all source adapters.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client that identifies as a desktop browser.
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// GET `url` with query parameters and extra headers.
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<HttpResponse> {
        let mut builder = self.client.get(url).timeout(timeout);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        Self::finish(builder).await
    }

    /// POST url-encoded form fields.
    pub async fn post_form(
        &self,
        url: &str,
        form_fields: &[(&str, &str)],
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<HttpResponse> {
        let mut builder = self.client.post(url).timeout(timeout);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder = builder.form(form_fields);
        Self::finish(builder).await
    }

    async fn finish(builder: reqwest::RequestBuilder) -> Result<HttpResponse> {
        let r = builder.send().await?;
        let status = r.status().as_u16();
        let body = r.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Whether a transport error was caused by the request timeout.
pub fn is_timeout(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_timeout)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new("parcel-tracker-test");
        let _ = client.clone();
    }

    #[test]
    fn test_success_range() {
        let mut resp = HttpResponse {
            status: 204,
            body: String::new(),
        };
        assert!(resp.is_success());
        resp.status = 302;
        assert!(!resp.is_success());
        resp.status = 503;
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn test_redirect_is_followed_to_body() {
        use wiremock::matchers::path;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(path("/old"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("배달완료"))
            .mount(&server)
            .await;

        let resp = HttpClient::new("parcel-tracker-test")
            .get(&format!("{}/old", server.uri()), &[], &[], Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "배달완료");
    }

    #[test]
    fn test_non_reqwest_error_is_not_timeout() {
        let err = anyhow::anyhow!("connection reset");
        assert!(!is_timeout(&err));
    }
}
