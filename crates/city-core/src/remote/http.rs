//! HTTP implementation of the remote city source.

use std::time::Duration;

use async_trait::async_trait;

use super::{is_http_url, parse_city_records, CityRecord, CitySource};
use crate::{Error, Result};

const ERROR_BODY_EXCERPT_CHARS: usize = 180;

/// Fetches the catalog document with a GET request
#[derive(Clone)]
pub struct HttpCitySource {
    url: String,
    client: reqwest::Client,
}

impl HttpCitySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if !is_http_url(&url) {
            return Err(Error::InvalidInput(
                "source URL must include http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            url,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CitySource for HttpCitySource {
    async fn fetch_cities(&self) -> Result<Vec<CityRecord>> {
        tracing::debug!("Fetching city catalog from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Remote(format!(
                "catalog endpoint returned HTTP {}: {}",
                status.as_u16(),
                body_excerpt(&body)
            )));
        }

        parse_city_records(&body)
    }
}

/// First characters of an error body on one line, for log-friendly errors.
fn body_excerpt(body: &str) -> String {
    body.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(ERROR_BODY_EXCERPT_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_excerpt_is_single_line_and_bounded() {
        assert_eq!(body_excerpt("  <h1>Not\n  Found</h1>\n"), "<h1>Not Found</h1>");
        assert_eq!(body_excerpt(&"x".repeat(500)).len(), ERROR_BODY_EXCERPT_CHARS);
    }

    #[test]
    fn rejects_non_http_urls() {
        let error = HttpCitySource::new("ftp://example.com/cities.json", Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(error.to_string().contains("http://"));
    }

    #[test]
    fn keeps_configured_url() {
        let source =
            HttpCitySource::new("https://example.com/cities.json", Duration::from_secs(5)).unwrap();
        assert_eq!(source.url(), "https://example.com/cities.json");
    }
}
