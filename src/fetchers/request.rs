use super::Fetcher;
use crate::config::ParseOptions;
use crate::error::ExtractError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(options: &ParseOptions) -> Result<Self, ExtractError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = Client::builder()
            .timeout(Duration::from_millis(options.timeout_ms))
            .user_agent(HeaderValue::from_str(&options.user_agent)?)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_sends_user_agent_and_accept() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", "RecipeParser/1.0")
            .match_header("accept", ACCEPT_HTML)
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(&ParseOptions::default()).unwrap();
        let html = fetcher
            .fetch(&format!("{}/recipe", server.url()))
            .await
            .unwrap();

        assert_eq!(html, "<html></html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new(&ParseOptions::default()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;

        assert!(matches!(result, Err(ExtractError::FetchError(_))));
    }

    #[test]
    fn test_invalid_user_agent_is_header_error() {
        let options = ParseOptions {
            user_agent: "bad\nagent".to_string(),
            ..ParseOptions::default()
        };
        assert!(matches!(
            RequestFetcher::new(&options),
            Err(ExtractError::HeaderError(_))
        ));
    }
}
