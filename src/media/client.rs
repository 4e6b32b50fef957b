use super::MediaFetcher;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

pub struct MediaClient {
    client: Client,
}

impl MediaClient {
    pub fn new_with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaFetcher for MediaClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            Error::Network(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("Fetching {} returned status {}", url, status);
            return Err(Error::Network(format!(
                "Network response was not ok (status {})",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/out.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let client = MediaClient::new_with_client(Client::new());
        let body = client
            .fetch(&format!("{}/out.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = MediaClient::new_with_client(Client::new());
        let err = client
            .fetch(&format!("{}/missing.png", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
