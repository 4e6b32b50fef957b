use super::MediaFetcher;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Serves canned bodies per URL. A URL may have a queue of responses; the
/// last one repeats.
#[derive(Clone, Default)]
pub struct MockMediaClient {
    responses: Arc<Mutex<HashMap<String, VecDeque<Option<Vec<u8>>>>>>,
    fetch_count: Arc<Mutex<usize>>,
}

impl MockMediaClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: &str, body: Vec<u8>) -> Self {
        self.push(url, Some(body));
        self
    }

    /// Queue a network failure for `url`.
    pub fn with_failure(self, url: &str) -> Self {
        self.push(url, None);
        self
    }

    pub fn get_fetch_count(&self) -> usize {
        *self.fetch_count.lock().unwrap()
    }

    fn push(&self, url: &str, response: Option<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }
}

#[async_trait]
impl MediaFetcher for MockMediaClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        *self.fetch_count.lock().unwrap() += 1;

        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(url)
            .ok_or_else(|| Error::Network(format!("No mock response for {}", url)))?;

        let response = if queue.len() > 1 {
            queue.pop_front().flatten()
        } else {
            queue.front().cloned().flatten()
        };

        response.ok_or_else(|| Error::Network("Network response was not ok".to_string()))
    }
}
