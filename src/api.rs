//! Catalog data service client

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{DiscoverPage, MovieDetail, MovieSummary, SimilarMovies};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ureq::Error> for CatalogError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => CatalogError::Status(code),
            other => CatalogError::Transport(other.to_string()),
        }
    }
}

/// The three calls the catalog views depend on.
///
/// Implementations are shared with worker threads, hence `Send + Sync`.
pub trait CatalogService: Send + Sync {
    fn discover(&self, genre: &str, page: u32) -> Result<DiscoverPage, CatalogError>;

    /// Fails with `CatalogError::Status` on any non-success response.
    fn movie(&self, id: &str) -> Result<MovieDetail, CatalogError>;

    fn similar(&self, id: &str) -> Result<Vec<MovieSummary>, CatalogError>;
}

pub struct CatalogClient {
    base_url: String,
    user_agent: String,
    agent: ureq::Agent,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: format!("cinelist/{}", env!("CARGO_PKG_VERSION")),
            agent: build_agent(None),
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        if !user_agent.is_empty() {
            self.user_agent = user_agent.to_string();
        }
        self
    }

    /// `None` leaves requests without a deadline.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn movie_url(&self, id: &str) -> String {
        self.api_url(&format!("movie/{}", urlencoding::encode(id)))
    }

    fn similar_url(&self, id: &str) -> String {
        self.api_url(&format!("similar/{}", urlencoding::encode(id)))
    }

    fn get_json<T: DeserializeOwned>(&self, request: ureq::RequestBuilder<ureq::typestate::WithoutBody>) -> Result<T, CatalogError> {
        let mut response = request
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| CatalogError::Read(e.to_string()))?;

        Ok(serde_json::from_str(&body)?)
    }
}

impl CatalogService for CatalogClient {
    fn discover(&self, genre: &str, page: u32) -> Result<DiscoverPage, CatalogError> {
        let request = self
            .agent
            .get(&self.api_url("discover"))
            .query("genre", genre)
            .query("page", page.to_string());
        self.get_json(request)
    }

    fn movie(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        let url = self.movie_url(id);
        self.get_json(self.agent.get(&url))
    }

    fn similar(&self, id: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let url = self.similar_url(id);
        let payload: SimilarMovies = self.get_json(self.agent.get(&url))?;
        Ok(payload.results)
    }
}

fn build_agent(timeout: Option<Duration>) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(timeout)
        .build()
        .new_agent()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_and_similar_urls_encode_id() {
        let client = CatalogClient::new("http://localhost:3000");
        assert_eq!(client.movie_url("550"), "http://localhost:3000/api/movie/550");
        assert_eq!(client.movie_url("a b/c"), "http://localhost:3000/api/movie/a%20b%2Fc");
        assert_eq!(client.similar_url("é"), "http://localhost:3000/api/similar/%C3%A9");
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = CatalogClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.api_url("discover"), "http://localhost:3000/api/discover");
    }

    #[test]
    fn test_status_error_maps_code() {
        let err: CatalogError = ureq::Error::StatusCode(404).into();
        assert!(matches!(err, CatalogError::Status(404)));
        assert_eq!(err.to_string(), "HTTP error: 404");
    }

    #[test]
    fn test_empty_user_agent_keeps_default() {
        let client = CatalogClient::new("http://x").with_user_agent("");
        assert!(client.user_agent.starts_with("cinelist/"));
    }
}
