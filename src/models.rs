//! Data models for the catalog views

use serde::{Deserialize, Serialize};

/// UI view selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Genre,
    Movie,
    Console,
}

/// Movie card as returned by the discover and similar endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image: String,
}

/// Full movie record from the movie-by-id endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    /// Runtime in minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl MovieDetail {
    /// Rating with one decimal, e.g. "8.4"
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }

    pub fn duration_label(&self) -> String {
        format!("{} min", self.duration)
    }
}

/// One page of the discover endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverPage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Similar-movies payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarMovies {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

/// Load status of the genre listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Loading,
    Ready,
    Error,
}

/// Load status of the movie detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStatus {
    Loading,
    Ready,
    NotFound,
}

/// Side effects requested by a controller, carried out by the UI shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    ScrollToTop,
}
