//! Movie detail controller
//!
//! Loads the movie record and its similar titles concurrently. Each result is
//! applied as soon as it arrives, independently of the other.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::api::{CatalogError, CatalogService};
use crate::models::{DetailStatus, MovieDetail, MovieSummary};
use crate::route::{RouteParam, RouteState};

/// Most similar titles shown under a movie
pub const SIMILAR_LIMIT: usize = 6;

enum DetailEvent {
    MovieLoaded {
        generation: u64,
        result: Result<MovieDetail, CatalogError>,
    },
    SimilarLoaded {
        generation: u64,
        result: Result<Vec<MovieSummary>, CatalogError>,
    },
}

pub struct MovieDetailPage {
    service: Arc<dyn CatalogService>,
    route: RouteParam,

    movie_id: String,
    movie: Option<MovieDetail>,
    similar: Vec<MovieSummary>,

    generation: u64,
    movie_pending: bool,
    similar_pending: bool,
    last_error: Option<String>,

    playback_intent: bool,
    audio_muted: bool,

    task_sender: Sender<DetailEvent>,
    task_receiver: Receiver<DetailEvent>,
}

impl MovieDetailPage {
    pub fn new(service: Arc<dyn CatalogService>, route: RouteParam) -> Self {
        let (task_sender, task_receiver) = channel();
        Self {
            service,
            route,
            movie_id: String::new(),
            movie: None,
            similar: Vec::new(),
            generation: 0,
            movie_pending: false,
            similar_pending: false,
            last_error: None,
            playback_intent: false,
            audio_muted: false,
            task_sender,
            task_receiver,
        }
    }

    pub fn navigate(&mut self, route: RouteParam) {
        self.route = route;
        self.movie_id.clear();
        self.movie = None;
        self.similar.clear();
        self.generation += 1;
        self.movie_pending = false;
        self.similar_pending = false;
        self.last_error = None;
        self.playback_intent = false;
        self.audio_muted = false;
    }

    /// Non-blocking; returns true if anything visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        if let Some(id) = self.route.poll().map(str::to_string) {
            log::info!("Movie id resolved: {}", id);
            self.movie_id = id;
            self.fetch();
            changed = true;
        }

        while let Ok(event) = self.task_receiver.try_recv() {
            changed |= self.apply(event);
        }

        changed
    }

    fn fetch(&mut self) {
        self.generation += 1;
        self.movie_pending = true;
        self.similar_pending = true;

        let generation = self.generation;
        log::info!("Loading movie {}", self.movie_id);

        {
            let service = Arc::clone(&self.service);
            let sender = self.task_sender.clone();
            let id = self.movie_id.clone();
            thread::spawn(move || {
                let result = service.movie(&id);
                let _ = sender.send(DetailEvent::MovieLoaded { generation, result });
            });
        }

        {
            let service = Arc::clone(&self.service);
            let sender = self.task_sender.clone();
            let id = self.movie_id.clone();
            thread::spawn(move || {
                let result = service.similar(&id);
                let _ = sender.send(DetailEvent::SimilarLoaded { generation, result });
            });
        }
    }

    fn apply(&mut self, event: DetailEvent) -> bool {
        match event {
            DetailEvent::MovieLoaded { generation, result } => {
                if generation != self.generation {
                    log::debug!("Discarding stale movie response");
                    return false;
                }
                self.movie_pending = false;
                match result {
                    Ok(movie) => {
                        log::info!("Loaded movie {} ({})", movie.title, movie.id);
                        self.movie = Some(movie);
                    }
                    Err(e) => {
                        log::error!("Failed to fetch movie {}: {}", self.movie_id, e);
                        self.movie = None;
                        self.last_error = Some(e.to_string());
                    }
                }
                true
            }
            DetailEvent::SimilarLoaded { generation, result } => {
                if generation != self.generation {
                    log::debug!("Discarding stale similar-titles response");
                    return false;
                }
                self.similar_pending = false;
                match result {
                    Ok(mut similar) => {
                        similar.truncate(SIMILAR_LIMIT);
                        log::info!("Loaded {} similar titles", similar.len());
                        self.similar = similar;
                    }
                    Err(e) => {
                        log::warn!("Failed to fetch similar titles for {}: {}", self.movie_id, e);
                        self.similar.clear();
                    }
                }
                true
            }
        }
    }

    pub fn toggle_playback(&mut self) {
        self.playback_intent = !self.playback_intent;
    }

    pub fn toggle_mute(&mut self) {
        self.audio_muted = !self.audio_muted;
    }

    /// `NotFound` once the movie fetch settles without a record, or when the
    /// route was dropped before naming a movie.
    pub fn status(&self) -> DetailStatus {
        match self.route.state() {
            RouteState::Abandoned => DetailStatus::NotFound,
            RouteState::Pending => DetailStatus::Loading,
            RouteState::Resolved(_) if self.movie_pending => DetailStatus::Loading,
            RouteState::Resolved(_) if self.movie.is_some() => DetailStatus::Ready,
            RouteState::Resolved(_) => DetailStatus::NotFound,
        }
    }

    /// Both fetches have completed, or the route was dropped and nothing
    /// will ever be fetched
    pub fn is_settled(&self) -> bool {
        match self.route.state() {
            RouteState::Abandoned => true,
            RouteState::Pending => false,
            RouteState::Resolved(_) => !self.movie_pending && !self.similar_pending,
        }
    }

    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }

    pub fn movie(&self) -> Option<&MovieDetail> {
        self.movie.as_ref()
    }

    pub fn similar(&self) -> &[MovieSummary] {
        &self.similar
    }

    pub fn playback_intent(&self) -> bool {
        self.playback_intent
    }

    pub fn audio_muted(&self) -> bool {
        self.audio_muted
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Listing route for a genre chip on the detail page
pub fn genre_route(genre: &str) -> String {
    genre.to_lowercase()
}

#[cfg(test)]
#[path = "detail_tests.rs"]
mod tests;
