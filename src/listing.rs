//! Genre listing controller
//!
//! Resolves the genre from the route, loads one page of movies at a time on a
//! worker thread, and exposes pager state. Every request is tagged with a
//! generation number; only the response to the latest request is applied.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::api::{CatalogError, CatalogService};
use crate::models::{DiscoverPage, ListingStatus, MovieSummary, ViewCommand};
use crate::pagination::{PageWindow, FALLBACK_TOTAL_PAGES};
use crate::route::{RouteParam, RouteState};

/// Worker thread results
enum ListingEvent {
    PageLoaded {
        generation: u64,
        genre: String,
        page: u32,
        result: Result<DiscoverPage, CatalogError>,
    },
}

pub struct GenreListing {
    service: Arc<dyn CatalogService>,
    route: RouteParam,

    genre_name: String,
    movies: Vec<MovieSummary>,
    current_page: u32,
    total_pages: u32,

    generation: u64,
    in_flight: bool,
    last_error: Option<String>,
    commands: Vec<ViewCommand>,

    task_sender: Sender<ListingEvent>,
    task_receiver: Receiver<ListingEvent>,
}

impl GenreListing {
    pub fn new(service: Arc<dyn CatalogService>, route: RouteParam) -> Self {
        let (task_sender, task_receiver) = channel();
        Self {
            service,
            route,
            genre_name: String::new(),
            movies: Vec::new(),
            current_page: 1,
            total_pages: 1,
            generation: 0,
            in_flight: false,
            last_error: None,
            commands: Vec::new(),
            task_sender,
            task_receiver,
        }
    }

    /// Start over for a new navigation. Responses still in flight for the
    /// previous genre are dropped when they arrive.
    pub fn navigate(&mut self, route: RouteParam) {
        self.route = route;
        self.genre_name.clear();
        self.movies.clear();
        self.current_page = 1;
        self.total_pages = 1;
        self.generation += 1;
        self.in_flight = false;
        self.last_error = None;
        self.commands.clear();
    }

    /// Resolve the route if it arrived and apply finished fetches.
    /// Non-blocking; returns true if anything visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        if let Some(genre) = self.route.poll().map(str::to_string) {
            if genre.trim().is_empty() {
                log::warn!("Route named no genre, nothing to load");
            } else {
                log::info!("Genre resolved: {}", genre);
                self.genre_name = genre;
                self.fetch_page();
            }
            changed = true;
        }

        while let Ok(event) = self.task_receiver.try_recv() {
            changed |= self.apply(event);
        }

        changed
    }

    fn fetch_page(&mut self) {
        self.generation += 1;
        self.in_flight = true;

        let generation = self.generation;
        let genre = self.genre_name.clone();
        let page = self.current_page;
        let service = Arc::clone(&self.service);
        let sender = self.task_sender.clone();

        log::info!("Loading {} page {}", genre, page);

        thread::spawn(move || {
            let result = service.discover(&genre, page);
            // Receiver is gone if the page was closed meanwhile
            let _ = sender.send(ListingEvent::PageLoaded {
                generation,
                genre,
                page,
                result,
            });
        });
    }

    fn apply(&mut self, event: ListingEvent) -> bool {
        match event {
            ListingEvent::PageLoaded { generation, genre, page, result } => {
                if generation != self.generation {
                    log::debug!("Discarding stale response for {} page {}", genre, page);
                    return false;
                }
                self.in_flight = false;

                match result {
                    Ok(data) => {
                        self.total_pages = data
                            .total_pages
                            .filter(|&total| total > 0)
                            .unwrap_or(FALLBACK_TOTAL_PAGES);
                        self.movies = data.results;
                        self.last_error = None;
                        log::info!(
                            "Loaded {} movies for {} page {} of {}",
                            self.movies.len(),
                            genre,
                            page,
                            self.total_pages
                        );

                        if self.current_page > self.total_pages {
                            log::warn!(
                                "Page {} is past the last page {}, moving back",
                                self.current_page,
                                self.total_pages
                            );
                            self.current_page = self.total_pages;
                            self.commands.push(ViewCommand::ScrollToTop);
                            self.fetch_page();
                        }
                    }
                    Err(e) => {
                        log::error!("Failed to fetch genre movies: {}", e);
                        self.movies.clear();
                        self.last_error = Some(e.to_string());
                    }
                }
                true
            }
        }
    }

    /// Jump to page `page`. Ignored for the current page or anything outside
    /// `1..=total_pages`.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page == self.current_page {
            return false;
        }
        if page == 0 || page > self.total_pages {
            log::warn!("Ignoring page {} outside 1..={}", page, self.total_pages);
            return false;
        }

        self.current_page = page;
        self.commands.push(ViewCommand::ScrollToTop);
        if self.has_genre() {
            self.fetch_page();
        }
        true
    }

    pub fn next_page(&mut self) -> bool {
        if self.current_page >= self.total_pages {
            return false;
        }
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.go_to_page(self.current_page - 1)
    }

    /// Side effects requested since the last call, oldest first.
    pub fn take_commands(&mut self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Route resolved to a usable genre
    fn has_genre(&self) -> bool {
        self.route.value().is_some_and(|genre| !genre.trim().is_empty())
    }

    /// `Error` when the route can never name a genre: dropped, or blank.
    pub fn status(&self) -> ListingStatus {
        match self.route.state() {
            RouteState::Abandoned => ListingStatus::Error,
            RouteState::Resolved(genre) if genre.trim().is_empty() => ListingStatus::Error,
            RouteState::Pending => ListingStatus::Loading,
            RouteState::Resolved(_) if self.in_flight => ListingStatus::Loading,
            RouteState::Resolved(_) => ListingStatus::Ready,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status() == ListingStatus::Loading
    }

    pub fn genre_name(&self) -> &str {
        &self.genre_name
    }

    pub fn genre_display(&self) -> String {
        capitalize(&self.genre_name)
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn page_window(&self) -> PageWindow {
        PageWindow::new(self.current_page, self.total_pages)
    }

    /// Pager is hidden while loading and for empty pages
    pub fn show_pagination(&self) -> bool {
        self.status() == ListingStatus::Ready && !self.movies.is_empty()
    }

    pub fn results_label(&self) -> String {
        format!("{} results", self.movies.len())
    }

    pub fn subtitle(&self) -> String {
        if self.is_loading() {
            "Loading...".to_string()
        } else {
            format!(
                "Explore our collection of {} titles - Page {}",
                self.genre_display().to_lowercase(),
                self.current_page
            )
        }
    }
}

/// Upper-case the first character, leave the rest untouched
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
