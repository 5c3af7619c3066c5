//! In-memory catalog used by controller tests

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::api::{CatalogError, CatalogService};
use crate::models::{DiscoverPage, MovieDetail, MovieSummary};

/// Canned outcome for one call
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16),
    Transport,
}

struct Entry<T> {
    reply: Reply<T>,
    /// Blocks the call until the test sends on the paired sender
    gate: Option<Receiver<()>>,
}

#[derive(Default)]
pub struct FakeCatalog {
    pages: Mutex<HashMap<(String, u32), Entry<DiscoverPage>>>,
    movies: Mutex<HashMap<String, Entry<MovieDetail>>>,
    similar: Mutex<HashMap<String, Entry<Vec<MovieSummary>>>>,
    calls: Mutex<Vec<String>>,
    /// Calls that have returned, in completion order
    finished: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, genre: &str, page: u32, reply: Reply<DiscoverPage>) -> Self {
        insert(&self.pages, (genre.to_string(), page), reply);
        self
    }

    pub fn movie(self, id: &str, reply: Reply<MovieDetail>) -> Self {
        insert(&self.movies, id.to_string(), reply);
        self
    }

    pub fn similar(self, id: &str, reply: Reply<Vec<MovieSummary>>) -> Self {
        insert(&self.similar, id.to_string(), reply);
        self
    }

    pub fn gate_page(&self, genre: &str, page: u32) -> Sender<()> {
        gate(&self.pages, &(genre.to_string(), page))
    }

    pub fn gate_movie(&self, id: &str) -> Sender<()> {
        gate(&self.movies, &id.to_string())
    }

    pub fn gate_similar(&self, id: &str) -> Sender<()> {
        gate(&self.similar, &id.to_string())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn finish<T>(&self, call: String, result: Result<T, CatalogError>) -> Result<T, CatalogError> {
        self.finished.lock().unwrap().push(call);
        result
    }
}

impl CatalogService for FakeCatalog {
    fn discover(&self, genre: &str, page: u32) -> Result<DiscoverPage, CatalogError> {
        let call = format!("discover:{}:{}", genre, page);
        self.record(call.clone());
        self.finish(call, respond(&self.pages, &(genre.to_string(), page)))
    }

    fn movie(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        let call = format!("movie:{}", id);
        self.record(call.clone());
        self.finish(call, respond(&self.movies, &id.to_string()))
    }

    fn similar(&self, id: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let call = format!("similar:{}", id);
        self.record(call.clone());
        self.finish(call, respond(&self.similar, &id.to_string()))
    }
}

/// Wait until at least `count` calls have been made
pub fn wait_for_calls(catalog: &FakeCatalog, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while catalog.calls().len() < count && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
}

/// Wait until every worker thread has exited. Each worker holds a clone of
/// the catalog until its closure returns, so the test's handle ends up as the
/// only reference. Returns false on timeout.
pub fn wait_for_workers(catalog: &Arc<FakeCatalog>) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Arc::strong_count(catalog) > 1 {
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    true
}

fn insert<K: std::hash::Hash + Eq, T>(map: &Mutex<HashMap<K, Entry<T>>>, key: K, reply: Reply<T>) {
    map.lock().unwrap().insert(key, Entry { reply, gate: None });
}

fn gate<K: std::hash::Hash + Eq, T>(map: &Mutex<HashMap<K, Entry<T>>>, key: &K) -> Sender<()> {
    let (sender, receiver) = channel();
    if let Some(entry) = map.lock().unwrap().get_mut(key) {
        entry.gate = Some(receiver);
    }
    sender
}

fn respond<K: std::hash::Hash + Eq, T: Clone>(map: &Mutex<HashMap<K, Entry<T>>>, key: &K) -> Result<T, CatalogError> {
    // Take the gate out so the lock isn't held while blocked
    let (reply, gate) = {
        let mut map = map.lock().unwrap();
        match map.get_mut(key) {
            Some(entry) => (entry.reply.clone(), entry.gate.take()),
            None => return Err(CatalogError::Status(404)),
        }
    };
    if let Some(gate) = gate {
        let _ = gate.recv();
    }
    match reply {
        Reply::Ok(value) => Ok(value),
        Reply::Status(code) => Err(CatalogError::Status(code)),
        Reply::Transport => Err(CatalogError::Transport("connection refused".to_string())),
    }
}

pub fn summary(id: i64) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {}", id),
        year: 2000 + (id % 25) as i32,
        rating: 7.5,
        image: format!("https://img.example.com/{}.jpg", id),
    }
}

pub fn summaries(ids: std::ops::RangeInclusive<i64>) -> Vec<MovieSummary> {
    ids.map(summary).collect()
}

pub fn detail(id: i64) -> MovieDetail {
    MovieDetail {
        id,
        title: format!("Movie {}", id),
        year: 1999,
        rating: 8.44,
        image: format!("https://img.example.com/{}.jpg", id),
        description: "A hacker learns the truth.".to_string(),
        long_description: "A hacker learns the truth about his reality.".to_string(),
        duration: 136,
        director: "Lana Wachowski".to_string(),
        cast: vec!["Keanu Reeves".to_string(), "Carrie-Anne Moss".to_string()],
        genres: vec!["Action".to_string(), "Science Fiction".to_string()],
    }
}

pub fn discover_page(ids: std::ops::RangeInclusive<i64>, total_pages: Option<u32>) -> DiscoverPage {
    DiscoverPage {
        results: summaries(ids),
        total_pages,
    }
}
