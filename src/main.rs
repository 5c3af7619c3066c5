//! Cinelist - movie catalog browser
//! Genre listings with paging, and movie details with similar titles

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod config;
mod console;
mod detail;
mod listing;
mod models;
mod pagination;
mod route;

#[cfg(test)]
mod fake_catalog;

use api::{CatalogClient, CatalogService};
use config::AppConfig;
use console::ConsoleLog;
use detail::{genre_route, MovieDetailPage};
use listing::GenreListing;
use models::{DetailStatus, MovieSummary, View, ViewCommand};
use pagination::PagerItem;
use route::RouteParam;

fn main() -> Result<(), eframe::Error> {
    // Logger goes in first so config load problems reach the console
    let console = ConsoleLog::new();
    if let Err(e) = console.install(log::LevelFilter::Info) {
        eprintln!("Console logger unavailable: {}", e);
    }
    let config = AppConfig::load();
    log::set_max_level(config.level_filter());
    log::info!("Cinelist started");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([800.0, 500.0]),
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        "Cinelist",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(if config.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            let body_size = config.font_size as f32;
            cc.egui_ctx.style_mut(|style| {
                style
                    .text_styles
                    .insert(egui::TextStyle::Body, egui::FontId::proportional(body_size));
            });
            Ok(Box::new(CatalogApp::new(config, console)))
        }),
    )
}

fn build_service(config: &AppConfig) -> Arc<dyn CatalogService> {
    Arc::new(
        CatalogClient::new(&config.base_url)
            .with_user_agent(&config.user_agent)
            .with_timeout(config.request_timeout()),
    )
}

/// User actions collected while drawing, applied after the frame's UI pass
enum UiAction {
    OpenGenre(String),
    OpenMovie(i64),
    GoToPage(u32),
    PreviousPage,
    NextPage,
    TogglePlayback,
    ToggleMute,
}

struct CatalogApp {
    config: AppConfig,
    console: ConsoleLog,
    service: Arc<dyn CatalogService>,

    current_view: View,
    listing: GenreListing,
    detail: Option<MovieDetailPage>,

    genre_input: String,
    base_url_input: String,
    scroll_to_top: bool,
}

impl CatalogApp {
    fn new(config: AppConfig, console: ConsoleLog) -> Self {
        let service = build_service(&config);
        let listing = GenreListing::new(Arc::clone(&service), RouteParam::ready(config.last_genre.clone()));
        Self {
            genre_input: config.last_genre.clone(),
            base_url_input: config.base_url.clone(),
            config,
            console,
            service,
            current_view: View::Genre,
            listing,
            detail: None,
            scroll_to_top: false,
        }
    }

    fn open_genre(&mut self, genre: &str) {
        let genre = genre.trim().to_string();
        if genre.is_empty() {
            return;
        }
        self.listing.navigate(RouteParam::ready(genre.clone()));
        self.genre_input = genre.clone();
        self.current_view = View::Genre;
        self.scroll_to_top = true;
        if self.config.last_genre != genre {
            self.config.last_genre = genre;
            self.config.save();
        }
    }

    fn open_movie(&mut self, id: i64) {
        // The previous page is dropped along with anything it still has in flight
        let (sender, route) = RouteParam::pending();
        self.detail = Some(MovieDetailPage::new(Arc::clone(&self.service), route));
        sender.resolve(id.to_string());
        self.current_view = View::Movie;
    }

    fn apply_base_url(&mut self) {
        let base_url = self.base_url_input.trim().to_string();
        if base_url.is_empty() || base_url == self.config.base_url {
            return;
        }
        log::info!("Catalog server changed to {}", base_url);
        self.config.base_url = base_url;
        self.config.save();
        self.service = build_service(&self.config);

        self.listing = GenreListing::new(
            Arc::clone(&self.service),
            RouteParam::ready(self.config.last_genre.clone()),
        );
        self.detail = None;
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::OpenGenre(genre) => self.open_genre(&genre),
            UiAction::OpenMovie(id) => self.open_movie(id),
            UiAction::GoToPage(page) => {
                self.listing.go_to_page(page);
            }
            UiAction::PreviousPage => {
                self.listing.previous_page();
            }
            UiAction::NextPage => {
                self.listing.next_page();
            }
            UiAction::TogglePlayback => {
                if let Some(detail) = &mut self.detail {
                    detail.toggle_playback();
                }
            }
            UiAction::ToggleMute => {
                if let Some(detail) = &mut self.detail {
                    detail.toggle_mute();
                }
            }
        }
    }

    fn busy(&self) -> bool {
        self.listing.is_loading() || self.detail.as_ref().is_some_and(|d| !d.is_settled())
    }

    fn show_genre_view(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let listing = &self.listing;

        ui.label(egui::RichText::new(listing.genre_display()).heading().strong());
        ui.label(listing.subtitle());
        ui.separator();

        ui.horizontal(|ui| {
            ui.label("Genre:");
            let response = ui.text_edit_singleline(&mut self.genre_input);
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Go").clicked() || submitted {
                actions.push(UiAction::OpenGenre(self.genre_input.clone()));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(listing.results_label());
            });
        });
        ui.add_space(8.0);

        let mut area = egui::ScrollArea::vertical().auto_shrink([false, false]);
        if std::mem::take(&mut self.scroll_to_top) {
            area = area.vertical_scroll_offset(0.0);
        }

        area.show(ui, |ui| {
            if listing.is_loading() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
                return;
            }

            for movie in listing.movies() {
                show_movie_row(ui, movie, actions);
            }

            if listing.show_pagination() {
                ui.add_space(12.0);
                show_pager(ui, listing.page_window().items(), actions);
            }
        });
    }

    fn show_movie_view(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(detail) = &self.detail else {
            ui.label("Pick a movie from a genre listing.");
            return;
        };

        match detail.status() {
            DetailStatus::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.spinner();
                });
                return;
            }
            DetailStatus::NotFound => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.label(egui::RichText::new("Movie not found").size(18.0));
                });
                return;
            }
            DetailStatus::Ready => {}
        }

        let Some(movie) = detail.movie() else {
            return;
        };

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            // Player stub: intent flags only
            egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                ui.set_min_height(180.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    let play_label = if detail.playback_intent() { "⏸ Pause" } else { "▶ Play" };
                    if ui.button(egui::RichText::new(play_label).size(20.0)).clicked() {
                        actions.push(UiAction::TogglePlayback);
                    }
                    let mute_label = if detail.audio_muted() { "🔇 Unmute" } else { "🔊 Mute" };
                    if ui.button(mute_label).clicked() {
                        actions.push(UiAction::ToggleMute);
                    }
                });
            });
            ui.add_space(12.0);

            ui.label(egui::RichText::new(&movie.title).heading().strong());
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("{} Rating", movie.rating_label()))
                        .color(egui::Color32::from_rgb(34, 211, 238)),
                );
                ui.label(movie.year.to_string());
                ui.label("•");
                ui.label(movie.duration_label());
            });

            ui.horizontal_wrapped(|ui| {
                for genre in &movie.genres {
                    if ui.small_button(genre).clicked() {
                        actions.push(UiAction::OpenGenre(genre_route(genre)));
                    }
                }
            });
            ui.add_space(8.0);
            ui.label(&movie.description);
            ui.add_space(12.0);

            egui::Grid::new("credits").num_columns(2).spacing([24.0, 6.0]).show(ui, |ui| {
                ui.label(egui::RichText::new("Director").strong());
                ui.label(&movie.director);
                ui.end_row();
                ui.label(egui::RichText::new("Cast").strong());
                ui.label(movie.cast.join(", "));
                ui.end_row();
            });

            ui.add_space(12.0);
            ui.label(egui::RichText::new("Overview").size(18.0).strong());
            ui.label(&movie.long_description);

            if !detail.similar().is_empty() {
                ui.add_space(16.0);
                ui.separator();
                ui.label(egui::RichText::new("Similar Titles").size(18.0).strong());
                for similar in detail.similar() {
                    show_movie_row(ui, similar, actions);
                }
            }
        });
    }

    fn show_console_view(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Console Log");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Clear").clicked() {
                    self.console.clear();
                }
            });
        });

        ui.horizontal(|ui| {
            ui.label("Catalog server:");
            ui.text_edit_singleline(&mut self.base_url_input);
            if ui.button("Apply").clicked() {
                self.apply_base_url();
            }
        });
        if let Some(error) = self.listing.last_error() {
            ui.label(egui::RichText::new(format!("Last listing error: {}", error)).color(egui::Color32::RED));
        }
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in self.console.lines() {
                    let color = if line.contains("[ERROR]") {
                        egui::Color32::RED
                    } else if line.contains("[WARN]") {
                        egui::Color32::YELLOW
                    } else if line.contains("[INFO]") {
                        egui::Color32::LIGHT_BLUE
                    } else {
                        egui::Color32::GRAY
                    };

                    ui.label(egui::RichText::new(line).monospace().color(color));
                }
            });
    }
}

fn show_movie_row(ui: &mut egui::Ui, movie: &MovieSummary, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        if ui.button(egui::RichText::new(&movie.title).strong()).clicked() {
            actions.push(UiAction::OpenMovie(movie.id));
        }
        ui.label(movie.year.to_string());
        ui.label(format!("★ {:.1}", movie.rating));
    });
}

fn show_pager(ui: &mut egui::Ui, items: Vec<PagerItem>, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        for item in items {
            match item {
                PagerItem::Previous => {
                    if ui.button("‹ Previous").clicked() {
                        actions.push(UiAction::PreviousPage);
                    }
                }
                PagerItem::Page { page, active } => {
                    if ui.selectable_label(active, page.to_string()).clicked() && !active {
                        actions.push(UiAction::GoToPage(page));
                    }
                }
                PagerItem::Next => {
                    if ui.button("Next ›").clicked() {
                        actions.push(UiAction::NextPage);
                    }
                }
            }
        }
    });
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process background task results (non-blocking)
        self.listing.poll();
        if let Some(detail) = &mut self.detail {
            detail.poll();
        }
        for command in self.listing.take_commands() {
            match command {
                ViewCommand::ScrollToTop => self.scroll_to_top = true,
            }
        }

        let mut actions = Vec::new();
        let busy = self.busy();

        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.current_view, View::Genre, "🎬 Genre");
                ui.add_enabled_ui(self.detail.is_some(), |ui| {
                    ui.selectable_value(&mut self.current_view, View::Movie, "🎞 Movie");
                });
                ui.selectable_value(&mut self.current_view, View::Console, "🖥 Console");
                if busy {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.spinner();
                    });
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.current_view {
            View::Genre => self.show_genre_view(ui, &mut actions),
            View::Movie => self.show_movie_view(ui, &mut actions),
            View::Console => self.show_console_view(ui),
        });

        for action in actions {
            self.apply(action);
        }

        // Keep polling while workers are out
        if self.busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
