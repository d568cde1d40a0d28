use vitrine::cli::Args;
use vitrine::config::AppSettings;
use vitrine::core::event_bus::{EventBus, downcast_event};
use vitrine::core::events::{
    BackToPortfolioEvent, EnterReelsEvent, ExitReelsEvent, OpenProjectEvent,
    ToggleFullscreenEvent,
};
use vitrine::core::playback::coordinator::PlaybackCoordinator;
use vitrine::core::playback::embed::EmbedApiLatch;
use vitrine::entities::{Catalog, demo_catalog};
use vitrine::ui::{ActionQueue, DetailView, OrbitView, PosterCache, ReelsView};

use clap::Parser;
use eframe::egui;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Where the single window currently is. Reels is an overlay on top of a
/// detail route, not a route of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum Route {
    #[default]
    Portfolio,
    Detail(String),
}

/// Main application state
#[derive(serde::Deserialize, serde::Serialize, Default)]
#[serde(default)]
struct VitrineApp {
    settings: AppSettings,
    #[serde(skip)]
    route: Route,
    #[serde(skip)]
    catalog: Catalog,
    #[serde(skip)]
    orbit: OrbitView,
    #[serde(skip)]
    detail: Option<DetailView>,
    #[serde(skip)]
    reels: Option<ReelsView>,
    #[serde(skip)]
    coordinator: PlaybackCoordinator,
    #[serde(skip)]
    latch: EmbedApiLatch,
    #[serde(skip)]
    bus: EventBus,
    #[serde(skip)]
    posters: PosterCache,
    #[serde(skip)]
    is_fullscreen: bool,
}

impl VitrineApp {
    /// Rebuild runtime state from CLI arguments (persisted state only
    /// carries settings).
    fn configure(&mut self, args: &Args) {
        self.catalog = match &args.catalog {
            Some(path) => match Catalog::from_json(path) {
                Ok(catalog) => catalog,
                Err(e) => {
                    warn!("{:#}; falling back to demo catalog", e);
                    demo_catalog()
                }
            },
            None => demo_catalog(),
        };
        self.settings.global_muted = args.muted != 0;
        self.coordinator = PlaybackCoordinator::new(self.settings.global_muted);
        self.orbit = OrbitView::new(self.catalog.cards());
        self.orbit.carousel.geometry_mut().clone_from(&self.settings.orbit);
        self.orbit
            .carousel
            .wheel_mut()
            .configure(self.settings.wheel_cooldown_ms, self.settings.wheel_min_delta);
        self.is_fullscreen = args.fullscreen;

        if let Some(id) = &args.project {
            if self.catalog.by_id(id).is_some() {
                self.open_project(id.clone());
            } else {
                warn!("Unknown project id on command line: {}", id);
            }
        }
    }

    fn open_project(&mut self, id: String) {
        self.close_reels(false);
        if let Some(mut old) = self.detail.take() {
            old.unmount(&mut self.coordinator);
        }
        let Some(project) = self.catalog.by_id(&id).cloned() else {
            warn!("Open request for unknown project {}", id);
            return;
        };
        self.detail = Some(DetailView::new(
            project,
            &mut self.coordinator,
            &self.latch,
            &self.settings,
        ));
        self.route = Route::Detail(id);
    }

    fn close_detail(&mut self) {
        self.close_reels(false);
        if let Some(mut detail) = self.detail.take() {
            detail.unmount(&mut self.coordinator);
        }
        self.coordinator.reset();
        self.route = Route::Portfolio;
    }

    fn open_reels(&mut self) {
        let Some(detail) = &self.detail else {
            return;
        };
        if !detail.project().is_series {
            debug!("Reels requested on a non-series project, ignoring");
            return;
        }
        let project = detail.project().clone();
        self.reels = Some(ReelsView::new(
            &project,
            &mut self.coordinator,
            &self.latch,
            &self.settings,
        ));
    }

    /// Close the overlay; `resume_hero` hands playback back to the detail
    /// page underneath.
    fn close_reels(&mut self, resume_hero: bool) {
        if let Some(mut reels) = self.reels.take() {
            reels.unmount(&mut self.coordinator);
            if resume_hero && let Some(detail) = &self.detail {
                detail.activate_hero(&mut self.coordinator);
            }
        }
    }

    fn route_events(&mut self, ctx: &egui::Context) {
        for event in self.bus.poll() {
            if let Some(OpenProjectEvent(id)) = downcast_event(&event) {
                self.open_project(id.clone());
            } else if downcast_event::<BackToPortfolioEvent>(&event).is_some() {
                self.close_detail();
            } else if downcast_event::<EnterReelsEvent>(&event).is_some() {
                self.open_reels();
            } else if downcast_event::<ExitReelsEvent>(&event).is_some() {
                self.close_reels(true);
            } else if downcast_event::<ToggleFullscreenEvent>(&event).is_some() {
                self.is_fullscreen = !self.is_fullscreen;
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.is_fullscreen));
            }
        }
    }
}

impl eframe::App for VitrineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drive playback clocks and late-arriving embed players.
        self.coordinator.tick(Instant::now());

        if ctx.input(|i| i.key_pressed(egui::Key::F11)) {
            self.bus.emit(ToggleFullscreenEvent);
        }

        let mut aq = ActionQueue::new();
        if let Some(reels) = &mut self.reels {
            aq.merge(reels.show(ctx, &mut self.coordinator, &mut self.posters));
        } else if matches!(self.route, Route::Detail(_))
            && let Some(detail) = &mut self.detail
        {
            let next = self
                .catalog
                .next_after(&detail.project().id)
                .map(vitrine::ProjectCard::from);
            egui::CentralPanel::default().show(ctx, |ui| {
                aq.merge(detail.show(ui, &mut self.coordinator, &mut self.posters, next.as_ref()));
            });
        } else {
            egui::CentralPanel::default().show(ctx, |ui| {
                if self.orbit.show_toolbar(ui, self.settings.grid_mode) {
                    self.settings.grid_mode = !self.settings.grid_mode;
                }
                ui.add_space(6.0);
                if self.settings.grid_mode {
                    let cards: Vec<_> = self.orbit.carousel.visible_cards().cloned().collect();
                    aq.merge(vitrine::ui::grid_view::show_grid(ui, &cards, &mut self.posters));
                } else {
                    aq.merge(self.orbit.show_stage(ui, &mut self.posters, &self.settings));
                }
            });
        }

        let animating = aq.animating;
        for event in aq.events {
            self.bus.emit_boxed(event);
        }
        self.route_events(ctx);

        if animating {
            ctx.request_repaint();
        } else {
            // Playback progress and the embed load latch still need frames
            // while nothing is visibly animating.
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(json) = serde_json::to_string(self) {
            storage.set_string(eframe::APP_KEY, json);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| std::path::PathBuf::from("vitrine.log"));
        let file = std::fs::File::create(&log_path)?;
        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .init();
    }

    info!("Vitrine portfolio viewer starting...");
    debug!("Command-line args: {:?}", args);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Vitrine v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([1280.0, 800.0])
            .with_resizable(true)
            .with_fullscreen(args.fullscreen),
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native(
        "Vitrine",
        native_options,
        Box::new(move |cc| {
            // Load persisted settings if available, otherwise defaults
            let mut app: VitrineApp = cc
                .storage
                .and_then(|storage| storage.get_string(eframe::APP_KEY))
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_else(|| {
                    info!("No persisted state found, creating default app");
                    VitrineApp::default()
                });
            if app.settings.dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }
            app.configure(&args);
            Ok(Box::new(app))
        }),
    )?;
    Ok(())
}
