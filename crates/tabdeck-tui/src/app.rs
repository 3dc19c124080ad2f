//! App state, input handling, deferred results.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tabdeck_core::avatar;
use tabdeck_core::chat::{ChatDispatcher, Transcript};
use tabdeck_core::config::Config;
use tabdeck_core::deferred::Generation;
use tabdeck_core::events::DeskEvent;
use tabdeck_core::facts::FactGenerator;
use tabdeck_core::profile::ProfileStore;
use tabdeck_core::types::*;
use tabdeck_core::view::{Panel, ViewState};
use tabdeck_core::weather::{LookupError, WeatherBackend, WeatherReport, WeatherService};

/// Which profile field the input bar edits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    AvatarPath,
}

/// What the weather result area shows.
pub enum WeatherPane {
    Empty,
    Loading,
    Ready(WeatherReport),
    Failed(LookupError),
}

/// What the fact result area shows.
pub enum FactPane {
    Empty,
    Loading,
    Ready(Fact),
}

/// The main application state.
pub struct App {
    pub view: ViewState,
    pub profile: Profile,
    pub history: Vec<HistoryEntry>,
    pub profile_field: ProfileField,
    pub avatar_input: String,
    pub city_input: String,
    pub weather: WeatherPane,
    pub fact: FactPane,
    pub transcript: Transcript,
    pub chat_input: String,
    pub confirm_clear: bool,
    pub status: Option<String>,
    pub should_quit: bool,

    profiles: ProfileStore,
    weather_service: WeatherService,
    facts: FactGenerator,
    dispatcher: ChatDispatcher,
    weather_gen: Generation,
    fact_gen: Generation,
    event_tx: mpsc::UnboundedSender<DeskEvent>,
}

impl App {
    /// Wire the services together. Completions of spawned work arrive on the
    /// returned receiver and go back in through [`App::handle_event`].
    pub fn new(
        config: &Config,
        profiles: ProfileStore,
        backend: Arc<dyn WeatherBackend>,
    ) -> (Self, mpsc::UnboundedReceiver<DeskEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let app = App {
            view: ViewState::new(),
            profile: Profile::default(),
            history: Vec::new(),
            profile_field: ProfileField::Name,
            avatar_input: String::new(),
            city_input: String::new(),
            weather: WeatherPane::Empty,
            fact: FactPane::Empty,
            transcript: Transcript::new(),
            chat_input: String::new(),
            confirm_clear: false,
            status: None,
            should_quit: false,
            weather_service: WeatherService::new(backend),
            profiles,
            facts: FactGenerator::new(config.fact_delay()),
            dispatcher: ChatDispatcher::new(config.chat_delay()),
            weather_gen: Generation::new(),
            fact_gen: Generation::new(),
            event_tx,
        };
        (app, event_rx)
    }

    /// Startup: pull the profile from storage, apply its theme, open the
    /// profile panel.
    pub fn bootstrap(&mut self) {
        self.load_profile();
        self.view.switch_to(Panel::Profile.id());
        info!(
            "Loaded profile (name: {:?}, dark: {})",
            self.profile.display_name, self.profile.dark_theme
        );
    }

    fn load_profile(&mut self) {
        self.profile = self.profiles.load();
        self.view.set_theme(self.profile.dark_theme);
        self.history = self.profiles.history();
    }

    // ── Profile ──

    /// Persist the form and apply the theme right away.
    pub fn save_profile(&mut self) {
        if let Err(e) = self.profiles.save(&self.profile) {
            warn!("Failed to save profile: {}", e);
            self.status = Some(format!("Could not save profile: {}", e));
        }
        self.view.set_theme(self.profile.dark_theme);
    }

    pub fn toggle_theme(&mut self) {
        self.profile.dark_theme = !self.profile.dark_theme;
        self.save_profile();
    }

    pub fn toggle_profile_field(&mut self) {
        self.profile_field = match self.profile_field {
            ProfileField::Name => ProfileField::AvatarPath,
            ProfileField::AvatarPath => ProfileField::Name,
        };
    }

    pub fn import_avatar(&mut self) {
        let path = self.avatar_input.trim().to_string();
        if path.is_empty() {
            return;
        }
        match avatar::encode_avatar(Path::new(&path)) {
            Ok(uri) => {
                self.profile.avatar = Some(uri);
                self.save_profile();
                self.avatar_input.clear();
                self.status = Some("Avatar updated".to_string());
            }
            Err(e) => {
                warn!("Avatar import failed: {:#}", e);
                self.status = Some(format!("{:#}", e));
            }
        }
    }

    pub fn request_clear_all(&mut self) {
        self.confirm_clear = true;
    }

    /// Answer to the "clear all data?" prompt.
    pub fn confirm_clear_all(&mut self, yes: bool) {
        self.confirm_clear = false;
        if !yes {
            return;
        }
        if let Err(e) = self.profiles.clear_all() {
            warn!("Failed to clear storage: {}", e);
            self.status = Some(format!("Could not clear data: {}", e));
            return;
        }
        self.reload();
        self.status = Some("All data cleared".to_string());
    }

    /// Start over from whatever the store holds now.
    fn reload(&mut self) {
        self.weather_gen.invalidate();
        self.fact_gen.invalidate();
        self.transcript.clear();
        self.weather = WeatherPane::Empty;
        self.fact = FactPane::Empty;
        self.profile_field = ProfileField::Name;
        self.avatar_input.clear();
        self.city_input.clear();
        self.chat_input.clear();
        self.status = None;
        self.bootstrap();
    }

    // ── Weather ──

    pub fn fetch_weather(&mut self) {
        let city = self.city_input.trim().to_string();
        if city.is_empty() {
            self.weather_gen.invalidate();
            self.weather = WeatherPane::Failed(LookupError::Validation);
            return;
        }

        self.weather = WeatherPane::Loading;
        let ticket = self.weather_gen.issue();
        let service = self.weather_service.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = service.lookup(&city).await;
            let _ = tx.send(DeskEvent::Weather { ticket, outcome });
        });
    }

    // ── Facts ──

    pub fn generate_fact(&mut self) {
        self.fact = FactPane::Loading;
        let ticket = self.fact_gen.issue();
        let facts = self.facts.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let fact = facts.generate().await;
            let _ = tx.send(DeskEvent::Fact { ticket, fact });
        });
    }

    // ── Assistant ──

    pub fn send_message(&mut self) {
        let Some(text) = self.transcript.push_user(&self.chat_input) else {
            return;
        };
        self.chat_input.clear();

        let pending = self.transcript.push_placeholder();
        let dispatcher = self.dispatcher.clone();
        let profiles = self.profiles.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let text = dispatcher.respond(&text, &profiles).await;
            let _ = tx.send(DeskEvent::ChatReply { pending, text });
        });
    }

    pub fn clear_chat(&mut self) {
        self.transcript.clear();
    }

    // ── Deferred results ──

    pub fn handle_event(&mut self, event: DeskEvent) {
        match event {
            DeskEvent::Weather { ticket, outcome } => {
                if !self.weather_gen.is_current(ticket) {
                    debug!("Dropping stale weather result");
                    return;
                }
                self.weather = match outcome {
                    Ok(report) => {
                        // Only a current result reaches storage
                        match self.profiles.record_search(&report.label()) {
                            Ok(history) => self.history = history,
                            Err(e) => warn!("Failed to record search history: {}", e),
                        }
                        WeatherPane::Ready(report)
                    }
                    Err(e) => WeatherPane::Failed(e),
                };
            }
            DeskEvent::Fact { ticket, fact } => {
                if !self.fact_gen.is_current(ticket) {
                    debug!("Dropping stale fact");
                    return;
                }
                self.fact = FactPane::Ready(fact);
            }
            DeskEvent::ChatReply { pending, text } => {
                self.transcript.resolve(pending, text);
            }
        }
    }

    // ── Text input ──

    /// The string the input bar currently edits.
    pub fn active_input(&self) -> Option<&str> {
        match self.view.active()? {
            Panel::Profile => Some(match self.profile_field {
                ProfileField::Name => self.profile.display_name.as_str(),
                ProfileField::AvatarPath => self.avatar_input.as_str(),
            }),
            Panel::Weather => Some(self.city_input.as_str()),
            Panel::Assistant => Some(self.chat_input.as_str()),
            Panel::Cats => None,
        }
    }

    pub fn type_char(&mut self, c: char) {
        match self.view.active() {
            Some(Panel::Profile) => match self.profile_field {
                ProfileField::Name => {
                    self.profile.display_name.push(c);
                    self.save_profile();
                }
                ProfileField::AvatarPath => self.avatar_input.push(c),
            },
            Some(Panel::Weather) => self.city_input.push(c),
            Some(Panel::Assistant) => self.chat_input.push(c),
            Some(Panel::Cats) | None => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.view.active() {
            Some(Panel::Profile) => match self.profile_field {
                ProfileField::Name => {
                    if self.profile.display_name.pop().is_some() {
                        self.save_profile();
                    }
                }
                ProfileField::AvatarPath => {
                    self.avatar_input.pop();
                }
            },
            Some(Panel::Weather) => {
                self.city_input.pop();
            }
            Some(Panel::Assistant) => {
                self.chat_input.pop();
            }
            Some(Panel::Cats) | None => {}
        }
    }

    /// Enter: the active panel's main action.
    pub fn submit(&mut self) {
        match self.view.active() {
            Some(Panel::Profile) => match self.profile_field {
                ProfileField::Name => self.save_profile(),
                ProfileField::AvatarPath => self.import_avatar(),
            },
            Some(Panel::Weather) => self.fetch_weather(),
            Some(Panel::Cats) => self.generate_fact(),
            Some(Panel::Assistant) => self.send_message(),
            None => {}
        }
    }
}
