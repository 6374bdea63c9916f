use crate::config::{self, Config};
use crate::deck::{Deck, SlideDraft, SlideId, resolve_title};
use crate::events::{AppEvent, Query};
use crate::gui::input::InputController;
use crate::gui::ring::Scene;
use crate::gui::theme::ThemeColors;
use crate::summarize::TitleService;
use async_channel::Sender;
use std::time::Instant;

/// One running view: the deck, the camera and the dispatch of events onto them.
pub struct AppModel {
    deck: Deck,
    input: InputController,
    colors: ThemeColors,
    summarizer: TitleService,
    /// A title is being generated; new submissions are refused until it lands.
    processing: bool,
    tx: Sender<AppEvent>,
}

impl AppModel {
    pub fn new(config: &Config, tx: Sender<AppEvent>) -> Self {
        Self::with_deck(Deck::from_drafts(config.seed_drafts()), config, tx)
    }

    pub fn with_deck(deck: Deck, config: &Config, tx: Sender<AppEvent>) -> Self {
        Self {
            deck,
            input: InputController::new(
                config.viewport.clone(),
                config.keys.clone(),
                config.display.size(),
            ),
            colors: ThemeColors::from_config(&config.theme),
            summarizer: config.summarizer.service(),
            processing: false,
            tx,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn input(&self) -> &InputController {
        &self.input
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::layout(
            &self.deck,
            self.input.state(),
            self.input.tuning(),
            &self.colors,
            self.input.view_size(),
        );
        scene.processing = self.processing;
        scene
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.input.next_deadline()
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.input.tick(now)
    }

    /// Applies one event. Returns whether the scene needs to be redrawn.
    pub fn update(&mut self, event: AppEvent, now: Instant) -> bool {
        match event {
            AppEvent::Input(input) => self.input.handle(input, &self.deck, now).changed,
            AppEvent::Navigate(direction) => self.input.navigate(&self.deck, direction),
            AppEvent::Select(id) => self.input.select_slide(&self.deck, id),
            AppEvent::Resize(size) => {
                self.input.resize(size);
                true
            }
            AppEvent::Submit(draft) => self.submit(draft),
            AppEvent::SlideReady { draft, title } => self.commit(draft, title),
            AppEvent::Delete(id) => self.delete(id),
            AppEvent::Query(query, reply) => {
                self.answer(query, &reply);
                false
            }
            AppEvent::ConfigReload => self.reload_config(),
        }
    }

    fn submit(&mut self, draft: SlideDraft) -> bool {
        if self.processing {
            log::warn!("Still generating the previous title, ignoring new slide");
            return false;
        }
        if draft.content.trim().is_empty() {
            log::warn!("Ignoring slide without content");
            return false;
        }
        if let Some(title) = draft.given_title() {
            let title = title.to_string();
            return self.commit(draft, title);
        }

        self.processing = true;
        let summarizer = self.summarizer.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let title = resolve_title(&draft, &summarizer).await;
            // the view may be gone by now; then the result is simply dropped
            let _ = tx.send(AppEvent::SlideReady { draft, title }).await;
        });
        true
    }

    fn commit(&mut self, draft: SlideDraft, title: String) -> bool {
        self.processing = false;
        let slide = self.deck.insert(title, draft);
        log::info!("Added slide {} '{}'", slide.id, slide.title);

        let soft_capacity = self.input.tuning().soft_capacity;
        if self.deck.len() == soft_capacity {
            log::info!(
                "The ring now holds {} slides and reads better with fewer",
                soft_capacity
            );
        }
        self.input.reconcile(&self.deck);
        true
    }

    fn delete(&mut self, id: SlideId) -> bool {
        match self.deck.remove(id) {
            Some(slide) => {
                log::info!("Deleted slide {} '{}'", slide.id, slide.title);
                self.input.reconcile(&self.deck);
                true
            }
            None => {
                log::debug!("Ignoring deletion of unknown slide {}", id);
                false
            }
        }
    }

    fn answer(&self, query: Query, reply: &Sender<String>) {
        let json = match query {
            Query::Scene => serde_json::to_string(&self.scene()),
            Query::Slides => serde_json::to_string(&self.deck.iter().collect::<Vec<_>>()),
            Query::Hit(screen) => serde_json::to_string(&self.scene().hit_test(screen)),
        };
        match json {
            Ok(json) => {
                let _ = reply.try_send(json);
            }
            Err(e) => log::error!("Failed to encode {:?} reply: {}", query, e),
        }
    }

    fn reload_config(&mut self) -> bool {
        match config::load_config() {
            Ok(new_config) => {
                self.apply_config(&new_config);
                log::info!("Configuration reloaded");
                true
            }
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                false
            }
        }
    }

    /// Takes over tuning, keys, theme and summarizer from a reloaded config. The view
    /// size stays whatever the client last reported; `display` only seeds it at start.
    pub fn apply_config(&mut self, config: &Config) {
        self.input
            .reconfigure(config.viewport.clone(), config.keys.clone());
        self.colors = ThemeColors::from_config(&config.theme);
        self.summarizer = config.summarizer.service();
        self.input.reconcile(&self.deck);
    }
}
