//! Main application state and egui integration.

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch, Mutex};

use luminus::accessibility::resolver::{resolve_spacing, resolve_speech, text_style};
use luminus::accessibility::{
    AccessibilitySettings, Announcer, OsSignal, OsSignalBus, OsSignalSource, Politeness,
    SettingsPatch,
};
use luminus::api::{BackendClient, DescribeMode};
use luminus::audio::{
    DesktopHaptics, FeedbackEvent, FeedbackSequencer, RodioToneEngine, SpeechCallbacks,
    SpeechController, SpeechState, TtsSpeechEngine,
};
use luminus::storage::config::AppConfig;
use luminus::storage::{FileKeyValueStore, OsSignalSubscription, SettingsStore};
use luminus::ui::screens::settings::{contrast_announcement, styled, PREVIEW_PHRASE};
use luminus::ui::screens::{DescribeAction, DescribeScreen, SettingsAction, SettingsScreen};
use luminus::ui::theme::{self, sizes, spacing};

/// How often to poll the settings channel while idle.
const SETTINGS_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub type Store = Arc<Mutex<SettingsStore<FileKeyValueStore>>>;

/// Services created before the window opens.
pub struct AppServices {
    pub runtime: Handle,
    pub config: AppConfig,
    pub store: Store,
    pub settings_rx: watch::Receiver<AccessibilitySettings>,
    pub os_signals: Arc<OsSignalBus>,
    pub os_subscription: OsSignalSubscription,
}

/// Store mutations requested by the UI, applied in order.
#[derive(Debug)]
enum StoreCommand {
    Update(SettingsPatch),
    Reset,
}

/// Apply commands one at a time so rapid slider updates never reorder.
async fn run_store_worker(store: Store, mut rx: mpsc::UnboundedReceiver<StoreCommand>) {
    while let Some(command) = rx.recv().await {
        let mut store = store.lock().await;
        match command {
            StoreCommand::Update(patch) => {
                store.update(patch).await;
            }
            StoreCommand::Reset => {
                store.reset().await;
            }
        }
    }
    tracing::debug!("Settings worker stopped");
}

/// Answer from the analysis backend, already rendered as speech text.
#[derive(Debug)]
struct DescribeOutcome {
    text: String,
    ok: bool,
}

/// Check that the configured backend voice is offered.
async fn check_backend_voice(client: Arc<BackendClient>, voice: String) {
    match client.available_voices().await {
        Ok(voices) if voices.iter().any(|v| v.name == voice) => {
            tracing::info!("Backend voice {} available", voice);
        }
        Ok(voices) => {
            tracing::warn!(
                "Backend does not offer voice {} ({} voices listed)",
                voice,
                voices.len()
            );
        }
        Err(e) => tracing::warn!("Could not list backend voices: {}", e),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Describe,
    Settings,
}

/// Main application state.
pub struct LuminusApp {
    runtime: Handle,
    config: AppConfig,
    commands: mpsc::UnboundedSender<StoreCommand>,
    settings_rx: watch::Receiver<AccessibilitySettings>,
    /// Snapshot rendered this frame
    settings: AccessibilitySettings,
    feedback: FeedbackSequencer<DesktopHaptics, RodioToneEngine>,
    /// `None` when no synthesizer is available
    speech: Option<SpeechController<TtsSpeechEngine>>,
    announcer: Announcer,
    settings_screen: SettingsScreen,
    describe_screen: DescribeScreen,
    screen: Screen,
    /// `None` when the client could not be built
    backend: Option<Arc<BackendClient>>,
    outcomes_tx: mpsc::UnboundedSender<DescribeOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<DescribeOutcome>,
    os_signals: Arc<OsSignalBus>,
    _os_subscription: OsSignalSubscription,
}

impl LuminusApp {
    /// Create a new application instance.
    pub fn new(cc: &eframe::CreationContext<'_>, services: AppServices) -> Self {
        let AppServices {
            runtime,
            config,
            store,
            mut settings_rx,
            os_signals,
            os_subscription,
        } = services;

        let settings = *settings_rx.borrow_and_update();

        let (commands, command_rx) = mpsc::unbounded_channel();
        runtime.spawn(run_store_worker(store, command_rx));

        let speech = match TtsSpeechEngine::new() {
            Ok(engine) => Some(SpeechController::new(engine)),
            Err(e) => {
                tracing::warn!("Speech output disabled: {}", e);
                None
            }
        };

        let feedback = FeedbackSequencer::new(
            DesktopHaptics,
            RodioToneEngine::new(config.feedback.tone_volume),
        );

        let backend = match BackendClient::new(&config.backend) {
            Ok(client) => {
                let client = Arc::new(client);
                runtime.spawn(check_backend_voice(
                    Arc::clone(&client),
                    config.speech.voice.clone(),
                ));
                Some(client)
            }
            Err(e) => {
                tracing::warn!("Backend client unavailable: {}", e);
                None
            }
        };
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        let mut announcer = Announcer::new();
        announcer.set_enabled(settings.screen_reader_active);

        theme::apply_presentation(&cc.egui_ctx, &settings);

        Self {
            runtime,
            config,
            commands,
            settings_rx,
            settings,
            feedback,
            speech,
            announcer,
            settings_screen: SettingsScreen::new(),
            describe_screen: DescribeScreen::new(),
            screen: Screen::Describe,
            backend,
            outcomes_tx,
            outcomes_rx,
            os_signals,
            _os_subscription: os_subscription,
        }
    }

    /// Pick up a new snapshot from the store, if any.
    fn sync_settings(&mut self, ctx: &egui::Context) {
        match self.settings_rx.has_changed() {
            Ok(true) => {}
            Ok(false) => return,
            Err(_) => {
                tracing::warn!("Settings store closed");
                return;
            }
        }

        let previous = self.settings;
        self.settings = *self.settings_rx.borrow_and_update();
        theme::apply_presentation(ctx, &self.settings);
        self.announcer.set_enabled(self.settings.screen_reader_active);

        if previous.high_contrast != self.settings.high_contrast
            || previous.screen_reader_active != self.settings.screen_reader_active
        {
            self.announcer.set_status(contrast_announcement(&self.settings));
        }
    }

    /// Mirror egui's screen-reader option into the OS signal bus.
    fn poll_screen_reader(&self, ctx: &egui::Context) {
        let active = ctx.options(|o| o.screen_reader);
        if active != self.os_signals.current().screen_reader_active {
            self.os_signals.emit(OsSignal::ScreenReaderChanged(active));
        }
    }

    fn handle_action(&mut self, action: SettingsAction) {
        match action {
            SettingsAction::Update(patch) => {
                self.trigger(FeedbackEvent::Tap);
                self.send(StoreCommand::Update(patch));
            }
            SettingsAction::Reset => {
                self.send(StoreCommand::Reset);
                self.trigger(FeedbackEvent::Success);
                self.announcer.announce("Configurações restauradas");
            }
            SettingsAction::PreviewSpeech => self.speak(PREVIEW_PHRASE),
            SettingsAction::PreviewFeedback(event) => self.trigger(event),
        }
    }

    fn handle_describe(&mut self, action: DescribeAction) {
        match action {
            DescribeAction::Submit(path, mode) => {
                self.trigger(FeedbackEvent::Tap);
                let Some(client) = self.backend.clone() else {
                    let _ = self.outcomes_tx.send(DescribeOutcome {
                        text: "Erro: servidor não configurado.".to_string(),
                        ok: false,
                    });
                    return;
                };

                tracing::info!("Describing {} ({:?})", path.display(), mode);
                self.announcer.announce(match mode {
                    DescribeMode::Image => "Analisando imagem",
                    DescribeMode::Document => "Lendo documento",
                });

                let tx = self.outcomes_tx.clone();
                self.runtime.spawn(async move {
                    let outcome = match client.describe_file(&path, mode).await {
                        Ok(text) => DescribeOutcome { text, ok: true },
                        Err(e) => {
                            tracing::warn!("Describing {} failed: {}", path.display(), e);
                            DescribeOutcome {
                                text: e.spoken(),
                                ok: false,
                            }
                        }
                    };
                    // The window may have closed meanwhile.
                    let _ = tx.send(outcome);
                });
            }
            DescribeAction::Repeat => {
                if let Some(text) = self.describe_screen.last_result().map(str::to_owned) {
                    self.speak(&text);
                }
            }
        }
    }

    /// Speak finished backend answers.
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.trigger(if outcome.ok {
                FeedbackEvent::Success
            } else {
                FeedbackEvent::Error
            });
            self.speak(&outcome.text);
            self.describe_screen.finish(outcome.text);
        }
    }

    fn send(&self, command: StoreCommand) {
        if let Err(e) = self.commands.send(command) {
            tracing::warn!("Settings worker gone, dropping {:?}", e.0);
        }
    }

    fn trigger(&self, event: FeedbackEvent) {
        let _guard = self.runtime.enter();
        // Fire and forget; the handle is not needed.
        let _ = self.feedback.trigger(event, &self.settings);
    }

    fn speak(&self, text: &str) {
        let Some(speech) = &self.speech else {
            tracing::debug!("No speech engine, dropping: {}", text);
            return;
        };

        let params = resolve_speech(&self.settings, &self.config.speech.language);
        let callbacks = SpeechCallbacks::new()
            .on_done(|| tracing::debug!("Utterance finished"))
            .on_error(|e| tracing::warn!("Utterance failed: {}", e));
        speech.speak(text, params, callbacks);
    }

    /// Hand queued announcements to the speech engine.
    fn flush_announcements(&mut self) {
        let Some(speech) = &self.speech else {
            return;
        };

        while let Some(announcement) = self.announcer.pop() {
            if announcement.politeness == Politeness::Polite
                && speech.state() == SpeechState::Speaking
            {
                self.announcer.announce(announcement.message);
                break;
            }
            self.speak(&announcement.message);
        }
    }
}

impl eframe::App for LuminusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_screen_reader(ctx);
        self.sync_settings(ctx);

        self.drain_outcomes();

        let settings = self.settings;
        let margin = resolve_spacing(spacing::SCREEN, settings.increased_spacing);

        egui::TopBottomPanel::top("navigation").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (screen, label) in [
                    (Screen::Describe, "Descrever"),
                    (Screen::Settings, "Acessibilidade"),
                ] {
                    let text = styled(label, text_style(sizes::BUTTON, &settings));
                    if ui.selectable_label(self.screen == screen, text).clicked() {
                        self.screen = screen;
                    }
                }
            });
        });

        let frame =
            egui::Frame::central_panel(&ctx.style()).inner_margin(egui::Margin::same(margin as i8));
        match self.screen {
            Screen::Describe => {
                let actions = egui::CentralPanel::default()
                    .frame(frame)
                    .show(ctx, |ui| self.describe_screen.show(ui, &settings))
                    .inner;
                for action in actions {
                    self.handle_describe(action);
                }
            }
            Screen::Settings => {
                let actions = egui::CentralPanel::default()
                    .frame(frame)
                    .show(ctx, |ui| self.settings_screen.show(ui, &settings))
                    .inner;
                for action in actions {
                    self.handle_action(action);
                }
            }
        }

        self.flush_announcements();

        ctx.request_repaint_after(SETTINGS_POLL_INTERVAL);
    }
}
