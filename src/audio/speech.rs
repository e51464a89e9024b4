//! Speech controller.
//!
//! At most one utterance is active at a time. Starting a new one cancels
//! the previous one, and a generation counter makes sure a late completion
//! from a cancelled utterance never reaches the caller's callbacks.

use std::sync::{Arc, Mutex, PoisonError};

use super::AudioError;
use crate::accessibility::resolver::{clamp_speech_pitch, clamp_speech_rate, SpeechParams};

/// Whether the controller believes an utterance is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechState {
    #[default]
    Idle,
    Speaking,
}

/// Text plus the voice parameters it should be spoken with.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: String,
    /// Rate multiplier (1.0 is the engine's normal speed)
    pub rate: f32,
    /// Pitch multiplier (1.0 is the engine's normal pitch)
    pub pitch: f32,
}

/// Completion handed to the engine with each utterance.
pub type Completion = Box<dyn FnOnce(Result<(), AudioError>) + Send>;

/// Speech synthesizer backend.
///
/// `speak` must call `completion` exactly once: with `Ok` when the utterance
/// finished or was interrupted, with `Err` when it could not be spoken.
/// Implementations may call it synchronously.
pub trait SpeechEngine: Send + Sync + 'static {
    fn speak(&self, utterance: Utterance, completion: Completion);

    fn stop(&self);
}

/// Caller callbacks; exactly one fires per accepted, non-superseded call.
#[derive(Default)]
pub struct SpeechCallbacks {
    on_done: Option<Box<dyn FnOnce() + Send>>,
    on_error: Option<Box<dyn FnOnce(AudioError) + Send>>,
}

impl SpeechCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_done(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_done = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(AudioError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    fn finish(self, result: Result<(), AudioError>) {
        match result {
            Ok(()) => {
                if let Some(f) = self.on_done {
                    f();
                }
            }
            Err(e) => {
                tracing::warn!("Speech failed: {}", e);
                if let Some(f) = self.on_error {
                    f(e);
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: SpeechState,
    generation: u64,
}

/// Serializes speech requests onto a [`SpeechEngine`].
pub struct SpeechController<E> {
    engine: Arc<E>,
    inner: Arc<Mutex<Inner>>,
}

impl<E> Clone for SpeechController<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: SpeechEngine> SpeechController<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> SpeechState {
        self.lock().state
    }

    /// Speak `text`, interrupting any current utterance.
    ///
    /// Returns `false` without touching the engine when sound is disabled
    /// in `params`; no callback fires in that case.
    pub fn speak(&self, text: &str, params: SpeechParams, callbacks: SpeechCallbacks) -> bool {
        if !params.enabled {
            tracing::debug!("Speech suppressed: sound disabled");
            return false;
        }

        let (generation, interrupted) = {
            let mut inner = self.lock();
            inner.generation = inner.generation.wrapping_add(1);
            let interrupted = inner.state == SpeechState::Speaking;
            inner.state = SpeechState::Speaking;
            (inner.generation, interrupted)
        };

        if interrupted {
            tracing::debug!("Interrupting current utterance");
            self.engine.stop();
        }

        let inner = Arc::clone(&self.inner);
        let completion: Completion = Box::new(move |result| {
            {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                if inner.generation != generation {
                    tracing::debug!("Ignoring completion of superseded utterance {}", generation);
                    return;
                }
                inner.state = SpeechState::Idle;
            }
            callbacks.finish(result);
        });

        tracing::debug!("Speaking utterance {} ({} chars)", generation, text.len());
        self.engine.speak(
            Utterance {
                text: text.to_string(),
                language: params.language,
                rate: clamp_speech_rate(params.rate),
                pitch: clamp_speech_pitch(params.pitch),
            },
            completion,
        );

        true
    }

    /// Cancel the current utterance; its callbacks never fire.
    pub fn stop(&self) {
        {
            let mut inner = self.lock();
            if inner.state == SpeechState::Idle {
                return;
            }
            inner.generation = inner.generation.wrapping_add(1);
            inner.state = SpeechState::Idle;
        }
        tracing::debug!("Speech stopped");
        self.engine.stop();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Identity of the registered utterance.
enum PendingId<I> {
    /// `speak` has not returned yet; end events seen meanwhile are kept.
    Awaiting(Vec<I>),
    Known(I),
    /// The backend gave no id; the next end event is taken as ours.
    Untracked,
}

struct PendingUtterance<I = tts::UtteranceId> {
    id: PendingId<I>,
    completion: Completion,
}

impl<I: PartialEq> PendingUtterance<I> {
    /// Whether an end event belongs to this utterance. Unknown events seen
    /// before the id is known are remembered.
    fn observe_end(&mut self, id: I) -> bool {
        match &mut self.id {
            PendingId::Awaiting(seen) => {
                seen.push(id);
                false
            }
            PendingId::Known(pid) => *pid == id,
            PendingId::Untracked => true,
        }
    }

    /// Record the id returned by the backend. Returns true when its end
    /// event already arrived.
    fn resolve(&mut self, id: Option<I>) -> bool {
        let already_ended = match (&self.id, &id) {
            (PendingId::Awaiting(seen), Some(id)) => seen.contains(id),
            _ => false,
        };
        self.id = match id {
            Some(id) => PendingId::Known(id),
            None => PendingId::Untracked,
        };
        already_ended
    }
}

type PendingSlot = Arc<Mutex<Option<PendingUtterance>>>;

/// Speech engine backed by the OS synthesizer through the `tts` crate.
pub struct TtsSpeechEngine {
    tts: Mutex<tts::Tts>,
    pending: PendingSlot,
    callbacks_supported: bool,
    voice_supported: bool,
    /// Language the current voice was picked for.
    voice_language: Mutex<Option<String>>,
}

impl TtsSpeechEngine {
    /// Connect to the platform synthesizer.
    pub fn new() -> Result<Self, AudioError> {
        tracing::info!("Initializing speech synthesizer");

        let tts = tts::Tts::default().map_err(|e| AudioError::TtsInitFailed(e.to_string()))?;
        let features = tts.supported_features();
        let pending: PendingSlot = Arc::new(Mutex::new(None));

        let callbacks_supported = features.utterance_callbacks
            && {
                let slot = Arc::clone(&pending);
                let on_end: Box<dyn FnMut(tts::UtteranceId)> = Box::new(move |id| {
                    let finished = {
                        let mut pending = slot.lock().unwrap_or_else(PoisonError::into_inner);
                        let current = pending.as_mut().is_some_and(|p| p.observe_end(id));
                        if current {
                            pending.take()
                        } else {
                            None
                        }
                    };
                    if let Some(p) = finished {
                        (p.completion)(Ok(()));
                    }
                });
                match tts.on_utterance_end(Some(on_end)) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("Utterance callbacks unavailable: {}", e);
                        false
                    }
                }
            };

        tracing::info!(
            "Speech synthesizer ready (utterance callbacks {}, voices {})",
            callbacks_supported,
            features.voice
        );

        Ok(Self {
            tts: Mutex::new(tts),
            pending,
            callbacks_supported,
            voice_supported: features.voice,
            voice_language: Mutex::new(None),
        })
    }

    fn configure(&self, tts: &mut tts::Tts, utterance: &Utterance) -> Result<(), tts::Error> {
        let rate = scale_around_normal(
            utterance.rate,
            tts.normal_rate(),
            tts.min_rate(),
            tts.max_rate(),
        );
        tts.set_rate(rate)?;

        let pitch = scale_around_normal(
            utterance.pitch,
            tts.normal_pitch(),
            tts.min_pitch(),
            tts.max_pitch(),
        );
        tts.set_pitch(pitch)?;

        if self.voice_supported {
            let mut selected = self
                .voice_language
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if selected.as_deref() != Some(utterance.language.as_str()) {
                select_voice(tts, &utterance.language)?;
                *selected = Some(utterance.language.clone());
            }
        }

        Ok(())
    }

    fn take_pending(&self) -> Option<PendingUtterance> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl SpeechEngine for TtsSpeechEngine {
    fn speak(&self, utterance: Utterance, completion: Completion) {
        // An utterance still registered here was interrupted.
        if let Some(previous) = self.take_pending() {
            (previous.completion)(Ok(()));
        }

        let mut tts = self.tts.lock().unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = self.configure(&mut tts, &utterance) {
            tracing::warn!("Failed to apply speech parameters: {}", e);
        }

        if self.callbacks_supported {
            *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(PendingUtterance {
                id: PendingId::Awaiting(Vec::new()),
                completion,
            });

            match tts.speak(utterance.text, true) {
                Ok(id) => {
                    drop(tts);
                    let finished = {
                        let mut pending =
                            self.pending.lock().unwrap_or_else(PoisonError::into_inner);
                        let ended = pending.as_mut().is_some_and(|p| p.resolve(id));
                        if ended {
                            pending.take()
                        } else {
                            None
                        }
                    };
                    if let Some(p) = finished {
                        (p.completion)(Ok(()));
                    }
                }
                Err(e) => {
                    drop(tts);
                    if let Some(p) = self.take_pending() {
                        (p.completion)(Err(AudioError::SpeechFailed(e.to_string())));
                    }
                }
            }
        } else {
            // Degraded mode: without end callbacks the utterance counts as
            // done once the backend accepted it, so `on_done` fires while
            // it is still playing.
            let result = tts
                .speak(utterance.text, true)
                .map(|_| ())
                .map_err(|e| AudioError::SpeechFailed(e.to_string()));
            drop(tts);
            completion(result);
        }
    }

    fn stop(&self) {
        {
            let mut tts = self.tts.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = tts.stop() {
                tracing::warn!("Failed to stop speech: {}", e);
            }
        }
        if let Some(previous) = self.take_pending() {
            (previous.completion)(Ok(()));
        }
    }
}

/// Map a multiplier around 1.0 onto a backend range around its normal value.
pub fn scale_around_normal(multiplier: f32, normal: f32, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    (normal * multiplier).clamp(lo, hi)
}

fn select_voice(tts: &mut tts::Tts, language: &str) -> Result<(), tts::Error> {
    let voices = tts.voices()?;
    let primary = language.split(['-', '_']).next().unwrap_or(language);

    let exact = voices
        .iter()
        .find(|v| v.language().as_str().eq_ignore_ascii_case(language));
    let fallback = || {
        voices.iter().find(|v| {
            v.language()
                .as_str()
                .split(['-', '_'])
                .next()
                .is_some_and(|p| p.eq_ignore_ascii_case(primary))
        })
    };

    match exact.or_else(fallback) {
        Some(voice) => {
            tracing::info!("Using voice {} for {}", voice.name(), language);
            tts.set_voice(voice)
        }
        None => {
            tracing::warn!("No voice for {}, keeping the system default", language);
            Ok(())
        }
    }
}
