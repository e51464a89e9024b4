//! Unit tests for the speech controller.

use std::sync::{Arc, Mutex};

use luminus::accessibility::SpeechParams;
use luminus::audio::speech::Completion;
use luminus::audio::{
    AudioError, SpeechCallbacks, SpeechController, SpeechEngine, SpeechState, Utterance,
};

/// Engine that holds completions until the test finishes them.
#[derive(Default)]
struct ScriptedEngine {
    spoken: Mutex<Vec<Utterance>>,
    pending: Mutex<Vec<Completion>>,
    stops: Mutex<usize>,
}

impl ScriptedEngine {
    /// Complete the oldest outstanding utterance.
    fn finish_next(&self, result: Result<(), AudioError>) {
        let completion = self.pending.lock().unwrap().remove(0);
        completion(result);
    }

    fn stops(&self) -> usize {
        *self.stops.lock().unwrap()
    }
}

impl SpeechEngine for ScriptedEngine {
    fn speak(&self, utterance: Utterance, completion: Completion) {
        self.spoken.lock().unwrap().push(utterance);
        self.pending.lock().unwrap().push(completion);
    }

    fn stop(&self) {
        *self.stops.lock().unwrap() += 1;
    }
}

fn params(enabled: bool) -> SpeechParams {
    SpeechParams {
        language: "pt-BR".to_string(),
        rate: 0.8,
        pitch: 1.0,
        enabled,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Done(&'static str),
    Failed(&'static str),
}

fn recording(log: &Arc<Mutex<Vec<Outcome>>>, name: &'static str) -> SpeechCallbacks {
    let done = Arc::clone(log);
    let failed = Arc::clone(log);
    SpeechCallbacks::new()
        .on_done(move || done.lock().unwrap().push(Outcome::Done(name)))
        .on_error(move |_| failed.lock().unwrap().push(Outcome::Failed(name)))
}

#[test]
fn test_speak_passes_params_to_engine() {
    let controller = SpeechController::new(ScriptedEngine::default());
    assert!(controller.speak("Olá", params(true), SpeechCallbacks::new()));
    assert_eq!(controller.state(), SpeechState::Speaking);

    let spoken = controller.engine().spoken.lock().unwrap().clone();
    assert_eq!(
        spoken,
        vec![Utterance {
            text: "Olá".to_string(),
            language: "pt-BR".to_string(),
            rate: 0.8,
            pitch: 1.0,
        }]
    );
}

/// Out-of-range parameters are clamped before reaching the engine.
#[test]
fn test_speak_clamps_rate_and_pitch() {
    let controller = SpeechController::new(ScriptedEngine::default());
    let params = SpeechParams {
        language: "pt-BR".to_string(),
        rate: 5.0,
        pitch: 0.1,
        enabled: true,
    };
    assert!(controller.speak("Olá", params, SpeechCallbacks::new()));

    let spoken = controller.engine().spoken.lock().unwrap().clone();
    assert_eq!(spoken[0].rate, 2.0);
    assert_eq!(spoken[0].pitch, 0.5);

    let params = SpeechParams {
        rate: f32::NAN,
        ..params_with_rate(1.0)
    };
    controller.speak("Olá", params, SpeechCallbacks::new());
    let spoken = controller.engine().spoken.lock().unwrap().clone();
    assert_eq!(spoken[1].rate, 0.8);
}

fn params_with_rate(rate: f32) -> SpeechParams {
    SpeechParams {
        rate,
        ..params(true)
    }
}

#[test]
fn test_done_fires_once() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let controller = SpeechController::new(ScriptedEngine::default());

    controller.speak("um", params(true), recording(&log, "first"));
    controller.engine().finish_next(Ok(()));

    assert_eq!(*log.lock().unwrap(), vec![Outcome::Done("first")]);
    assert_eq!(controller.state(), SpeechState::Idle);
}

/// Only the newest call's callback fires when two speaks overlap.
#[test]
fn test_second_speak_supersedes_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let controller = SpeechController::new(ScriptedEngine::default());

    controller.speak("um", params(true), recording(&log, "first"));
    controller.speak("dois", params(true), recording(&log, "second"));
    assert_eq!(controller.engine().stops(), 1);

    controller.engine().finish_next(Ok(()));
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(controller.state(), SpeechState::Speaking);

    controller.engine().finish_next(Ok(()));
    assert_eq!(*log.lock().unwrap(), vec![Outcome::Done("second")]);
    assert_eq!(controller.state(), SpeechState::Idle);
}

#[test]
fn test_engine_error_reaches_on_error() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let controller = SpeechController::new(ScriptedEngine::default());

    controller.speak("um", params(true), recording(&log, "first"));
    controller
        .engine()
        .finish_next(Err(AudioError::SpeechFailed("no voice".into())));

    assert_eq!(*log.lock().unwrap(), vec![Outcome::Failed("first")]);
    assert_eq!(controller.state(), SpeechState::Idle);
}

#[test]
fn test_sound_disabled_skips_engine() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let controller = SpeechController::new(ScriptedEngine::default());

    assert!(!controller.speak("um", params(false), recording(&log, "first")));
    assert!(controller.engine().spoken.lock().unwrap().is_empty());
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(controller.state(), SpeechState::Idle);
}

#[test]
fn test_stop_silences_callbacks() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let controller = SpeechController::new(ScriptedEngine::default());

    controller.speak("um", params(true), recording(&log, "first"));
    controller.stop();
    assert_eq!(controller.state(), SpeechState::Idle);
    assert_eq!(controller.engine().stops(), 1);

    controller.engine().finish_next(Ok(()));
    assert!(log.lock().unwrap().is_empty());

    // Stopping while idle does not reach the engine.
    controller.stop();
    assert_eq!(controller.engine().stops(), 1);
}

/// Engines may complete synchronously inside `speak`.
#[test]
fn test_synchronous_completion() {
    struct Immediate;

    impl SpeechEngine for Immediate {
        fn speak(&self, _utterance: Utterance, completion: Completion) {
            completion(Ok(()));
        }

        fn stop(&self) {}
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let controller = SpeechController::new(Immediate);
    controller.speak("um", params(true), recording(&log, "first"));

    assert_eq!(*log.lock().unwrap(), vec![Outcome::Done("first")]);
    assert_eq!(controller.state(), SpeechState::Idle);
}
