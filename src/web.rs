//! Browser bindings
//!
//! The page owns the canvas, the animation frame loop and audio synthesis.
//! It drives a `WebGame` once per frame and draws from the returned JSON
//! snapshot.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioSink, SoundCue};
use crate::highscores::{Leaderboard, TOP_N, format_time};
use crate::input::{TouchButton, is_game_key};
use crate::session::{AnswerOutcome, Session};
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already set: {e}").into());
    }
    log::info!("Parkour Master starting...");
}

/// Forwards audio requests to a JS callback `(kind, arg)`
#[derive(Default)]
struct JsAudio {
    callback: Option<js_sys::Function>,
}

impl JsAudio {
    fn emit(&self, kind: &str, arg: JsValue) {
        if let Some(cb) = &self.callback {
            if let Err(e) = cb.call2(&JsValue::NULL, &JsValue::from_str(kind), &arg) {
                log::warn!("Audio callback failed: {:?}", e);
            }
        }
    }
}

impl AudioSink for JsAudio {
    fn play(&mut self, cue: SoundCue) {
        self.emit("play", JsValue::from_str(cue.as_str()));
    }

    fn start_music(&mut self, tier: usize) {
        self.emit("startMusic", JsValue::from_f64(tier as f64));
    }

    fn stop_music(&mut self) {
        self.emit("stopMusic", JsValue::UNDEFINED);
    }

    fn set_muted(&mut self, muted: bool) {
        self.emit("muted", JsValue::from_bool(muted));
    }
}

/// Game instance exposed to the page
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    audio: JsAudio,
    leaderboard: Leaderboard,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> WebGame {
        WebGame {
            session: Session::new(seed as u64),
            audio: JsAudio::default(),
            leaderboard: Leaderboard::load(),
            settings: Settings::load(),
        }
    }

    /// Register `(kind, arg)` audio callback; replays the stored mute state
    pub fn set_audio_callback(&mut self, callback: js_sys::Function) {
        self.audio.callback = Some(callback);
        self.audio.set_muted(self.settings.muted);
    }

    /// Start a run from the first tier
    pub fn start(&mut self, year: u8) {
        self.session.start(year, 0, &mut self.audio);
    }

    /// Start a run from a chosen tier (practice)
    pub fn start_at(&mut self, year: u8, tier: usize) {
        self.session.start(year, tier, &mut self.audio);
    }

    /// Advance one animation frame and return the render snapshot as JSON
    pub fn frame(&mut self, now_ms: f64) -> String {
        self.session.frame(now_ms, &mut self.audio);
        self.snapshot()
    }

    /// Current render snapshot as JSON, without advancing
    pub fn snapshot(&self) -> String {
        match serde_json::to_string(&self.session.snapshot()) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize snapshot: {:?}", e);
                "null".to_string()
            }
        }
    }

    /// Returns true when the page should suppress the key's default action
    pub fn key_down(&mut self, key: &str) -> bool {
        self.session.input_mut().key_down(key);
        is_game_key(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.session.input_mut().key_up(key);
        is_game_key(key)
    }

    /// `button` is "left", "right" or "jump"
    pub fn touch(&mut self, button: &str, down: bool) {
        match TouchButton::from_str(button) {
            Some(b) => self.session.input_mut().set_touch(b, down),
            None => log::warn!("Unknown touch button: {}", button),
        }
    }

    /// Answer the quiz: "correct", "wrong", "gameOver", or "" if none pending
    pub fn answer(&mut self, choice: usize) -> String {
        let outcome = match self.session.answer(choice, &mut self.audio) {
            Some(AnswerOutcome::Correct) => "correct",
            Some(AnswerOutcome::Wrong) => "wrong",
            Some(AnswerOutcome::GameOver) => "gameOver",
            None => "",
        };
        outcome.to_string()
    }

    pub fn next_level(&mut self) -> bool {
        self.session.next_level(&mut self.audio)
    }

    pub fn quit(&mut self) {
        self.session.quit(&mut self.audio);
    }

    /// Submit the finished run; returns the entry id
    pub fn submit_time(&mut self, name: &str) -> Option<f64> {
        let id = self.session.submit_time(&mut self.leaderboard, name)?;
        self.leaderboard.save();
        self.settings.set_name(name.trim());
        self.settings.save();
        Some(id as f64)
    }

    /// Top runs as JSON, optionally for one year
    pub fn leaderboard(&self, year: Option<u8>) -> String {
        serde_json::to_string(&self.leaderboard.top(TOP_N, year)).unwrap_or_else(|e| {
            log::warn!("Failed to serialize leaderboard: {:?}", e);
            "[]".to_string()
        })
    }

    pub fn profile(&self) -> String {
        serde_json::to_string(&self.settings).unwrap_or_else(|_| "{}".to_string())
    }

    /// Update the profile; colours outside the palettes are ignored
    pub fn set_profile(&mut self, name: &str, shirt: &str, pants: &str) {
        self.settings.set_name(name);
        self.settings.set_shirt_color(shirt);
        self.settings.set_pants_color(pants);
        self.settings.save();
    }

    pub fn toggle_muted(&mut self) -> bool {
        let muted = self.settings.toggle_muted();
        self.audio.set_muted(muted);
        self.settings.save();
        muted
    }
}

/// `m:ss.t` for the HUD and leaderboard
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_js(ms: f64) -> String {
    format_time(ms)
}
