//! Audio cues
//!
//! The simulation never plays sound itself. It raises `SoundCue`s on the
//! engine state and the session forwards them to an `AudioSink`
//! (fire-and-forget: nothing waits on playback).

use serde::{Deserialize, Serialize};

/// Sound effect triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player left the ground
    Jump,
    /// Player touched down after being airborne
    Land,
    /// Checkpoint reached
    Checkpoint,
    /// Spike, enemy or fall
    Death,
    /// Quiz answered correctly
    CorrectAnswer,
    /// Quiz answered wrongly
    WrongAnswer,
    /// Finish reached on a non-final tier
    LevelComplete,
    /// Finish reached on the final tier
    GameComplete,
}

impl SoundCue {
    /// Stable name for hosts that dispatch by string
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Land => "land",
            SoundCue::Checkpoint => "checkpoint",
            SoundCue::Death => "death",
            SoundCue::CorrectAnswer => "correct",
            SoundCue::WrongAnswer => "wrong",
            SoundCue::LevelComplete => "levelComplete",
            SoundCue::GameComplete => "gameComplete",
        }
    }
}

/// Something that can play cues and background music
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
    /// Start the music track for a difficulty tier
    fn start_music(&mut self, tier: usize);
    fn stop_music(&mut self);
    fn set_muted(&mut self, _muted: bool) {}
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue) {}
    fn start_music(&mut self, _tier: usize) {}
    fn stop_music(&mut self) {}
}

/// Everything an `AudioSink` was asked to do, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCall {
    Play(SoundCue),
    StartMusic(usize),
    StopMusic,
    Muted(bool),
}

/// Records calls instead of playing them (headless runs and tests)
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, ignoring music calls
    pub fn cues(&self) -> Vec<SoundCue> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::Play(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues().iter().filter(|c| **c == cue).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: SoundCue) {
        self.calls.push(AudioCall::Play(cue));
    }

    fn start_music(&mut self, tier: usize) {
        self.calls.push(AudioCall::StartMusic(tier));
    }

    fn stop_music(&mut self) {
        self.calls.push(AudioCall::StopMusic);
    }

    fn set_muted(&mut self, muted: bool) {
        self.calls.push(AudioCall::Muted(muted));
    }
}
