//! Session controller
//!
//! Owns the engine state between frames and drives the screen flow around it:
//! year select, play, the quiz after a death, level transitions and the end of
//! the run. All audio goes through the `AudioSink` passed into each call.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioSink, SoundCue};
use crate::consts::CORRECT_ANSWER_BONUS;
use crate::highscores::Leaderboard;
use crate::input::InputState;
use crate::quiz::{Question, QuestionBank, clamp_year};
use crate::sim::{EngineState, StepOutcome, TOTAL_TIERS, generate_level_seeded, step};

/// Screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    YearSelect,
    Playing,
    /// Waiting for a quiz answer
    Dead,
    LevelComplete,
    GameComplete,
}

/// Result of answering the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    /// Bonus awarded, player respawned
    Correct,
    /// Life lost, player respawned
    Wrong,
    /// Last life lost, back to year select
    GameOver,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub year: u8,
    pub engine: Option<&'a EngineState>,
    pub question: Option<&'a Question>,
    pub final_score: u64,
    pub final_time_ms: f64,
}

/// One player's run through the tiers
pub struct Session {
    phase: GamePhase,
    year: u8,
    engine: Option<EngineState>,
    input: InputState,
    bank: QuestionBank,
    question: Option<Question>,
    final_score: u64,
    final_time_ms: f64,
    rng: Pcg32,
}

impl Session {
    /// New session using the built-in question bank
    pub fn new(seed: u64) -> Self {
        Self::with_bank(seed, QuestionBank::builtin())
    }

    pub fn with_bank(seed: u64, bank: QuestionBank) -> Self {
        Self {
            phase: GamePhase::YearSelect,
            year: 1,
            engine: None,
            input: InputState::new(),
            bank,
            question: None,
            final_score: 0,
            final_time_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn year(&self) -> u8 {
        self.year
    }

    pub fn engine(&self) -> Option<&EngineState> {
        self.engine.as_ref()
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Question currently shown (only while dead)
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn final_score(&self) -> u64 {
        self.final_score
    }

    /// Run time of the completed game, carried across every tier
    pub fn final_time_ms(&self) -> f64 {
        self.final_time_ms
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            year: self.year,
            engine: self.engine.as_ref(),
            question: self.question.as_ref(),
            final_score: self.final_score,
            final_time_ms: self.final_time_ms,
        }
    }

    /// Begin a run at `tier` for a school year
    pub fn start(&mut self, year: u8, tier: usize, audio: &mut dyn AudioSink) {
        self.year = clamp_year(year);
        self.question = None;
        self.final_score = 0;
        self.final_time_ms = 0.0;
        self.load_level(tier, 0.0, audio);
        log::info!("Run started: year {}, tier {}", self.year, tier);
    }

    /// Advance one animation frame; a no-op unless playing
    pub fn frame(&mut self, now_ms: f64, audio: &mut dyn AudioSink) -> StepOutcome {
        if self.phase != GamePhase::Playing {
            return StepOutcome::Continue;
        }
        let Some(engine) = self.engine.as_mut() else {
            return StepOutcome::Continue;
        };

        let intent = self.input.intent();
        let outcome = step(engine, &intent, now_ms);
        for cue in engine.drain_cues() {
            audio.play(cue);
        }

        match outcome {
            StepOutcome::Continue | StepOutcome::Checkpoint { .. } => {}
            StepOutcome::Death(cause) => {
                log::info!("Died ({:?}), {} lives left", cause, engine.lives);
                self.question = self.bank.random(self.year, &mut self.rng).cloned();
                self.enter(GamePhase::Dead, audio);
            }
            StepOutcome::LevelComplete { score } => {
                log::info!("Tier {} complete, score {}", engine.level_index, score);
                self.enter(GamePhase::LevelComplete, audio);
            }
            StepOutcome::GameComplete { score, timer_ms } => {
                log::info!("Game complete: score {}, time {:.0}ms", score, timer_ms);
                self.final_score = score;
                self.final_time_ms = timer_ms;
                self.enter(GamePhase::GameComplete, audio);
            }
        }
        outcome
    }

    /// Answer the pending quiz question
    ///
    /// Returns `None` when no answer is expected. With an empty question bank
    /// any answer counts as correct.
    pub fn answer(&mut self, choice: usize, audio: &mut dyn AudioSink) -> Option<AnswerOutcome> {
        if self.phase != GamePhase::Dead {
            return None;
        }
        let engine = self.engine.as_mut()?;
        let correct = self.question.as_ref().is_none_or(|q| q.is_correct(choice));
        self.question = None;

        if correct {
            engine.score += CORRECT_ANSWER_BONUS;
            audio.play(SoundCue::CorrectAnswer);
        } else {
            engine.lives = engine.lives.saturating_sub(1);
            audio.play(SoundCue::WrongAnswer);
            if engine.lives == 0 {
                log::info!("Out of lives at tier {}", engine.level_index);
                self.engine = None;
                self.enter(GamePhase::YearSelect, audio);
                return Some(AnswerOutcome::GameOver);
            }
        }

        engine.respawn();
        self.input.clear();
        self.enter(GamePhase::Playing, audio);
        Some(if correct { AnswerOutcome::Correct } else { AnswerOutcome::Wrong })
    }

    /// Move on from a completed level, carrying the run timer
    pub fn next_level(&mut self, audio: &mut dyn AudioSink) -> bool {
        if self.phase != GamePhase::LevelComplete {
            return false;
        }
        let Some(engine) = self.engine.as_ref() else {
            return false;
        };
        let tier = (engine.level_index + 1).min(TOTAL_TIERS - 1);
        let carry = engine.timer_ms;
        self.load_level(tier, carry, audio);
        log::info!("Advancing to tier {} ({:.0}ms so far)", tier, carry);
        true
    }

    /// Abandon the run and return to year select
    pub fn quit(&mut self, audio: &mut dyn AudioSink) {
        self.engine = None;
        self.question = None;
        self.input.clear();
        self.enter(GamePhase::YearSelect, audio);
    }

    /// Record a completed run on the leaderboard
    pub fn submit_time(&self, board: &mut Leaderboard, name: &str) -> Option<u64> {
        if self.phase != GamePhase::GameComplete {
            return None;
        }
        board.submit(name, self.final_time_ms, self.year)
    }

    fn load_level(&mut self, tier: usize, carry_timer_ms: f64, audio: &mut dyn AudioSink) {
        let seed = self.rng.random::<u64>();
        let level = generate_level_seeded(tier, seed);
        self.engine = Some(EngineState::new(level, carry_timer_ms));
        self.input.clear();
        self.enter(GamePhase::Playing, audio);
    }

    /// Switch phase; music runs exactly while playing
    fn enter(&mut self, phase: GamePhase, audio: &mut dyn AudioSink) {
        let was_playing = self.phase == GamePhase::Playing;
        self.phase = phase;
        match (was_playing, phase == GamePhase::Playing) {
            (false, true) => {
                let tier = self.engine.as_ref().map(|e| e.level_index).unwrap_or(0);
                audio.start_music(tier);
            }
            (true, false) => audio.stop_music(),
            (true, true) => {
                // Fresh level while still playing: switch tracks
                audio.stop_music();
                let tier = self.engine.as_ref().map(|e| e.level_index).unwrap_or(0);
                audio.start_music(tier);
            }
            (false, false) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCall, RecordingAudio, SilentAudio};
    use crate::consts::*;
    use crate::sim::{DeathCause, PlatformKind};
    use glam::Vec2;

    const FRAME: f64 = REFERENCE_FRAME_MS;

    fn playing(tier: usize) -> (Session, RecordingAudio) {
        let mut session = Session::new(7);
        let mut audio = RecordingAudio::new();
        session.start(4, tier, &mut audio);
        (session, audio)
    }

    /// Drop the player into the void and run until the death registers
    fn kill(session: &mut Session, audio: &mut RecordingAudio, now: &mut f64) {
        if let Some(engine) = session.engine.as_mut() {
            engine.player.pos = Vec2::new(SPAWN_X, DEATH_Y + 10.0);
        }
        *now += FRAME;
        let outcome = session.frame(*now, audio);
        assert_eq!(outcome, StepOutcome::Death(DeathCause::Fall));
        assert_eq!(session.phase(), GamePhase::Dead);
    }

    fn correct_choice(session: &Session) -> usize {
        session.question().map(|q| q.answer_index).unwrap_or(0)
    }

    fn wrong_choice(session: &Session) -> usize {
        session.question().map(|q| (q.answer_index + 1) % q.options.len()).unwrap_or(0)
    }

    #[test]
    fn test_start_spawns_on_first_platform() {
        let (session, audio) = playing(2);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(audio.calls, vec![AudioCall::StartMusic(2)]);

        let engine = session.engine().unwrap();
        assert_eq!(engine.level_index, 2);
        assert_eq!(engine.lives, STARTING_LIVES);
        assert_eq!(engine.score, 0);
        assert_eq!(engine.timer_ms, 0.0);
        assert_eq!(engine.player.pos, Vec2::new(SPAWN_X, GROUND_Y - PLAYER_H));
        assert_eq!(engine.checkpoint, engine.player.pos);
    }

    #[test]
    fn test_frame_is_idle_outside_play() {
        let mut session = Session::new(1);
        let mut audio = RecordingAudio::new();
        assert_eq!(session.frame(100.0, &mut audio), StepOutcome::Continue);
        assert!(session.engine().is_none());
        assert!(audio.calls.is_empty());
        assert_eq!(session.answer(0, &mut audio), None);
        assert!(!session.next_level(&mut audio));
    }

    #[test]
    fn test_frames_forward_cues() {
        let (mut session, mut audio) = playing(0);
        session.input_mut().key_down(" ");
        let mut now = 0.0;
        for _ in 0..5 {
            now += FRAME;
            session.frame(now, &mut audio);
        }
        // Landed on the first frame, then jumped
        assert_eq!(audio.count(SoundCue::Land), 1);
        assert_eq!(audio.count(SoundCue::Jump), 1);
    }

    #[test]
    fn test_death_asks_a_question_and_stops_music() {
        let (mut session, mut audio) = playing(0);
        let mut now = 0.0;
        kill(&mut session, &mut audio, &mut now);

        let question = session.question().unwrap();
        assert!((3..=5).contains(&question.year));
        assert_eq!(audio.count(SoundCue::Death), 1);
        assert_eq!(audio.calls.last(), Some(&AudioCall::StopMusic));

        // Frozen until answered
        let before = session.engine().unwrap().player.pos;
        session.frame(now + 500.0, &mut audio);
        assert_eq!(session.engine().unwrap().player.pos, before);
    }

    #[test]
    fn test_correct_answer_respawns_at_checkpoint() {
        let (mut session, mut audio) = playing(0);
        let checkpoint = Vec2::new(640.0, 300.0);
        if let Some(engine) = session.engine.as_mut() {
            engine.checkpoint = checkpoint;
        }
        session.input_mut().key_down("d");
        let mut now = 0.0;
        kill(&mut session, &mut audio, &mut now);

        let choice = correct_choice(&session);
        assert_eq!(session.answer(choice, &mut audio), Some(AnswerOutcome::Correct));
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(audio.count(SoundCue::CorrectAnswer), 1);
        assert_eq!(audio.calls.last(), Some(&AudioCall::StartMusic(0)));

        let engine = session.engine().unwrap();
        assert_eq!(engine.score, CORRECT_ANSWER_BONUS);
        assert_eq!(engine.lives, STARTING_LIVES);
        assert_eq!(engine.player.pos, checkpoint - Vec2::new(0.0, RESPAWN_LIFT));
        assert_eq!(engine.player.vel, Vec2::ZERO);
        assert_eq!(session.input.intent(), crate::input::Intent::IDLE);

        // Only one answer per death
        assert_eq!(session.answer(choice, &mut audio), None);
    }

    #[test]
    fn test_quiz_pause_counts_toward_run_timer() {
        let (mut session, mut audio) = playing(0);
        let mut now = 0.0;
        kill(&mut session, &mut audio, &mut now);
        let timer = session.engine().unwrap().timer_ms;

        let choice = correct_choice(&session);
        session.answer(choice, &mut audio);
        let respawn = session.engine().unwrap().player.pos;
        // Ten seconds spent on the question
        session.frame(now + 10_000.0, &mut audio);
        let engine = session.engine().unwrap();
        let elapsed = engine.timer_ms - timer;
        assert!((elapsed - 10_000.0).abs() < 1e-6);
        // Integration is still clamped to a few frames
        assert!(engine.player.pos.distance(respawn) < 100.0);
    }

    #[test]
    fn test_wrong_answers_cost_lives_until_game_over() {
        let (mut session, mut audio) = playing(0);
        let mut now = 0.0;

        for lives_left in (1..STARTING_LIVES).rev() {
            kill(&mut session, &mut audio, &mut now);
            let choice = wrong_choice(&session);
            assert_eq!(session.answer(choice, &mut audio), Some(AnswerOutcome::Wrong));
            assert_eq!(session.engine().unwrap().lives, lives_left);
            assert_eq!(session.phase(), GamePhase::Playing);
        }

        kill(&mut session, &mut audio, &mut now);
        let choice = wrong_choice(&session);
        assert_eq!(session.answer(choice, &mut audio), Some(AnswerOutcome::GameOver));
        assert_eq!(session.phase(), GamePhase::YearSelect);
        assert!(session.engine().is_none());
        assert_eq!(audio.count(SoundCue::WrongAnswer), STARTING_LIVES as usize);
    }

    #[test]
    fn test_next_level_carries_timer_and_resets_counters() {
        let (mut session, mut audio) = playing(0);
        let finish = session.engine().unwrap().level.finish().unwrap().rect;
        if let Some(engine) = session.engine.as_mut() {
            engine.timer_ms = 42_000.0;
            engine.score = 250;
            engine.lives = 1;
            engine.player.pos = Vec2::new(finish.x, GROUND_Y - PLAYER_H);
        }

        let outcome = session.frame(FRAME, &mut audio);
        assert_eq!(outcome, StepOutcome::LevelComplete { score: 250 + FINISH_BONUS });
        assert_eq!(session.phase(), GamePhase::LevelComplete);
        assert_eq!(audio.calls.last(), Some(&AudioCall::StopMusic));

        assert!(session.next_level(&mut audio));
        let engine = session.engine().unwrap();
        assert_eq!(engine.level_index, 1);
        assert_eq!(engine.score, 0);
        assert_eq!(engine.lives, STARTING_LIVES);
        assert!((engine.timer_ms - (42_000.0 + FRAME)).abs() < 1e-9);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(audio.calls.last(), Some(&AudioCall::StartMusic(1)));
    }

    #[test]
    fn test_final_tier_completes_the_game() {
        let (mut session, mut audio) = playing(TOTAL_TIERS - 1);
        let finish = session
            .engine()
            .unwrap()
            .level
            .platforms
            .iter()
            .find(|p| p.kind == PlatformKind::Finish)
            .unwrap()
            .rect;
        if let Some(engine) = session.engine.as_mut() {
            engine.timer_ms = 300_000.0;
            engine.player.pos = Vec2::new(finish.x, GROUND_Y - PLAYER_H);
        }

        let outcome = session.frame(5.0, &mut audio);
        assert!(matches!(outcome, StepOutcome::GameComplete { .. }));
        assert_eq!(session.phase(), GamePhase::GameComplete);
        assert_eq!(session.final_score(), FINISH_BONUS);
        assert!((session.final_time_ms() - (300_000.0 + FRAME)).abs() < 1e-9);
        assert_eq!(audio.count(SoundCue::GameComplete), 1);
        assert!(!session.next_level(&mut audio));

        let mut board = Leaderboard::new();
        let id = session.submit_time(&mut board, "  Ada  ");
        assert!(id.is_some());
        assert_eq!(board.top(10, None)[0].name, "Ada");
        assert_eq!(board.top(10, None)[0].year_level, 4);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = Session::new(11);
        session.start(4, 3, &mut SilentAudio);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["year"], 4);
        assert!(json["engine"]["level"]["platforms"].as_array().unwrap().len() > 5);
        assert!(json["question"].is_null());
    }

    #[test]
    fn test_quit_returns_to_menu() {
        let (mut session, mut audio) = playing(1);
        session.quit(&mut audio);
        assert_eq!(session.phase(), GamePhase::YearSelect);
        assert!(session.engine().is_none());
        assert_eq!(audio.calls.last(), Some(&AudioCall::StopMusic));
    }
}
