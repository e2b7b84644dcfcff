//! Parkour Master entry point
//!
//! The browser build is driven from the page through `parkour_master::web`.
//! Natively this runs every tier headless with the autopilot and logs how it
//! went, which is handy for checking generator changes.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use parkour_master::GamePhase;
    use parkour_master::Session;
    use parkour_master::audio::{RecordingAudio, SoundCue};
    use parkour_master::consts::REFERENCE_FRAME_MS;
    use parkour_master::highscores::format_time;
    use parkour_master::input::{InputState, Intent};
    use parkour_master::sim::{EnemyKind, Level, PlatformKind, StepOutcome, TOTAL_TIERS, autopilot_intent};

    /// Give up on a tier after five minutes of game time
    const FRAME_CAP: u32 = 60 * 60 * 5;
    const YEAR: u8 = 6;

    /// Press the keys an intent corresponds to
    fn press(input: &mut InputState, intent: Intent) {
        for (key, held) in [
            ("ArrowLeft", intent.move_left),
            ("ArrowRight", intent.move_right),
            ("ArrowUp", intent.jump),
        ] {
            if held {
                input.key_down(key);
            } else {
                input.key_up(key);
            }
        }
    }

    fn describe(level: &Level) {
        let spikes = level.count_kind(|k| *k == PlatformKind::Spike);
        let checkpoints = level.count_kind(|k| matches!(k, PlatformKind::Checkpoint { .. }));
        let walkers = level.enemies.iter().filter(|e| e.kind == EnemyKind::Walker).count();
        let flyers = level.enemies.len() - walkers;
        log::info!(
            "Tier {}: length {}, {} platforms, {} spikes, {} checkpoints, {} walkers, {} flyers",
            level.tier,
            level.length,
            level.solids().count(),
            spikes,
            checkpoints,
            walkers,
            flyers
        );
    }

    pub fn run(seed: u64) {
        let mut session = Session::new(seed);
        let mut audio = RecordingAudio::new();
        let mut completed = 0;

        for tier in 0..TOTAL_TIERS {
            session.start(YEAR, tier, &mut audio);
            audio.clear();
            if let Some(engine) = session.engine() {
                describe(&engine.level);
            }

            let mut now = 0.0;
            let mut deaths = 0;
            let mut frames = 0;
            let mut finished = false;
            while frames < FRAME_CAP {
                now += REFERENCE_FRAME_MS;
                frames += 1;
                match session.phase() {
                    GamePhase::Playing => {
                        let intent = session.engine().map(autopilot_intent).unwrap_or_default();
                        press(session.input_mut(), intent);
                        if let StepOutcome::Death(cause) = session.frame(now, &mut audio) {
                            deaths += 1;
                            log::debug!("Tier {}: died ({:?})", tier, cause);
                        }
                    }
                    GamePhase::Dead => {
                        let choice = match session.question() {
                            Some(q) => {
                                log::debug!("Quiz: {} -> {:?}", q.question, q.correct_option());
                                q.answer_index
                            }
                            None => 0,
                        };
                        session.answer(choice, &mut audio);
                    }
                    GamePhase::LevelComplete | GamePhase::GameComplete => {
                        finished = true;
                        break;
                    }
                    GamePhase::YearSelect => break,
                }
            }

            let (score, time) = session
                .engine()
                .map(|e| (e.score, e.timer_ms))
                .unwrap_or((0, 0.0));
            if finished {
                completed += 1;
                log::info!(
                    "Tier {}: finished in {} with score {}, {} deaths, {} jumps",
                    tier,
                    format_time(time),
                    score,
                    deaths,
                    audio.count(SoundCue::Jump)
                );
            } else {
                log::warn!("Tier {}: gave up after {} frames and {} deaths", tier, frames, deaths);
            }
            session.quit(&mut audio);
        }

        log::info!("Autopilot finished {}/{} tiers (seed {})", completed, TOTAL_TIERS, seed);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Parkour Master (native) starting...");

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().unwrap_or_else(|e| {
            log::warn!("Invalid seed {:?} ({}), using 1", arg, e);
            1
        }),
        None => 1,
    };
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is parkour_master::web::wasm_start
}
