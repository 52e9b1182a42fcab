//! Troll Yeeter entry point
//!
//! On the web the page constructs a `WasmGame` and drives it; this only sets
//! up logging. Natively it plays a few scripted runs headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    troll_yeeter::platform::init_logging();
    log::info!("Troll Yeeter starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use troll_yeeter::consts::SIM_DT;
    use troll_yeeter::sim::{GameEvent, Layout, RunState};
    use troll_yeeter::{Game, LocalService, Tuning};

    troll_yeeter::platform::init_logging();
    log::info!("Troll Yeeter (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| troll_yeeter::platform::now_unix_ms() as u64);

    let mut game = Game::new(
        seed,
        Layout::default(),
        Tuning::default(),
        LocalService::load("native"),
    );
    if let Some(challenge) = &game.session().challenge.challenge {
        println!("Daily challenge: {} - {}", challenge.title, challenge.description);
    }

    // Release after a different wind-up each run
    for (run, spin_ticks) in [45u32, 70, 95].into_iter().enumerate() {
        if game.state() == RunState::GameOver {
            game.primary_action();
            game.update(SIM_DT);
        }
        game.primary_action();
        game.update(SIM_DT);
        for _ in 0..spin_ticks {
            game.update(SIM_DT);
        }
        game.primary_action();
        game.update(SIM_DT);

        // Ten simulated minutes is far more than any run lasts
        for _ in 0..36_000 {
            if game.state() == RunState::GameOver {
                break;
            }
            game.update(SIM_DT);
        }

        for event in game.drain_events() {
            match event {
                GameEvent::ZoneChanged { zone } => println!("  entered {}", zone.name()),
                GameEvent::RankReached { rank } => println!("  rank up: {}", rank.title()),
                GameEvent::PowerUpCollected { kind, .. } => println!("  picked up {}", kind.name()),
                GameEvent::ShieldAbsorbed => println!("  shield saved the landing"),
                GameEvent::ChallengeCompleted { challenge_id } => {
                    println!("  challenge complete: {}", challenge_id)
                }
                GameEvent::GameOver { score, rank, .. } => {
                    println!("Run {}: score {} ({})", run + 1, score, rank.title())
                }
                _ => {}
            }
        }
    }

    println!("\nLeaderboard:");
    for line in &game.leaderboard_lines {
        println!("  {}", line);
    }
    if let Some(status) = &game.status_message {
        println!("{}", status);
    }
}
