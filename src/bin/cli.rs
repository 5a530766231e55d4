use battle_engine::ai::{DecisionOracle, HighestPowerOracle};
use battle_engine::config::{BattleConfig, GeminiConfig};
use battle_engine::core::cues::TerminalBell;
use battle_engine::core::session::BattleSession;
use battle_engine::core::state::{BattleState, Combatant, Side};
use battle_engine::data::Catalog;
use battle_engine::tools::gemini::GeminiOracle;
use inquire::{Confirm, Select};

use std::error::Error;
use std::fmt;
use std::sync::Arc;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

struct MoveChoice {
    index: usize,
    label: String,
}

impl fmt::Display for MoveChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("╔═══════════════════════════════════════╗");
    println!("║          ⚡ GEMINI BATTLE ⚡          ║");
    println!("╚═══════════════════════════════════════╝");
    println!();

    let config = BattleConfig::from_env()?;
    let catalog = Arc::new(Catalog::load_default()?);

    let oracle: Arc<dyn DecisionOracle> = match GeminiConfig::from_env() {
        Some(gemini) => {
            println!("🤖 Opponent is played by {}", gemini.model);
            Arc::new(GeminiOracle::from_config(&gemini))
        }
        None => {
            println!("🤖 No GEMINI_API_KEY set, the opponent plays its strongest move.");
            Arc::new(HighestPowerOracle::new())
        }
    };
    println!();

    let session = BattleSession::new(catalog, oracle, Arc::new(TerminalBell::new()), config)?;
    let mut last_log_idx = 0;

    loop {
        let state = session.snapshot().await;
        print_new_logs(&state, &mut last_log_idx);

        if let Some(winner) = state.winner() {
            println!("════════════════════════════════════════");
            match winner {
                Side::Player => println!("      🎉 VICTORY! Opponent neutralized. 🎉"),
                Side::Opponent => println!("      💔 DEFEATED. Mission failed."),
            }
            println!("════════════════════════════════════════");

            let rematch = Confirm::new("Rematch?").with_default(true).prompt().unwrap_or(false);
            if !rematch {
                break;
            }
            session.reset().await?;
            last_log_idx = 0;
            println!();
            continue;
        }

        print_battle_status(&state);

        let Some(index) = prompt_move(&state.player) else {
            break;
        };
        session.play_turn(index).await;
        println!();
    }

    session.shutdown();
    Ok(())
}

fn prompt_move(player: &Combatant) -> Option<usize> {
    let options: Vec<MoveChoice> = player
        .moves
        .iter()
        .enumerate()
        .map(|(index, m)| MoveChoice {
            index,
            label: format!("{:<14} [{}] PWR:{}", m.name, m.move_type, m.power),
        })
        .collect();

    Select::new("What will you do?", options)
        .prompt()
        .ok()
        .map(|choice| choice.index)
}

fn print_battle_status(state: &BattleState) {
    println!("─────────────────────────────────────────");
    println!(
        "  [Foe] {} ({}) {}",
        state.opponent.name,
        state.opponent.element,
        hp_bar_string(state.opponent_hp, state.opponent.max_hp)
    );
    println!(
        "  [You] {} ({}) {}",
        state.player.name,
        state.player.element,
        hp_bar_string(state.player_hp, state.player.max_hp)
    );
    println!("─────────────────────────────────────────");
}

fn hp_bar_string(hp: u32, max_hp: u32) -> String {
    let ratio = if max_hp == 0 {
        0.0
    } else {
        (hp as f64 / max_hp as f64).clamp(0.0, 1.0)
    };
    let percentage = (ratio * 100.0) as u32;
    let bars = (ratio * 10.0) as usize;
    let color = if percentage < 20 {
        RED
    } else if percentage < 50 {
        YELLOW
    } else {
        GREEN
    };
    format!(
        "{}[{}{}]{} {}/{} ({}%)",
        color,
        "█".repeat(bars),
        "░".repeat(10 - bars),
        RESET,
        hp,
        max_hp,
        percentage
    )
}

fn print_new_logs(state: &BattleState, last_log_idx: &mut usize) {
    for line in state.log.iter().skip(*last_log_idx) {
        if line.contains('!') {
            println!("➤ {}", line);
        } else {
            println!("  {}", line);
        }
    }
    *last_log_idx = state.log.len();
}
