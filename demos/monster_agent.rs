//! Monster Agent
//!
//! Drives a single monster through a scripted encounter:
//! - walks towards the character
//! - attacks once in range
//! - loses the character, gets furious, and finally gives up
//!
//! Run with: RUST_LOG=automata=debug cargo run --example monster_agent

use anyhow::Result;
use automata::journal::TransitionLog;
use automata::monster::{Monster, MonsterAutomaton, MonsterConfig, MonsterFlags, MoveState};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("=== Monster Agent Example ===\n");

    let config = MonsterConfig::from_json(r#"{ "character_waiting_time": 1.0, "fixed_step": 0.1 }"#)?;

    let automaton = MonsterAutomaton::builder()
        .register::<MoveState>()
        .subscribe(|state| println!("  -> {state}"))
        .build()?;

    let log = TransitionLog::with_capacity(16);
    log.attach(&automaton);

    let mut monster = Monster::with_automaton(config, automaton)?;
    let controller = monster.controller().clone();
    controller.set_flag(MonsterFlags::CAN_MOVE, true);
    monster.spawn()?;

    // (seconds of frame time, can move, can attack)
    let script = [
        (0.3, true, false),
        (0.2, true, true),
        (0.4, true, false),
        (0.2, false, false),
        (1.5, false, false),
    ];

    for (elapsed, can_move, can_attack) in script {
        controller.set_flag(MonsterFlags::CAN_MOVE, can_move);
        controller.set_flag(MonsterFlags::CAN_START_ATTACK, can_attack);
        let ticks = monster.advance(elapsed)?;
        println!(
            "advanced {elapsed:.1}s ({ticks} ticks), flags: {:?}",
            controller.flags()
        );

        if monster.is_despawn_requested() {
            println!("\nMonster asked to be despawned");
            break;
        }
    }

    monster.despawn()?;

    println!("\nTransition log:");
    println!("{}", serde_json::to_string_pretty(&log)?);
    println!("\nFinal snapshot:");
    println!("{}", serde_json::to_string_pretty(&monster.automaton().snapshot())?);

    println!("\n=== Example Complete ===");
    Ok(())
}
