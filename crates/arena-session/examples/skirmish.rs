//! A four-faction skirmish session driven by the tokio tick runner.
//!
//! Run with `RUST_LOG=info cargo run --example skirmish` and press ctrl-c to
//! stop. The session opens immediately, starts once the lobby clock reaches
//! 400 ticks, finishes at 1000 lobby (or 800 game) ticks and closes at 2000.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arena_core::{EngineConfig, Position, SessionId, ZoneShape};
use arena_session::testing::{ScriptedLobby, TestWorld};
use arena_session::{runner, SessionRegistry};

fn build_skirmish(center: Position) -> ScriptedLobby {
    // Four rally points around the center, each routed ten blocks up.
    let mut session = ScriptedLobby::new("skirmish", center, 20.0, ZoneShape::ColumnBox)
        .with_cadence(10)
        .starts_at(400)
        .finishes_at(1000, 800)
        .closes_at(2000);
    for (dx, dz) in [(5.0, 0.0), (-5.0, 0.0), (0.0, 5.0), (0.0, -5.0)] {
        session = session.anchor(center.offset(dx, 0.0, dz), center.offset(dx, 10.0, dz));
    }
    session
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut world = TestWorld::new();
    let center = Position::new(world.world(), 0.0, 100.0, 0.0);
    let fighters: Vec<_> = (0..4)
        .map(|i| world.spawn(center.offset(i as f64, 0.0, 0.0)))
        .collect();

    let id = SessionId::from("skirmish");
    let mut registry = SessionRegistry::new(world, EngineConfig::default());
    registry.register(Box::new(build_skirmish(center)))?;
    registry.try_open(&id)?;
    for fighter in fighters {
        registry.try_join(fighter, &id)?;
    }
    info!("session open with {} fighters", 4);

    let (stop, shutdown) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = stop.send(());
    });

    // 50ms per base tick; cadence 10 means one session tick every 500ms.
    let local = tokio::task::LocalSet::new();
    let registry = local
        .run_until(async move {
            let driver = tokio::task::spawn_local(runner::run(
                registry,
                Duration::from_millis(50),
                shutdown,
            ));
            driver.await
        })
        .await?;

    let snapshot = registry.info(&id)?;
    info!(
        "final state: phase={}, lobby={}, game={}, members={}",
        snapshot.phase,
        snapshot.lobby_elapsed,
        snapshot.game_elapsed,
        snapshot.members.len()
    );
    Ok(())
}
