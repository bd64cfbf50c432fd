//! Tokio-driven tick runner.
//!
//! Bridges wall-clock time to the registry's base-tick counter: one interval
//! firing advances the manual scheduler by one base tick. The future is not
//! `Send` (sessions are plain trait objects), so drive it on a
//! current-thread runtime or a `LocalSet`, matching the single-threaded
//! discipline the engine requires.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::host::Host;
use crate::registry::SessionRegistry;
use crate::scheduler::ManualScheduler;

/// Drive `registry` with one base tick every `tick` until `shutdown`
/// resolves, then hand the registry back.
pub async fn run<H: Host>(
    mut registry: SessionRegistry<H, ManualScheduler>,
    tick: Duration,
    mut shutdown: oneshot::Receiver<()>,
) -> SessionRegistry<H, ManualScheduler> {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick completes immediately; swallow it so the first
    // base tick lands one full period after start.
    interval.tick().await;

    info!("tick runner started: period={:?}", tick);
    loop {
        tokio::select! {
            _ = interval.tick() => registry.advance(1),
            _ = &mut shutdown => {
                info!("tick runner stopped at base tick {}", registry.scheduler().now());
                break;
            }
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{EngineConfig, Position, SessionId, ZoneShape};

    use crate::testing::{ScriptedLobby, TestWorld};

    #[tokio::test(start_paused = true)]
    async fn test_runner_ticks_until_shutdown() {
        let world = TestWorld::new();
        let center = Position::new(world.world(), 0.0, 100.0, 0.0);
        let session = ScriptedLobby::new("duel", center, 20.0, ZoneShape::ColumnBox)
            .anchor(center.offset(5.0, 0.0, 0.0), center.offset(5.0, 10.0, 0.0))
            .with_cadence(2);

        let mut registry = SessionRegistry::new(world, EngineConfig::default());
        registry.register(Box::new(session)).unwrap();
        registry.try_open(&SessionId::from("duel")).unwrap();

        let (stop, shutdown) = oneshot::channel();
        let local = tokio::task::LocalSet::new();
        let registry = local
            .run_until(async move {
                let driver =
                    tokio::task::spawn_local(run(registry, Duration::from_millis(50), shutdown));
                // Paused clock: sleeping auto-advances time, firing the
                // interval 10 times (10 base ticks = 5 session ticks).
                tokio::time::sleep(Duration::from_millis(501)).await;
                stop.send(()).unwrap();
                driver.await.unwrap()
            })
            .await;

        assert_eq!(registry.scheduler().now(), 10);
        let snapshot = registry.info(&SessionId::from("duel")).unwrap();
        assert_eq!(snapshot.lobby_elapsed, 10); // 5 session ticks x cadence 2
    }
}
