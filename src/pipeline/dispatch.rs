//! Deferred-dispatch stage.
//!
//! Runs on its own thread, one message at a time, and never blocks: it
//! reads whose turn it is from an atomic, claims that player's pending
//! slot and queues a [`WorkerTask`] on an unbounded channel. Ticks for a
//! player whose task is still queued are dropped.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, trace};

use super::state::{Shared, WorkerTask};
use super::timer::Tick;
use crate::core::{Result, SimError};

/// Messages accepted by the dispatch stage.
#[derive(Debug)]
pub(crate) enum DispatchMsg {
    /// The timer fired.
    Tick(Tick),
    /// Acknowledge once every earlier message has been handled.
    Flush(Sender<()>),
}

/// Spawn the dispatch thread.
///
/// It exits once every sender of `inbox` is dropped, dropping `tasks` in
/// turn so the workers drain and stop.
pub(crate) fn spawn(
    shared: Arc<Shared>,
    inbox: Receiver<DispatchMsg>,
    tasks: Sender<WorkerTask>,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("irq-dispatch".into())
        .spawn(move || {
            for msg in inbox.iter() {
                match msg {
                    DispatchMsg::Tick(tick) => dispatch(&shared, &tasks, tick),
                    DispatchMsg::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
            debug!("dispatch stage stopped");
        })
        .map_err(|e| SimError::ResourceExhaustion(format!("dispatch thread: {e}")))
}

/// Queue work for whoever is to move.
fn dispatch(shared: &Shared, tasks: &Sender<WorkerTask>, tick: Tick) {
    let start = Instant::now();
    shared.counters.ticks.fetch_add(1, Ordering::Relaxed);

    if !shared.is_armed() {
        trace!(seq = tick.seq, "tick after close ignored");
        return;
    }

    let player = shared.current_turn();
    if !shared.tracker.try_begin(player) {
        shared.counters.coalesced_ticks.fetch_add(1, Ordering::Relaxed);
        trace!(seq = tick.seq, %player, "task already pending");
        return;
    }

    let task = WorkerTask {
        player,
        tick: tick.seq,
        dispatched_at: start,
    };
    if tasks.send(task).is_err() {
        // workers are gone; only happens during teardown
        shared.tracker.abandon(player);
        return;
    }

    trace!(
        seq = tick.seq,
        %player,
        latency_us = start.duration_since(tick.fired_at).as_micros() as u64,
        elapsed_us = start.elapsed().as_micros() as u64,
        "task dispatched"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, Player, PlayerMap, SimConfig};
    use crate::engine::{DecisionEngine, RandomEngine};
    use crossbeam_channel::{bounded, unbounded};

    fn shared() -> Arc<Shared> {
        let engines: PlayerMap<Box<dyn DecisionEngine>> =
            PlayerMap::new(|p| Box::new(RandomEngine::new(GameRng::new(p.index() as u64))) as _);
        Arc::new(Shared::new(SimConfig::default(), engines))
    }

    fn tick(seq: u64) -> DispatchMsg {
        DispatchMsg::Tick(Tick {
            seq,
            fired_at: Instant::now(),
        })
    }

    #[test]
    fn test_dispatch_queues_current_player_once() {
        let shared = shared();
        shared.set_armed(true);
        let (inbox_tx, inbox_rx) = unbounded();
        let (task_tx, task_rx) = unbounded();
        let handle = spawn(Arc::clone(&shared), inbox_rx, task_tx).unwrap();

        inbox_tx.send(tick(1)).unwrap();
        inbox_tx.send(tick(2)).unwrap();
        let (ack_tx, ack_rx) = bounded(1);
        inbox_tx.send(DispatchMsg::Flush(ack_tx)).unwrap();
        ack_rx.recv().unwrap();

        let queued: Vec<_> = task_rx.try_iter().collect();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].player, Player::X);
        assert_eq!(queued[0].tick, 1);
        assert_eq!(shared.tracker.outstanding(), 1);

        drop(inbox_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_unarmed_ticks_are_ignored() {
        let shared = shared();
        let (inbox_tx, inbox_rx) = unbounded();
        let (task_tx, task_rx) = unbounded();
        let handle = spawn(Arc::clone(&shared), inbox_rx, task_tx).unwrap();

        inbox_tx.send(tick(1)).unwrap();
        drop(inbox_tx);
        handle.join().unwrap();

        assert!(task_rx.try_recv().is_err());
        assert_eq!(shared.tracker.outstanding(), 0);
    }

    #[test]
    fn test_follows_published_turn() {
        let shared = shared();
        shared.set_armed(true);
        shared.publish_turn(Player::O);
        let (inbox_tx, inbox_rx) = unbounded();
        let (task_tx, task_rx) = unbounded();
        let handle = spawn(Arc::clone(&shared), inbox_rx, task_tx).unwrap();

        inbox_tx.send(tick(7)).unwrap();
        drop(inbox_tx);
        handle.join().unwrap();

        assert_eq!(task_rx.recv().unwrap().player, Player::O);
    }
}
