//! Worker stage.
//!
//! A pool of blocking-capable threads pulls [`WorkerTask`]s. Each task runs
//! entirely under the producer lock: decide, apply, judge, render, push.
//! Readers are woken only after the lock is released.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use tracing::{debug, error, info, trace, warn};

use super::state::{GameState, Shared, WorkerTask};
use crate::board::{check_win, render, Outcome};
use crate::core::{Result, SimError};

/// Spawn worker `id`; it runs until the task channel disconnects.
pub(crate) fn spawn(
    id: usize,
    shared: Arc<Shared>,
    tasks: Receiver<WorkerTask>,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("irq-worker-{id}"))
        .spawn(move || {
            for task in tasks.iter() {
                run_task(&shared, task);
            }
            debug!(worker = id, "worker stopped");
        })
        .map_err(|e| SimError::ResourceExhaustion(format!("worker thread {id}: {e}")))
}

/// Execute one task and account for it.
pub(crate) fn run_task(shared: &Shared, task: WorkerTask) {
    shared.tracker.started(task.player);
    trace!(
        tick = task.tick,
        player = %task.player,
        queued_us = task.dispatched_at.elapsed().as_micros() as u64,
        "task started"
    );

    if shared.is_armed() {
        let mut game = shared.game.lock();
        if game.turn == task.player {
            play_turn(shared, &mut game);
            shared.publish_turn(game.turn);
        } else {
            shared.counters.stale_tasks.fetch_add(1, Ordering::Relaxed);
            debug!(tick = task.tick, player = %task.player, turn = %game.turn, "stale task discarded");
        }
    } else {
        debug!(tick = task.tick, "task discarded after close");
    }

    shared.buffer.wake_readers();
    shared.tracker.finish();
}

/// Move for whoever is to play and publish the resulting frame.
fn play_turn(shared: &Shared, game: &mut GameState) {
    let player = game.turn;

    let before = check_win(&game.board);
    if before.is_decided() {
        let err = SimError::InvalidState(format!("{player} asked to move on a finished board"));
        error!(%err, "resetting board");
        game.reset();
        return;
    }

    let Some(mv) = game.engines[player].decide(&game.board, player) else {
        shared.counters.skipped_turns.fetch_add(1, Ordering::Relaxed);
        warn!(%player, "engine returned no move on a live board, skipping turn");
        game.turn = player.opponent();
        return;
    };

    if let Err(err) = game.board.place(mv, player) {
        shared.counters.skipped_turns.fetch_add(1, Ordering::Relaxed);
        error!(%player, %err, "engine returned an illegal move, skipping turn");
        game.turn = player.opponent();
        return;
    }
    shared.counters.moves.fetch_add(1, Ordering::Relaxed);

    let outcome = check_win(&game.board);
    info!(
        %player,
        engine = game.engines[player].name(),
        cell = %mv.label(game.board.size()),
        "move applied"
    );

    push_frame(shared, game);

    match outcome {
        Outcome::InProgress => game.turn = player.opponent(),
        decided => {
            shared.counters.record_outcome(decided);
            match decided.winner() {
                Some(winner) => info!(%winner, "game over"),
                None => info!("game over: draw"),
            }
            game.reset();
        }
    }
}

fn push_frame(shared: &Shared, game: &GameState) {
    let frame = render(&game.board);
    let stored = shared.buffer.push(frame.as_bytes());
    shared.counters.frames.fetch_add(1, Ordering::Relaxed);

    if stored < frame.len() {
        warn!(
            dropped = frame.len() - stored,
            capacity = shared.buffer.capacity(),
            "frame buffer full, frame truncated"
        );
    }
}
