//! State shared by the dispatch stage, the workers and the session.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};

use super::buffer::FrameBuffer;
use crate::board::{Board, Outcome};
use crate::core::{Player, PlayerMap, SimConfig};
use crate::engine::DecisionEngine;

/// Everything guarded by the producer lock.
pub(crate) struct GameState {
    pub board: Board,
    pub turn: Player,
    pub engines: PlayerMap<Box<dyn DecisionEngine>>,
}

impl GameState {
    /// Empty board, X to move.
    pub fn reset(&mut self) {
        self.board.clear();
        self.turn = Player::X;
    }
}

/// One unit of worker-stage work: move for `player` with their engine.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WorkerTask {
    pub player: Player,
    pub tick: u64,
    pub dispatched_at: Instant,
}

/// Pending flags and the count of tasks not yet finished.
pub(crate) struct WorkTracker {
    pending: PlayerMap<AtomicBool>,
    outstanding: AtomicUsize,
    idle_lock: Mutex<()>,
    idle: Condvar,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self {
            pending: PlayerMap::new(|_| AtomicBool::new(false)),
            outstanding: AtomicUsize::new(0),
            idle_lock: Mutex::new(()),
            idle: Condvar::new(),
        }
    }

    /// Claim the pending slot for `player`; false if a task is already queued.
    pub fn try_begin(&self, player: Player) -> bool {
        if self.pending[player]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        true
    }

    /// The worker picked the task up; a new one may be queued for `player`.
    pub fn started(&self, player: Player) {
        self.pending[player].store(false, Ordering::Release);
    }

    /// The task is done (applied or discarded).
    pub fn finish(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _guard = self.idle_lock.lock();
            self.idle.notify_all();
        }
    }

    /// Undo [`WorkTracker::try_begin`] for a task that was never queued.
    pub fn abandon(&self, player: Player) {
        self.started(player);
        self.finish();
    }

    /// Tasks queued or running.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Block until every task has finished.
    pub fn wait_idle(&self) {
        let mut guard = self.idle_lock.lock();
        while self.outstanding.load(Ordering::Acquire) > 0 {
            self.idle.wait(&mut guard);
        }
    }

    /// Forget any pending claim.
    pub fn clear_pending(&self) {
        for (_, flag) in self.pending.iter() {
            flag.store(false, Ordering::Release);
        }
    }
}

/// Running totals kept by the worker stage.
#[derive(Default)]
pub(crate) struct Counters {
    pub ticks: AtomicU64,
    pub coalesced_ticks: AtomicU64,
    pub moves: AtomicU64,
    pub frames: AtomicU64,
    pub stale_tasks: AtomicU64,
    pub skipped_turns: AtomicU64,
    pub games: AtomicU64,
    pub x_wins: AtomicU64,
    pub o_wins: AtomicU64,
    pub draws: AtomicU64,
}

impl Counters {
    pub fn record_outcome(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Win(Player::X) => &self.x_wins,
            Outcome::Win(Player::O) => &self.o_wins,
            Outcome::Draw => &self.draws,
            Outcome::InProgress => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.games.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of a session's counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Timer ticks delivered to the dispatch stage.
    pub ticks: u64,
    /// Ticks dropped because one was already waiting or a task was pending.
    pub coalesced_ticks: u64,
    /// Moves applied to the board.
    pub moves: u64,
    /// Frames pushed into the buffer.
    pub frames: u64,
    /// Tasks discarded because the turn had already passed.
    pub stale_tasks: u64,
    /// Turns skipped because an engine returned no move.
    pub skipped_turns: u64,
    /// Games finished.
    pub games: u64,
    /// Games won by X.
    pub x_wins: u64,
    /// Games won by O.
    pub o_wins: u64,
    /// Drawn games.
    pub draws: u64,
    /// Bytes lost to buffer overflow.
    pub dropped_bytes: u64,
}

/// State reachable from every stage.
pub(crate) struct Shared {
    pub config: SimConfig,
    /// The producer lock.
    pub game: Mutex<GameState>,
    /// Mirror of `game.turn` for the dispatch stage, which must not block.
    turn: AtomicU8,
    /// Cleared on last close; workers discard tasks while unarmed.
    armed: AtomicBool,
    pub buffer: FrameBuffer,
    pub tracker: WorkTracker,
    pub counters: Counters,
}

impl Shared {
    pub fn new(config: SimConfig, engines: PlayerMap<Box<dyn DecisionEngine>>) -> Self {
        Self {
            game: Mutex::new(GameState {
                board: Board::new(config.game),
                turn: Player::X,
                engines,
            }),
            turn: AtomicU8::new(Player::X.index() as u8),
            armed: AtomicBool::new(false),
            buffer: FrameBuffer::new(config.pipeline.buffer_capacity),
            tracker: WorkTracker::new(),
            counters: Counters::default(),
            config,
        }
    }

    pub fn current_turn(&self) -> Player {
        Player::from_index(self.turn.load(Ordering::Acquire) as usize).unwrap_or(Player::X)
    }

    pub fn publish_turn(&self, player: Player) {
        self.turn.store(player.index() as u8, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    pub fn set_armed(&self, armed: bool) {
        self.armed.store(armed, Ordering::Release);
    }

    pub fn stats(&self) -> SessionStats {
        let c = &self.counters;
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        SessionStats {
            ticks: load(&c.ticks),
            coalesced_ticks: load(&c.coalesced_ticks),
            moves: load(&c.moves),
            frames: load(&c.frames),
            stale_tasks: load(&c.stale_tasks),
            skipped_turns: load(&c.skipped_turns),
            games: load(&c.games),
            x_wins: load(&c.x_wins),
            o_wins: load(&c.o_wins),
            draws: load(&c.draws),
            dropped_bytes: self.buffer.dropped_bytes(),
        }
    }
}
