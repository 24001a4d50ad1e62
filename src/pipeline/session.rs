//! Session controller.
//!
//! A [`Session`] owns the board, the frame buffer and the three stages.
//! Its lifecycle is `create → open → read… → close → drop`:
//!
//! - `create` spawns the dispatch thread and the worker pool
//! - the first `open` resets the game and arms the timer
//! - the last `close` disarms the timer synchronously and drains every
//!   queued or running worker task
//! - dropping the session stops and joins every thread
//!
//! ```no_run
//! use irq_tictactoe::core::SimConfig;
//! use irq_tictactoe::pipeline::Session;
//!
//! let session = Session::create(SimConfig::default()).unwrap();
//! let handle = session.open().unwrap();
//!
//! let mut frame = vec![0u8; 81];
//! let status = handle.read(&mut frame, false).unwrap();
//! print!("{}", String::from_utf8_lossy(&frame[..status.bytes()]));
//! ```

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::buffer::ReadStatus;
use super::dispatch::{self, DispatchMsg};
use super::state::{SessionStats, Shared, WorkerTask};
use super::timer::TimerStage;
use super::worker;
use crate::board::Board;
use crate::core::{GameRng, Player, PlayerMap, Result, SimConfig, SimError};
use crate::engine::DecisionEngine;

/// Thread handles and arm state, guarded by the control lock.
struct Control {
    open_count: usize,
    timer: Option<TimerStage>,
    inbox: Option<Sender<DispatchMsg>>,
    dispatch: Option<JoinHandle<()>>,
    workers: Vec<JoinHandle<()>>,
}

/// A simulated device streaming game frames.
pub struct Session {
    shared: Arc<Shared>,
    control: Mutex<Control>,
}

impl Session {
    /// Validate `config`, build the configured engines and start the
    /// dispatch and worker threads. The timer stays disarmed until `open`.
    pub fn create(config: SimConfig) -> Result<Arc<Self>> {
        config.validate()?;
        let mut rng = GameRng::new(config.mcts.seed);
        let engines = PlayerMap::new(|player| {
            config.engines.get(player).build(&config.mcts, rng.fork())
        });
        Self::create_with_engines(config, engines)
    }

    /// Like [`Session::create`] with explicit engines for X and O.
    pub fn create_with_engines(
        config: SimConfig,
        engines: PlayerMap<Box<dyn DecisionEngine>>,
    ) -> Result<Arc<Self>> {
        config.validate()?;
        let workers = config.pipeline.workers;
        let shared = Arc::new(Shared::new(config, engines));

        let (inbox_tx, inbox_rx) = bounded::<DispatchMsg>(1);
        let (task_tx, task_rx) = unbounded();

        let mut control = Control {
            open_count: 0,
            timer: None,
            inbox: Some(inbox_tx),
            dispatch: None,
            workers: Vec::with_capacity(workers),
        };

        let started = start_threads(&shared, &mut control, workers, inbox_rx, task_tx, task_rx);
        if let Err(err) = started {
            warn!(%err, "session setup failed, releasing threads");
            shutdown(&shared, &mut control);
            return Err(err);
        }

        debug!(workers, "session created");
        Ok(Arc::new(Self {
            shared,
            control: Mutex::new(control),
        }))
    }

    /// Begin a session; the first open arms the pipeline.
    pub fn open(self: &Arc<Self>) -> Result<SessionHandle> {
        self.open_raw()?;
        Ok(SessionHandle {
            session: Arc::clone(self),
            closed: false,
        })
    }

    /// Reference-counted open without a guard; pair with [`Session::close`].
    pub fn open_raw(&self) -> Result<()> {
        let mut control = self.control.lock();
        control.open_count += 1;
        if control.open_count > 1 {
            debug!(open_count = control.open_count, "session reopened");
            return Ok(());
        }

        self.reset_game();
        self.shared.set_armed(true);

        let timer = match &control.inbox {
            Some(inbox) => TimerStage::arm(
                self.shared.config.pipeline.tick_period(),
                inbox.clone(),
                Arc::clone(&self.shared),
            ),
            None => Err(SimError::InvalidState("session already destroyed".into())),
        };

        match timer {
            Ok(timer) => {
                control.timer = Some(timer);
                info!(
                    board_size = self.shared.config.game.board_size,
                    goal = self.shared.config.game.goal,
                    "session opened"
                );
                Ok(())
            }
            Err(err) => {
                control.open_count -= 1;
                self.shared.set_armed(false);
                Err(err)
            }
        }
    }

    /// End a session; the last close tears the pipeline down.
    pub fn close(&self) {
        let mut control = self.control.lock();
        match control.open_count {
            0 => {
                warn!("close without matching open");
                return;
            }
            1 => {}
            _ => {
                control.open_count -= 1;
                return;
            }
        }
        control.open_count = 0;
        quiesce(&self.shared, &mut control);
        info!(stats = ?self.shared.stats(), "session closed");
    }

    /// Copy up to `out.len()` buffered bytes.
    ///
    /// Blocks while the buffer is empty unless `non_blocking` is set, in
    /// which case [`ReadStatus::WouldBlock`] is returned.
    pub fn read(&self, out: &mut [u8], non_blocking: bool) -> Result<ReadStatus> {
        self.shared.buffer.read(out, non_blocking)
    }

    /// Blocking read that gives up after `timeout`.
    pub fn read_timeout(&self, out: &mut [u8], timeout: Duration) -> Result<ReadStatus> {
        self.shared.buffer.read_timeout(out, timeout)
    }

    /// Wake every blocked reader with [`SimError::Interrupted`].
    pub fn interrupt_readers(&self) {
        self.shared.buffer.interrupt();
    }

    /// Number of open references.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.control.lock().open_count
    }

    /// Whether the timer is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.shared.is_armed()
    }

    /// Counters since creation.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.shared.stats()
    }

    /// Copy of the current board.
    #[must_use]
    pub fn board(&self) -> Board {
        self.shared.game.lock().board.clone()
    }

    /// Player to move next.
    #[must_use]
    pub fn turn(&self) -> Player {
        self.shared.game.lock().turn
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.shared.config
    }

    /// Bytes in one frame for this session's board.
    #[must_use]
    pub fn frame_len(&self) -> usize {
        crate::board::frame_len(self.shared.config.game.board_size)
    }

    /// Empty board, X to move, nothing buffered.
    fn reset_game(&self) {
        let mut game = self.shared.game.lock();
        game.reset();
        self.shared.publish_turn(game.turn);
        self.shared.buffer.clear();
        debug!("game reset");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let control = self.control.get_mut();
        if control.open_count > 0 {
            warn!(open_count = control.open_count, "session dropped while open");
            control.open_count = 0;
        }
        shutdown(&self.shared, control);
        debug!("session destroyed");
    }
}

/// Spawn the worker pool, then the dispatch stage.
///
/// Handles of threads that did start are left in `control` for the caller
/// to join.
fn start_threads(
    shared: &Arc<Shared>,
    control: &mut Control,
    workers: usize,
    inbox: Receiver<DispatchMsg>,
    tasks_tx: Sender<WorkerTask>,
    tasks_rx: Receiver<WorkerTask>,
) -> Result<()> {
    for id in 0..workers {
        let handle = worker::spawn(id, Arc::clone(shared), tasks_rx.clone())?;
        control.workers.push(handle);
    }
    control.dispatch = Some(dispatch::spawn(Arc::clone(shared), inbox, tasks_tx)?);
    Ok(())
}

/// Disarm the timer, flush the dispatch stage and wait for the workers.
fn quiesce(shared: &Shared, control: &mut Control) {
    shared.set_armed(false);

    if let Some(mut timer) = control.timer.take() {
        timer.disarm();
    }

    if let Some(inbox) = &control.inbox {
        let (ack_tx, ack_rx) = bounded(1);
        if inbox.send(DispatchMsg::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }

    shared.tracker.wait_idle();
    shared.tracker.clear_pending();
}

/// Stop every stage and join its thread.
fn shutdown(shared: &Shared, control: &mut Control) {
    quiesce(shared, control);

    // closing the inbox stops dispatch, which closes the task channel
    control.inbox.take();
    if let Some(handle) = control.dispatch.take() {
        let _ = handle.join();
    }
    for handle in control.workers.drain(..) {
        let _ = handle.join();
    }
}

/// An open reference to a [`Session`]; closes it when dropped.
pub struct SessionHandle {
    session: Arc<Session>,
    closed: bool,
}

impl SessionHandle {
    /// See [`Session::read`].
    pub fn read(&self, out: &mut [u8], non_blocking: bool) -> Result<ReadStatus> {
        self.session.read(out, non_blocking)
    }

    /// See [`Session::read_timeout`].
    pub fn read_timeout(&self, out: &mut [u8], timeout: Duration) -> Result<ReadStatus> {
        self.session.read_timeout(out, timeout)
    }

    /// Read exactly one frame, blocking as needed.
    ///
    /// Reads [`frame_len`](crate::board::frame_len) bytes. After a push was
    /// truncated the boundaries drift; watch
    /// [`SessionStats::dropped_bytes`](super::SessionStats) to notice.
    pub fn read_frame(&self) -> Result<Vec<u8>> {
        let mut frame = vec![0u8; self.session.frame_len()];
        let mut filled = 0;
        while filled < frame.len() {
            filled += self.session.read(&mut frame[filled..], false)?.bytes();
        }
        Ok(frame)
    }

    /// The session this handle keeps open.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Close now instead of on drop.
    pub fn close(mut self) {
        self.closed = true;
        self.session.close();
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if !self.closed {
            self.session.close();
        }
    }
}
