//! Periodic timer stage.
//!
//! A dedicated thread fires every period and hands a [`Tick`] to the
//! dispatch stage with a non-blocking `try_send`. When the previous tick
//! has not been consumed yet the new one is coalesced into it, exactly as
//! re-scheduling an already scheduled tasklet is a no-op.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, select, Sender, TrySendError};
use tracing::{debug, trace};

use super::dispatch::DispatchMsg;
use super::state::Shared;
use crate::core::{Result, SimError};

/// One timer expiry.
#[derive(Clone, Copy, Debug)]
pub struct Tick {
    /// Sequence number since the timer was armed.
    pub seq: u64,
    /// When the timer fired.
    pub fired_at: Instant,
}

/// Handle to an armed timer thread.
pub(crate) struct TimerStage {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TimerStage {
    /// Start firing every `period` into `ticks`.
    pub fn arm(period: Duration, ticks: Sender<DispatchMsg>, shared: Arc<Shared>) -> Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("irq-timer".into())
            .spawn(move || {
                let mut seq = 0u64;
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        default(period) => {
                            let start = Instant::now();
                            seq += 1;
                            if !fire(&ticks, &shared, Tick { seq, fired_at: start }) {
                                break;
                            }
                            trace!(seq, elapsed_us = start.elapsed().as_micros() as u64, "timer tick");
                        }
                    }
                }
                debug!(ticks = seq, "timer stage stopped");
            })
            .map_err(|e| SimError::ResourceExhaustion(format!("timer thread: {e}")))?;

        debug!(period_ms = period.as_millis() as u64, "timer armed");
        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop the timer and wait for an in-flight tick to finish.
    pub fn disarm(&mut self) {
        // dropping the sender wakes the select
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("timer disarmed");
        }
    }
}

impl Drop for TimerStage {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Hand the tick over without blocking; false once dispatch is gone.
fn fire(ticks: &Sender<DispatchMsg>, shared: &Shared, tick: Tick) -> bool {
    match ticks.try_send(DispatchMsg::Tick(tick)) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            shared.counters.coalesced_ticks.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            trace!(seq = tick.seq, "tick coalesced");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}
