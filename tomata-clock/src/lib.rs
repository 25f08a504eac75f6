//! Out-of-band tick source for the timer engine.
//!
//! The TUI event loop can stall while a redraw or a blocking prompt is in
//! flight, so the countdown is driven from a dedicated clock thread instead.
//! It speaks a one-way command channel (`Start` / `Stop`) and emits
//! fire-and-forget [`Tick`] events at roughly one-second cadence while armed.
//! Receivers must treat a tick as a prod to re-sample the wall clock, not as
//! a reliable one-second decrement: ticks may arrive late, get dropped, or
//! bunch up, and the engine is written to tolerate all three.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Default emission period while the clock is armed.
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Commands the owning side can send to the clock thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCommand {
    Start,
    Stop,
}

/// A single tick notification. Carries no payload; delivery is the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

#[derive(Error, Debug)]
pub enum ClockError {
    #[error("failed to spawn clock thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Handle to the clock thread. Dropping it shuts the thread down.
pub struct Clock {
    cmd_tx: Option<Sender<ClockCommand>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Clock {
    /// Spawn the clock thread with the default one-second period.
    ///
    /// A spawn failure is reported rather than panicking so the caller can
    /// degrade to running without background ticking.
    pub fn spawn(tick_tx: Sender<Tick>) -> Result<Self, ClockError> {
        Self::spawn_with_period(tick_tx, TICK_PERIOD)
    }

    /// Spawn with an explicit period. Short periods keep the tests fast.
    pub fn spawn_with_period(tick_tx: Sender<Tick>, period: Duration) -> Result<Self, ClockError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("tomata-clock".to_string())
            .spawn(move || run(cmd_rx, tick_tx, period))?;
        Ok(Self {
            cmd_tx: Some(cmd_tx),
            handle: Some(handle),
        })
    }

    /// Begin emitting ticks. Safe to call while already started: the cadence
    /// is re-armed from now, like clearing and re-setting an interval.
    pub fn start(&self) {
        self.send(ClockCommand::Start);
    }

    /// Stop emitting ticks. Idempotent; stopping an idle clock does nothing.
    pub fn stop(&self) {
        self.send(ClockCommand::Stop);
    }

    fn send(&self, cmd: ClockCommand) {
        if let Some(tx) = &self.cmd_tx {
            // The thread only exits once the command channel closes, so a
            // send error here means we are mid-drop; nothing to do.
            let _ = tx.send(cmd);
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        // Closing the command channel is the shutdown signal.
        self.cmd_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(cmd_rx: Receiver<ClockCommand>, tick_tx: Sender<Tick>, period: Duration) {
    let mut armed = false;
    loop {
        if armed {
            match cmd_rx.recv_timeout(period) {
                // Start while armed re-arms: the next full period starts now.
                Ok(ClockCommand::Start) => {}
                Ok(ClockCommand::Stop) => armed = false,
                Err(RecvTimeoutError::Timeout) => {
                    // Fire-and-forget; the receiver may be gone during teardown.
                    let _ = tick_tx.send(Tick);
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        } else {
            match cmd_rx.recv() {
                Ok(ClockCommand::Start) => armed = true,
                Ok(ClockCommand::Stop) => {}
                Err(_) => return,
            }
        }
    }
}
