//! Background tick driver.
//!
//! A [`TickDriver`] owns a thread that calls [`Board::tick`] at a fixed
//! wall-clock interval. Ticks only advance a running board, so the session is
//! controlled with `start`/`pause`/`stop` through the shared lock.
//!
//! # Example
//!
//! ```
//! use logicboard::driver::{shared, TickDriver};
//! use logicboard::{Board, ComponentSpec};
//! use std::time::Duration;
//!
//! let board = shared(Board::new(1));
//! board.lock().add_component(ComponentSpec::clock(5)).unwrap();
//!
//! let driver = TickDriver::spawn(board.clone(), Duration::from_millis(1)).unwrap();
//! board.lock().start();
//! std::thread::sleep(Duration::from_millis(20));
//! driver.shutdown();
//!
//! assert!(board.lock().current_time() > 0);
//! ```

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

use crate::board::Board;

/// A board shared between a driver and its controllers.
pub type SharedBoard = Arc<Mutex<Board>>;

/// Wraps a board for sharing with a [`TickDriver`].
pub fn shared(board: Board) -> SharedBoard {
    Arc::new(Mutex::new(board))
}

/// Periodically ticks a shared board on a background thread.
#[derive(Debug)]
pub struct TickDriver {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl TickDriver {
    /// Spawns the driver thread.
    pub fn spawn(board: SharedBoard, interval: Duration) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("logicboard-tick".to_string())
            .spawn(move || {
                debug!(?interval, "tick driver started");
                while flag.load(Ordering::Acquire) {
                    thread::sleep(interval);
                    if let Err(err) = board.lock().tick() {
                        error!(%err, "tick failed, stopping driver");
                        break;
                    }
                }
                debug!("tick driver stopped");
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
            interval,
        })
    }

    /// The wall-clock interval between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true while the thread has not been asked to stop.
    pub fn is_active(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops the thread and waits for it to exit.
    pub fn shutdown(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("tick driver thread panicked");
            }
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.halt();
    }
}
