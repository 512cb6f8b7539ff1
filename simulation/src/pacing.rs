//! Real-time pacing
//!
//! The walk itself never sleeps. [`PacingObserver`] sits on the event
//! stream and blocks for each traversed link's delay, so a watcher sees
//! the message move at simulated speed.

use std::thread;
use std::time::Duration;

use hopnet_core::{TraversalEvent, TraversalObserver};

/// Sleeps for the delay of every forward and backtrack traversal
#[derive(Debug, Clone)]
pub struct PacingObserver {
    /// Playback speedup; 1 is real time, 0 never sleeps
    speedup: u32,
    slept: Duration,
}

impl PacingObserver {
    pub fn new() -> Self {
        Self::with_speedup(1)
    }

    pub fn with_speedup(speedup: u32) -> Self {
        Self {
            speedup,
            slept: Duration::ZERO,
        }
    }

    /// Total time spent sleeping so far
    pub fn slept(&self) -> Duration {
        self.slept
    }

    fn pause_for(&self, delay_ms: u64) -> Duration {
        if self.speedup == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(delay_ms) / self.speedup
    }
}

impl Default for PacingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TraversalObserver for PacingObserver {
    fn observe(&mut self, event: &TraversalEvent) {
        if let Some((_, delay)) = event.link() {
            let pause = self.pause_for(delay);
            if !pause.is_zero() {
                thread::sleep(pause);
                self.slept += pause;
            }
        }
    }
}
