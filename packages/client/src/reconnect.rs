//! Reconnection timer and session generations.
//!
//! Every session is spawned with a generation number. Events carrying any
//! other generation come from a replaced session and are dropped. At most one
//! reconnection is pending at a time, always after the same fixed delay.

use std::{future::pending, pin::Pin, time::Duration};

use tokio::time::Sleep;

pub const RECONNECT_DELAY: Duration = Duration::from_millis(3_000);

pub struct Reconnector {
    delay: Duration,
    generation: u64,
    timer: Option<Pin<Box<Sleep>>>,
}

impl Reconnector {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            timer: None,
        }
    }

    /// Generation of the session that is currently allowed to report events
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Schedule a reconnection, replacing any pending one
    pub fn arm(&mut self) {
        self.timer = Some(Box::pin(tokio::time::sleep(self.delay)));
    }

    pub fn cancel(&mut self) {
        self.timer = None;
    }

    /// Wait for the pending reconnection and return the generation of the
    /// session to spawn.
    ///
    /// Never resolves while disarmed. Dropping the future before it resolves
    /// leaves the timer untouched.
    pub async fn wait(&mut self) -> u64 {
        match self.timer.as_mut() {
            Some(sleep) => sleep.as_mut().await,
            None => pending().await,
        }
        self.timer = None;
        self.generation += 1;
        self.generation
    }
}

impl Default for Reconnector {
    fn default() -> Self {
        Self::new(RECONNECT_DELAY)
    }
}
