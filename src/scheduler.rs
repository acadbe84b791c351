//! Timers that drive the engine
//!
//! - `SpawnScheduler`: sleeps for the current spawn interval, then ticks the
//!   engine if the session is running. The interval is re-read every cycle,
//!   so difficulty changes apply on the next spawn.
//! - `MoodTimer`: returns Happy/Cry to Idle after a short delay.
//!
//! Both run as tokio tasks on a runtime handle supplied by the caller and
//! are aborted before being re-armed, so there is never more than one loop
//! of each kind.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, sleep_until};

use crate::engine::GameEngine;
use crate::sim::{Mood, Viewport};

/// Cancellable spawn loop
pub struct SpawnScheduler {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl SpawnScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
        }
    }

    /// Cancel any previous loop and start ticking for `viewport`
    pub fn arm(&mut self, engine: Arc<GameEngine>, viewport: Viewport) {
        self.cancel();
        log::debug!(
            "Spawn loop armed for {:.0}x{:.0} viewport",
            viewport.width,
            viewport.height
        );
        self.task = Some(self.runtime.spawn(spawn_loop(engine, viewport)));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SpawnScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn spawn_loop(engine: Arc<GameEngine>, viewport: Viewport) {
    loop {
        sleep(engine.spawn_interval()).await;
        // spawn_tick checks `running` again under the state lock
        if engine.is_running() {
            engine.spawn_tick(&viewport);
        }
    }
}

/// Resets transient moods back to Idle
pub struct MoodTimer {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl MoodTimer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
        }
    }

    /// Start watching `engine`; replaces any previous watcher
    pub fn start(&mut self, engine: Arc<GameEngine>, delay: Duration) {
        self.stop();
        self.task = Some(self.runtime.spawn(mood_loop(engine, delay)));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for MoodTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn mood_loop(engine: Arc<GameEngine>, delay: Duration) {
    let mut rx = engine.subscribe();
    let mut current = rx.borrow_and_update().mood;
    let mut deadline = (current != Mood::Idle).then(|| Instant::now() + delay);

    loop {
        tokio::select! {
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                engine.acknowledge_mood_idle();
                current = Mood::Idle;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                // Only a change of mood restarts the countdown
                let mood = rx.borrow_and_update().mood;
                if mood != current {
                    current = mood;
                    deadline = (mood != Mood::Idle).then(|| Instant::now() + delay);
                }
            }
        }
    }
}
