/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Repeating timers for auto-stepped runs.

use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Handle of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Source of repeating ticks
pub trait TimerService {
    /// Schedule a timer that fires every `delay` until cancelled
    fn schedule_repeating(&mut self, delay: Duration) -> TimerId;

    /// Stop a timer. Cancelling an unknown or already cancelled id does nothing.
    fn cancel(&mut self, id: TimerId);
}

/// Timers that never fire on their own. The owner decides when a tick happens,
/// which makes auto mode deterministic.
#[derive(Debug, Default)]
pub struct ManualTimers {
    next_id: u64,
    live: Vec<(TimerId, Duration)>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers scheduled and not yet cancelled
    pub fn live(&self) -> Vec<TimerId> {
        self.live.iter().map(|(id, _)| *id).collect()
    }

    pub fn delay_of(&self, id: TimerId) -> Option<Duration> {
        self.live.iter().find(|(live, _)| *live == id).map(|(_, delay)| *delay)
    }
}

impl TimerService for ManualTimers {
    fn schedule_repeating(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.push((id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.live.retain(|(live, _)| *live != id);
    }
}

/// Message sent by a ticker thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub id: TimerId,
}

/// Timers backed by one ticker thread each. Ticks arrive on [`ThreadTimers::ticks`].
pub struct ThreadTimers {
    next_id: u64,
    tick_tx: Sender<TimerTick>,
    tick_rx: Receiver<TimerTick>,
    live: HashMap<TimerId, Arc<AtomicBool>>,
}

impl ThreadTimers {
    pub fn new() -> Self {
        let (tick_tx, tick_rx) = crossbeam_channel::unbounded();
        Self {
            next_id: 0,
            tick_tx,
            tick_rx,
            live: HashMap::new(),
        }
    }

    /// Receiver for ticks of every timer this service scheduled
    pub fn ticks(&self) -> &Receiver<TimerTick> {
        &self.tick_rx
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for ThreadTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerService for ThreadTimers {
    fn schedule_repeating(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let tick_tx = self.tick_tx.clone();
        thread::spawn(move || run_ticker(id, delay, flag, tick_tx));

        debug!("Scheduled timer {id:?} every {delay:?}");
        self.live.insert(id, cancelled);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(cancelled) = self.live.remove(&id) {
            cancelled.store(true, Ordering::Release);
            debug!("Cancelled timer {id:?}");
        }
    }
}

impl Drop for ThreadTimers {
    fn drop(&mut self) {
        for cancelled in self.live.values() {
            cancelled.store(true, Ordering::Release);
        }
    }
}

/// Ticker loop: sleep, then tick, until cancelled or nobody listens
fn run_ticker(id: TimerId, delay: Duration, cancelled: Arc<AtomicBool>, tick_tx: Sender<TimerTick>) {
    loop {
        thread::sleep(delay);
        if cancelled.load(Ordering::Acquire) {
            return;
        }
        if tick_tx.send(TimerTick { id }).is_err() {
            return;
        }
    }
}
