//! Per-participant signal timeline.
//!
//! Edges are kept in arrival order and measured in local frame-clock time.
//! Press/release pairs are reconstructed into active intervals for drawing
//! and tone gating.

use std::collections::VecDeque;

/// One received (or locally produced) key transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEdge {
    /// `true` = press, `false` = release
    pub state: bool,
    /// Epoch milliseconds stamped by the relay (or the local wall clock for own edges)
    pub timestamp: i64,
    /// Local frame-clock time at which the edge arrived
    pub local_arrival_ms: f64,
}

/// A reconstructed span during which the key was held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveInterval {
    pub start_ms: f64,
    pub end_ms: f64,
    /// The key is still held; `end_ms` is the query time.
    pub open: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SignalTimeline {
    edges: VecDeque<SignalEdge>,
    current_state: bool,
}

impl SignalTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge, take its state as current, then evict edges older than the window.
    pub fn append(&mut self, edge: SignalEdge, now_ms: f64, window_ms: f64) {
        self.current_state = edge.state;
        self.edges.push_back(edge);
        self.prune(now_ms, window_ms);
    }

    /// Evict every edge with `local_arrival_ms <= now_ms - window_ms`.
    pub fn prune(&mut self, now_ms: f64, window_ms: f64) {
        let cutoff = now_ms - window_ms;
        while self
            .edges
            .front()
            .is_some_and(|edge| edge.local_arrival_ms <= cutoff)
        {
            self.edges.pop_front();
        }
    }

    /// Reconstruct held spans.
    ///
    /// Every adjacent `(press, release)` pair yields one closed interval. A
    /// trailing press yields one open interval ending at `now_ms`. Any other
    /// adjacency (press/press, release/release, release/press) yields nothing.
    pub fn active_intervals(&self, now_ms: f64) -> Vec<ActiveInterval> {
        let mut intervals: Vec<ActiveInterval> = self
            .edges
            .iter()
            .zip(self.edges.iter().skip(1))
            .filter(|(press, release)| press.state && !release.state)
            .map(|(press, release)| ActiveInterval {
                start_ms: press.local_arrival_ms,
                end_ms: release.local_arrival_ms,
                open: false,
            })
            .collect();

        if let Some(last) = self.edges.back().filter(|edge| edge.state) {
            intervals.push(ActiveInterval {
                start_ms: last.local_arrival_ms,
                end_ms: now_ms,
                open: true,
            });
        }

        intervals
    }

    /// State carried by the most recently appended edge (`false` when none).
    pub fn current_state(&self) -> bool {
        self.current_state
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
