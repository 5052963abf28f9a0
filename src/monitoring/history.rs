//! Per-facility telemetry window and baseline store

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{trace, warn};

use crate::types::PerformanceMetrics;

/// Arrival-ordered sample window for one facility. Oldest sample is evicted
/// once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct FacilityHistory {
    samples: VecDeque<PerformanceMetrics>,
    capacity: usize,
}

impl FacilityHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning the evicted one if the window was full.
    pub fn push(&mut self, sample: PerformanceMetrics) -> Option<PerformanceMetrics> {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&PerformanceMetrics> {
        self.samples.back()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &PerformanceMetrics> {
        self.samples.iter()
    }
}

/// Shared history + baseline store for all facilities.
///
/// Writes to one facility's window are serialized by that facility's own
/// mutex; the outer map lock is only held to find or create the window, so
/// different facilities record concurrently. Baselines are replaced whole.
#[derive(Debug)]
pub struct TelemetryHistory {
    capacity: usize,
    baselines: RwLock<HashMap<String, PerformanceMetrics>>,
    windows: RwLock<HashMap<String, Arc<Mutex<FacilityHistory>>>>,
}

impl TelemetryHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            baselines: RwLock::new(HashMap::new()),
            windows: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replace the reference sample for `facility_id`.
    pub fn set_baseline(&self, facility_id: &str, metrics: PerformanceMetrics) {
        write_lock(&self.baselines, "baselines").insert(facility_id.to_string(), metrics);
    }

    /// `None` means the facility is not monitored yet.
    pub fn baseline(&self, facility_id: &str) -> Option<PerformanceMetrics> {
        read_lock(&self.baselines, "baselines").get(facility_id).cloned()
    }

    /// Append a sample to its facility's window, evicting the oldest past capacity.
    pub fn record(&self, sample: PerformanceMetrics) {
        let window = self.window(&sample.facility_id);
        let facility_id = sample.facility_id.clone();
        let mut history = lock(&window, &facility_id);
        if history.push(sample).is_some() {
            trace!(facility = %facility_id, len = history.len(), "History window full, evicted oldest sample");
        }
    }

    /// Number of samples held for `facility_id`.
    pub fn len(&self, facility_id: &str) -> usize {
        self.existing_window(facility_id)
            .map_or(0, |w| lock(&w, facility_id).len())
    }

    /// Copy of the window, oldest first.
    pub fn snapshot(&self, facility_id: &str) -> Vec<PerformanceMetrics> {
        self.existing_window(facility_id)
            .map(|w| lock(&w, facility_id).iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Facilities with at least one recorded sample.
    pub fn facility_count(&self) -> usize {
        read_lock(&self.windows, "windows").len()
    }

    fn existing_window(&self, facility_id: &str) -> Option<Arc<Mutex<FacilityHistory>>> {
        read_lock(&self.windows, "windows").get(facility_id).cloned()
    }

    fn window(&self, facility_id: &str) -> Arc<Mutex<FacilityHistory>> {
        if let Some(window) = self.existing_window(facility_id) {
            return window;
        }
        let capacity = self.capacity;
        write_lock(&self.windows, "windows")
            .entry(facility_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(FacilityHistory::new(capacity))))
            .clone()
    }
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self::new(crate::config::defaults::HISTORY_CAPACITY)
    }
}

fn read_lock<'a, T>(lock: &'a RwLock<T>, name: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|e| {
        warn!(lock = name, "RwLock poisoned on read, recovering");
        e.into_inner()
    })
}

fn write_lock<'a, T>(lock: &'a RwLock<T>, name: &str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|e| {
        warn!(lock = name, "RwLock poisoned on write, recovering");
        e.into_inner()
    })
}

fn lock<'a>(window: &'a Mutex<FacilityHistory>, facility_id: &str) -> MutexGuard<'a, FacilityHistory> {
    window.lock().unwrap_or_else(|e| {
        warn!(facility = facility_id, "History mutex poisoned, recovering");
        e.into_inner()
    })
}
