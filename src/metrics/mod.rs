//! Metrics collection module
//!
//! Tracks request counts, error rates and response times per
//! `collection/operation`. Metrics never influence results.

use crate::collections::Collection;
use crate::query::Operation;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Response times kept per key
const RESPONSE_TIME_WINDOW: usize = 100;

/// Process-wide metrics collector
pub struct Metrics {
    /// Total operation count
    pub total_requests: AtomicU64,
    requests: RwLock<HashMap<String, u64>>,
    /// Rolling response times in ms
    response_times: RwLock<HashMap<String, Vec<u64>>>,
    errors: RwLock<HashMap<String, u64>>,
    successes: RwLock<HashMap<String, u64>>,
}

fn key(collection: Collection, operation: Operation) -> String {
    format!("{}/{}", collection, operation)
}

fn increment(map: &RwLock<HashMap<String, u64>>, key: String) {
    let mut map = map.write().unwrap_or_else(PoisonError::into_inner);
    *map.entry(key).or_insert(0) += 1;
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            requests: RwLock::new(HashMap::new()),
            response_times: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
            successes: RwLock::new(HashMap::new()),
        }
    }

    /// Record the start of an operation
    pub fn record_request(&self, collection: Collection, operation: Operation) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        increment(&self.requests, key(collection, operation));
    }

    /// Record an engine round-trip time
    pub fn record_response_time(&self, collection: Collection, operation: Operation, time_ms: u64) {
        let mut times = self
            .response_times
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = times.entry(key(collection, operation)).or_default();

        if entry.len() >= RESPONSE_TIME_WINDOW {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    pub fn record_error(&self, collection: Collection, operation: Operation) {
        increment(&self.errors, key(collection, operation));
    }

    pub fn record_success(&self, collection: Collection, operation: Operation) {
        increment(&self.successes, key(collection, operation));
    }

    pub fn get_total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Average response time for a `collection/operation` key
    pub fn get_avg_response_time(&self, key: &str) -> Option<u64> {
        let times = self
            .response_times
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        times.get(key).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Success percentage of completed operations for a key
    pub fn get_reliability(&self, key: &str) -> f64 {
        let errors = self.errors.read().unwrap_or_else(PoisonError::into_inner);
        let successes = self.successes.read().unwrap_or_else(PoisonError::into_inner);

        let error_count = *errors.get(key).unwrap_or(&0);
        let success_count = *successes.get(key).unwrap_or(&0);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Statistics for every key seen so far
    pub fn get_operation_stats(&self) -> BTreeMap<String, OperationStats> {
        let requests = self.requests.read().unwrap_or_else(PoisonError::into_inner);
        let errors = self.errors.read().unwrap_or_else(PoisonError::into_inner);

        requests
            .iter()
            .map(|(key, count)| {
                (
                    key.clone(),
                    OperationStats {
                        requests: *count,
                        errors: *errors.get(key).unwrap_or(&0),
                        avg_response_time: self.get_avg_response_time(key),
                        reliability: self.get_reliability(key),
                    },
                )
            })
            .collect()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.get_total_requests(),
            operations: self.get_operation_stats(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single `collection/operation`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationStats {
    pub requests: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub operations: BTreeMap<String, OperationStats>,
}
