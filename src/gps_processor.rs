use chrono::{DateTime, Utc};

use crate::utils;

#[derive(Clone, Debug, PartialEq)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp_ms: i64,
    pub accuracy: Option<f32>,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_ms,
            accuracy: None,
        }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }

    pub fn distance_to(&self, other: &LocationSample) -> f64 {
        utils::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProcessResult {
    Accept,
    Ignore,
}

/// Decides which raw fixes coming from the platform are worth delivering.
/// This mirrors what a platform location manager does with its distance
/// filter: a fix that hasn't moved far enough from the last delivered one is
/// dropped.
pub struct GpsProcessor {
    distance_filter_m: f64,
    last_data: Option<LocationSample>,
}

impl GpsProcessor {
    pub fn new(distance_filter_m: f64) -> Self {
        GpsProcessor {
            distance_filter_m: distance_filter_m.max(0.0),
            last_data: None,
        }
    }

    pub fn last_data(&self) -> Option<&LocationSample> {
        self.last_data.as_ref()
    }

    // Called when updates are (re)started, the first fix after that is always
    // delivered.
    pub fn reset(&mut self) {
        self.last_data = None;
    }

    /// Decides on `curr_data` without recording it, see `accept`.
    pub fn check(&self, curr_data: &LocationSample) -> ProcessResult {
        match &self.last_data {
            None => ProcessResult::Accept,
            Some(last_data) => {
                if curr_data.timestamp_ms < last_data.timestamp_ms {
                    // NOTE: We could get a location update from a while ago and
                    // it can mess up the path, so we simply drop these.
                    ProcessResult::Ignore
                } else if curr_data.distance_to(last_data) < self.distance_filter_m {
                    ProcessResult::Ignore
                } else {
                    ProcessResult::Accept
                }
            }
        }
    }

    /// Records `curr_data` as the last delivered fix.
    pub fn accept(&mut self, curr_data: LocationSample) {
        self.last_data = Some(curr_data);
    }

    pub fn preprocess(&mut self, curr_data: &LocationSample) -> ProcessResult {
        let result = self.check(curr_data);
        if result == ProcessResult::Accept {
            self.accept(curr_data.clone());
        }
        result
    }

    /// The platform may hand us several fixes at once, only the most recent one
    /// matters.
    pub fn pick_latest(batch: Vec<LocationSample>) -> Option<LocationSample> {
        // `max_by_key` returns the last max element, so equal timestamps keep
        // the platform's ordering.
        batch.into_iter().max_by_key(|data| data.timestamp_ms)
    }
}
