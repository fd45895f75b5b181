use strum_macros::Display;
use uuid::Uuid;

use crate::gps_processor::LocationSample;
use crate::journey_vector::{Annotation, JourneyVector, SegmentMarkers};
use crate::location_source::AuthorizationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RecordingState {
    Idle,
    Recording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartResult {
    Started,
    AlreadyRecording,
    // the caller should go through the permission flow instead
    PermissionRequired,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StopResult {
    /// Markers are `None` when nothing was recorded in the finished segment.
    Stopped(Option<SegmentMarkers>),
    NotRecording,
}

/// Gets the full journey every time it changes, there is no incremental
/// update. Renderers are expected to redraw from scratch.
pub trait JourneyObserver: Send {
    fn journey_changed(&mut self, journey: &JourneyVector);
}

impl<F> JourneyObserver for F
where
    F: FnMut(&JourneyVector) + Send,
{
    fn journey_changed(&mut self, journey: &JourneyVector) {
        self(journey)
    }
}

pub struct JourneyTracker {
    journey_id: Uuid,
    journey: JourneyVector,
    // index into `journey`, `Some` exactly while recording
    active_segment: Option<usize>,
    authorization: AuthorizationStatus,
    observers: Vec<Box<dyn JourneyObserver>>,
    version: u64,
}

impl JourneyTracker {
    pub fn new() -> Self {
        Self {
            journey_id: Uuid::new_v4(),
            journey: JourneyVector::new(),
            active_segment: None,
            authorization: AuthorizationStatus::NotDetermined,
            observers: Vec::new(),
            version: 0,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn JourneyObserver>) {
        self.observers.push(observer);
    }

    fn notify(&mut self) {
        self.version = self.version.wrapping_add(1);
        for observer in self.observers.iter_mut() {
            observer.journey_changed(&self.journey);
        }
    }

    pub fn state(&self) -> RecordingState {
        match self.active_segment {
            Some(_) => RecordingState::Recording,
            None => RecordingState::Idle,
        }
    }

    pub fn journey(&self) -> &JourneyVector {
        &self.journey
    }

    pub fn journey_id(&self) -> Uuid {
        self.journey_id
    }

    pub fn authorization(&self) -> AuthorizationStatus {
        self.authorization
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.journey.annotations()
    }

    pub fn can_export(&self) -> bool {
        self.journey.has_samples()
    }

    pub fn start(&mut self) -> StartResult {
        if self.active_segment.is_some() {
            warn!("`start` is called while recording");
            return StartResult::AlreadyRecording;
        }
        // NOTE: `NotDetermined` is treated like `Denied`, we only start once
        // the platform explicitly granted access.
        if self.authorization != AuthorizationStatus::Granted {
            info!(
                "location permission is {}, not starting",
                self.authorization
            );
            return StartResult::PermissionRequired;
        }
        let idx = self.journey.push_segment();
        self.active_segment = Some(idx);
        info!("started segment {}", idx + 1);
        self.notify();
        StartResult::Started
    }

    pub fn stop(&mut self) -> StopResult {
        let idx = match self.active_segment.take() {
            None => {
                warn!("`stop` is called while idle");
                return StopResult::NotRecording;
            }
            Some(idx) => idx,
        };
        let markers = match self.journey.segment_mut(idx) {
            Some(segment) => {
                segment.finalize();
                info!("stopped segment {} with {} samples", idx + 1, segment.len());
                segment.markers()
            }
            None => {
                // `clear` always resets the handle, so this can't happen
                error!("active segment {} is missing", idx);
                None
            }
        };
        self.notify();
        StopResult::Stopped(markers)
    }

    pub fn clear(&mut self) {
        if let Some(idx) = self.active_segment.take() {
            info!("clearing while recording segment {}", idx + 1);
        }
        self.journey.clear();
        self.journey_id = Uuid::new_v4();
        self.notify();
    }

    /// Returns whether the sample was recorded. Samples arriving while idle are
    /// dropped, not buffered.
    pub fn on_sample(&mut self, sample: LocationSample) -> bool {
        let segment = match self
            .active_segment
            .and_then(|idx| self.journey.segment_mut(idx))
        {
            None => {
                debug!("dropping sample while idle");
                return false;
            }
            Some(segment) => segment,
        };
        segment.push(sample);
        self.notify();
        true
    }

    pub fn on_authorization_changed(&mut self, status: AuthorizationStatus) {
        self.authorization = status;
        if status == AuthorizationStatus::Denied && self.active_segment.is_some() {
            warn!("location permission revoked while recording, stopping");
            self.stop();
        }
    }
}
