use anyhow::Result;

use crate::config::DrawConfig;
use crate::export::{self, ExportSink};
use crate::journey_tracker::{
    JourneyObserver, JourneyTracker, RecordingState, StartResult, StopResult,
};
use crate::location_source::{
    self, AuthorizationStatus, LocationEvent, LocationFeed, LocationSource, LocationStream,
};
use crate::map_snapshot::{self, MapRegion, SnapshotProvider};

/// One drawing screen: the location stream, the journey and the export
/// pipeline. All mutations of the journey happen through `&mut self`, one
/// event at a time.
pub struct DrawSession<P: SnapshotProvider> {
    config: DrawConfig,
    tracker: JourneyTracker,
    feed: LocationFeed,
    stream: LocationStream,
    provider: P,
}

impl<P: SnapshotProvider> DrawSession<P> {
    pub fn new(config: DrawConfig, provider: P) -> Self {
        let (feed, stream) = location_source::location_channel(config.distance_filter_m);
        Self {
            config,
            tracker: JourneyTracker::new(),
            feed,
            stream,
            provider,
        }
    }

    /// The producer half, for the platform's location callbacks.
    pub fn feed(&self) -> LocationFeed {
        self.feed.clone()
    }

    pub fn tracker(&self) -> &JourneyTracker {
        &self.tracker
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn add_observer(&mut self, observer: Box<dyn JourneyObserver>) {
        self.tracker.add_observer(observer);
    }

    fn handle(&mut self, event: LocationEvent) {
        match event {
            LocationEvent::Sample(sample) => {
                self.tracker.on_sample(sample);
            }
            LocationEvent::Authorization(status) => {
                self.tracker.on_authorization_changed(status);
                if status == AuthorizationStatus::Denied {
                    self.feed.stop();
                }
            }
        }
    }

    /// Processes everything pending on the stream, returns how many events
    /// were handled.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Some(event) = self.stream.try_next() {
            self.handle(event);
            count += 1;
        }
        count
    }

    pub fn start(&mut self) -> StartResult {
        // pick up a pending authorization change before deciding
        self.pump();
        let result = self.tracker.start();
        if result == StartResult::Started {
            self.feed.start();
        }
        result
    }

    pub fn stop(&mut self) -> StopResult {
        self.feed.stop();
        // whatever made it in before updates stopped still belongs to this segment
        self.pump();
        self.tracker.stop()
    }

    /// The single start/stop button.
    pub fn toggle(&mut self) {
        if self.tracker.state() == RecordingState::Recording {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn clear(&mut self) {
        self.feed.stop();
        // samples still in flight belong to the journey being cleared
        let pending: Vec<_> = self.stream.drain().collect();
        for event in pending {
            if let LocationEvent::Authorization(status) = event {
                self.tracker.on_authorization_changed(status);
            }
        }
        self.tracker.clear();
    }

    /// Region the live map should show, `None` when nothing is recorded.
    pub fn display_region(&self) -> Option<MapRegion> {
        let samples: Vec<_> = self.tracker.journey().all_samples().cloned().collect();
        map_snapshot::fit_region(&samples, self.config.min_region_span_m)
    }

    pub fn share<S: ExportSink>(&mut self, sink: &mut S) -> Result<bool> {
        self.pump();
        export::share(&self.tracker, &mut self.provider, &self.config, sink)
    }
}
