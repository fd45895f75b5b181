use itertools::Itertools;
use strum_macros::{AsRefStr, Display};

use crate::gps_processor::LocationSample;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneyVector {
    track_segments: Vec<TrackSegment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSegment {
    track_points: Vec<LocationSample>,
    finalized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMarkers {
    pub start: LocationSample,
    pub stop: LocationSample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum MarkerKind {
    Start,
    Stop,
}

/// A pin the renderer places on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub kind: MarkerKind,
    pub latitude: f64,
    pub longitude: f64,
    /// 1-based, in creation order.
    pub segment_number: usize,
}

impl Annotation {
    pub fn title(&self) -> &str {
        self.kind.as_ref()
    }

    pub fn subtitle(&self) -> String {
        format!("Segment {}", self.segment_number)
    }
}

impl TrackSegment {
    pub fn track_points(&self) -> &[LocationSample] {
        &self.track_points
    }

    pub fn is_empty(&self) -> bool {
        self.track_points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.track_points.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Only finalized, non-empty segments carry markers.
    pub fn markers(&self) -> Option<SegmentMarkers> {
        if !self.finalized {
            return None;
        }
        match (self.track_points.first(), self.track_points.last()) {
            (Some(start), Some(stop)) => Some(SegmentMarkers {
                start: start.clone(),
                stop: stop.clone(),
            }),
            _ => None,
        }
    }

    pub fn distance_m(&self) -> f64 {
        self.track_points
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance_to(b))
            .sum()
    }

    pub(crate) fn push(&mut self, sample: LocationSample) {
        debug_assert!(!self.finalized, "appending to a finalized segment");
        self.track_points.push(sample);
    }

    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }
}

impl JourneyVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a journey out of already recorded segments, all of them are
    /// considered finalized.
    pub fn from_segments(segments: Vec<Vec<LocationSample>>) -> Self {
        JourneyVector {
            track_segments: segments
                .into_iter()
                .map(|track_points| TrackSegment {
                    track_points,
                    finalized: true,
                })
                .collect(),
        }
    }

    pub fn track_segments(&self) -> &[TrackSegment] {
        &self.track_segments
    }

    pub fn is_empty(&self) -> bool {
        self.track_segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.track_segments.len()
    }

    pub fn sample_count(&self) -> usize {
        self.track_segments.iter().map(TrackSegment::len).sum()
    }

    pub fn has_samples(&self) -> bool {
        self.track_segments.iter().any(|s| !s.is_empty())
    }

    pub fn total_distance_m(&self) -> f64 {
        self.track_segments.iter().map(TrackSegment::distance_m).sum()
    }

    pub fn all_samples(&self) -> impl Iterator<Item = &LocationSample> {
        self.track_segments
            .iter()
            .flat_map(|s| s.track_points.iter())
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        for (i, segment) in self.track_segments.iter().enumerate() {
            let segment_number = i + 1;
            if let Some(first) = segment.track_points.first() {
                annotations.push(Annotation {
                    kind: MarkerKind::Start,
                    latitude: first.latitude,
                    longitude: first.longitude,
                    segment_number,
                });
            }
            if let Some(markers) = segment.markers() {
                annotations.push(Annotation {
                    kind: MarkerKind::Stop,
                    latitude: markers.stop.latitude,
                    longitude: markers.stop.longitude,
                    segment_number,
                });
            }
        }
        annotations
    }

    /// Returns the index of the new segment.
    pub(crate) fn push_segment(&mut self) -> usize {
        self.track_segments.push(TrackSegment::default());
        self.track_segments.len() - 1
    }

    pub(crate) fn segment_mut(&mut self, idx: usize) -> Option<&mut TrackSegment> {
        self.track_segments.get_mut(idx)
    }

    pub(crate) fn clear(&mut self) {
        self.track_segments.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::gps_processor::LocationSample;
    use crate::journey_vector::{JourneyVector, MarkerKind, TrackSegment};

    #[test]
    fn markers_require_finalized() {
        let mut segment = TrackSegment::default();
        segment.push(LocationSample::new(1.0, 2.0, 0));
        segment.push(LocationSample::new(3.0, 4.0, 1));
        assert!(segment.markers().is_none());
        segment.finalize();
        let markers = segment.markers().unwrap();
        assert_eq!(markers.start, LocationSample::new(1.0, 2.0, 0));
        assert_eq!(markers.stop, LocationSample::new(3.0, 4.0, 1));

        let mut empty = TrackSegment::default();
        empty.finalize();
        assert!(empty.markers().is_none());
    }

    #[test]
    fn annotations() {
        let journey = JourneyVector::from_segments(vec![
            vec![
                LocationSample::new(1.0, 1.0, 0),
                LocationSample::new(2.0, 2.0, 1),
            ],
            vec![],
            vec![LocationSample::new(5.0, 5.0, 2)],
        ]);
        let annotations = journey.annotations();
        assert_eq!(annotations.len(), 4);
        assert_eq!(annotations[0].kind, MarkerKind::Start);
        assert_eq!(annotations[0].title(), "Start");
        assert_eq!(annotations[1].kind, MarkerKind::Stop);
        assert_eq!(annotations[1].latitude, 2.0);
        assert_eq!(annotations[2].subtitle(), "Segment 3");
        // single sample segment: start and stop on the same spot
        assert_eq!(annotations[3].title(), "Stop");
        assert_eq!(annotations[3].latitude, annotations[2].latitude);
    }

    #[test]
    fn distance() {
        let journey = JourneyVector::from_segments(vec![
            vec![
                LocationSample::new(0.0, 0.0, 0),
                LocationSample::new(1.0, 0.0, 1),
            ],
            vec![LocationSample::new(50.0, 50.0, 2)],
        ]);
        // the gap between segments is not walked
        assert!((journey.total_distance_m() - 111_194.9).abs() < 1.0);
        assert_eq!(journey.sample_count(), 3);
    }
}
