use anyhow::Result;
use tiny_skia::{Color, Pixmap};

use crate::gps_processor::LocationSample;
use crate::journey_vector::JourneyVector;
use crate::utils::{self, MAX_MERCATOR_LAT};

// Lower bound for `min_span_m`, so the bounds of a single fix never collapse.
const MIN_SPAN_M: f64 = 1.0;

// coordinates are in lat or lng
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// A region as a map view understands it: a center and a span in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub latitudinal_meters: f64,
    pub longitudinal_meters: f64,
}

impl GeoBounds {
    pub fn from_region(region: &MapRegion) -> Self {
        let half_lat = utils::meters_to_lat_degrees(region.latitudinal_meters) / 2.0;
        let half_lng =
            utils::meters_to_lng_degrees(region.longitudinal_meters, region.center_latitude) / 2.0;
        GeoBounds {
            north: region.center_latitude + half_lat,
            south: region.center_latitude - half_lat,
            east: region.center_longitude + half_lng,
            west: region.center_longitude - half_lng,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude <= self.north
            && latitude >= self.south
            && longitude <= self.east
            && longitude >= self.west
    }

    pub fn padded(&self, ratio: f64) -> Self {
        let lat_pad = (self.north - self.south) * ratio;
        let lng_pad = (self.east - self.west) * ratio;
        GeoBounds {
            north: self.north + lat_pad,
            south: self.south - lat_pad,
            east: self.east + lng_pad,
            west: self.west - lng_pad,
        }
    }
}

pub struct MapSnapshot {
    pixmap: Pixmap,
    bounds: GeoBounds,
}

impl MapSnapshot {
    pub fn new(pixmap: Pixmap, bounds: GeoBounds) -> Self {
        Self { pixmap, bounds }
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    // TODO: bounds crossing the antimeridian (west > east) are not handled.
    pub fn coordinate_to_pixel(&self, latitude: f64, longitude: f64) -> (f32, f32) {
        let (left, top) = utils::lng_lat_to_mercator_x_y(self.bounds.west, self.bounds.north);
        let (right, bottom) = utils::lng_lat_to_mercator_x_y(self.bounds.east, self.bounds.south);
        let (x, y) = utils::lng_lat_to_mercator_x_y(longitude, latitude);
        let px = (x - left) / (right - left) * self.pixmap.width() as f64;
        let py = (y - top) / (bottom - top) * self.pixmap.height() as f64;
        (px as f32, py as f32)
    }
}

/// Base-image provider: renders the map for a region.
pub trait SnapshotProvider {
    fn snapshot(&mut self, bounds: &GeoBounds, width: u32, height: u32) -> Result<MapSnapshot>;
}

/// Renders a flat background, used when no real map is available.
pub struct PlainSnapshotProvider {
    background: [u8; 4],
}

impl PlainSnapshotProvider {
    pub fn new(background: [u8; 4]) -> Self {
        Self { background }
    }
}

impl SnapshotProvider for PlainSnapshotProvider {
    fn snapshot(&mut self, bounds: &GeoBounds, width: u32, height: u32) -> Result<MapSnapshot> {
        if bounds.north <= bounds.south || bounds.east <= bounds.west {
            bail!("Invalid snapshot bounds: {:?}", bounds);
        }
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("Invalid snapshot size: {}x{}", width, height))?;
        let [r, g, b, a] = self.background;
        pixmap.fill(Color::from_rgba8(r, g, b, a));
        Ok(MapSnapshot::new(pixmap, *bounds))
    }
}

/// The region a live map should show: centered on the last sample, wide
/// enough to include every sample (but never narrower than `min_span_m`).
pub fn fit_region(samples: &[LocationSample], min_span_m: f64) -> Option<MapRegion> {
    let last = samples.last()?;
    let span = samples
        .iter()
        .map(|s| s.distance_to(last))
        .fold(min_span_m.max(MIN_SPAN_M), f64::max);
    Some(MapRegion {
        center_latitude: last.latitude,
        center_longitude: last.longitude,
        latitudinal_meters: span,
        longitudinal_meters: span,
    })
}

/// Bounding box of every sample in the journey. Each side is at least
/// `min_span_m` wide and the result is padded by `padding_ratio` of its size,
/// then kept within the latitudes Web Mercator can show.
pub fn journey_bounds(
    journey: &JourneyVector,
    padding_ratio: f64,
    min_span_m: f64,
) -> Option<GeoBounds> {
    let min_span_m = min_span_m.max(MIN_SPAN_M);
    let mut samples = journey.all_samples();
    let first = samples.next()?;
    let mut bounds = GeoBounds {
        north: first.latitude,
        south: first.latitude,
        east: first.longitude,
        west: first.longitude,
    };
    for s in samples {
        bounds.north = bounds.north.max(s.latitude);
        bounds.south = bounds.south.min(s.latitude);
        bounds.east = bounds.east.max(s.longitude);
        bounds.west = bounds.west.min(s.longitude);
    }

    let (center_lat, center_lng) = bounds.center();
    let min_lat = utils::meters_to_lat_degrees(min_span_m);
    if bounds.north - bounds.south < min_lat {
        bounds.north = center_lat + min_lat / 2.0;
        bounds.south = center_lat - min_lat / 2.0;
    }
    let min_lng = utils::meters_to_lng_degrees(min_span_m, center_lat);
    if bounds.east - bounds.west < min_lng {
        bounds.east = center_lng + min_lng / 2.0;
        bounds.west = center_lng - min_lng / 2.0;
    }

    let mut bounds = bounds.padded(padding_ratio);
    bounds.north = bounds.north.min(MAX_MERCATOR_LAT);
    bounds.south = bounds.south.max(-MAX_MERCATOR_LAT);
    // the whole journey is past the limit, show the band next to it
    if bounds.north - bounds.south < min_lat {
        if center_lat > 0.0 {
            bounds.south = MAX_MERCATOR_LAT - min_lat;
        } else {
            bounds.north = -MAX_MERCATOR_LAT + min_lat;
        }
    }
    Some(bounds)
}
