use std::f64::consts::PI;

pub const EARTH_RADIUS: f64 = 6371000.0; // unit: meter
const METERS_PER_LAT_DEGREE: f64 = 111_320.0;
// Web Mercator is undefined beyond this
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

// Web Mercator, normalized to [0, 1] on both axes (y grows southward).
// https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames
pub fn lng_lat_to_mercator_x_y(lng: f64, lat: f64) -> (f64, f64) {
    let lat_rad = (lat / 180.0) * PI;
    let x = (lng + 180.0) / 360.0;
    let y = (1.0 - ((lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI)) / 2.0;
    (x, y)
}

pub fn mercator_x_y_to_lng_lat(x: f64, y: f64) -> (f64, f64) {
    let lng = x * 360.0 - 180.0;
    let lat = (f64::atan(f64::sinh(PI * (1.0 - 2.0 * y))) * 180.0) / PI;
    (lng, lat)
}

/// Great-circle distance in meters.
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn meters_to_lat_degrees(meters: f64) -> f64 {
    meters / METERS_PER_LAT_DEGREE
}

// Longitude degrees shrink with latitude, this blows up near the poles so we
// clamp the cosine.
pub fn meters_to_lng_degrees(meters: f64, at_lat: f64) -> f64 {
    let cos = at_lat.to_radians().cos().max(1e-6);
    meters / (METERS_PER_LAT_DEGREE * cos)
}
