#![allow(dead_code)]

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::{fs::File, io::Write};
use walk2draw_core::gps_processor::LocationSample;
use walk2draw_core::journey_tracker::JourneyTracker;
use walk2draw_core::location_source::AuthorizationStatus;

// somewhere in Sydney
pub const START_LAT: f64 = -33.793291910360125;
pub const START_LNG: f64 = 151.1435370795134;
pub const START_TIMESTAMP_MS: i64 = 1697349116449;

// ~11 meters
pub const STEP_DEG: f64 = 0.0001;

pub fn sample(latitude: f64, longitude: f64, timestamp_ms: i64) -> LocationSample {
    LocationSample::new(latitude, longitude, timestamp_ms)
}

/// A straight walk heading east, one fix per second.
pub fn walk_east(
    start_lat: f64,
    start_lng: f64,
    steps: usize,
    start_timestamp_ms: i64,
) -> Vec<LocationSample> {
    (0..steps)
        .map(|i| {
            sample(
                start_lat,
                start_lng + STEP_DEG * i as f64,
                start_timestamp_ms + 1000 * i as i64,
            )
        })
        .collect()
}

pub fn granted_tracker() -> JourneyTracker {
    let mut tracker = JourneyTracker::new();
    tracker.on_authorization_changed(AuthorizationStatus::Granted);
    tracker
}

pub fn verify_image(name: &str, image: &[u8]) {
    let hash_table_path = "tests/image_hashes.lock";
    let mut hash_table: BTreeMap<String, String> = if Path::new(hash_table_path).exists() {
        let hash_table_content =
            fs::read_to_string(hash_table_path).expect("Failed to read hash table file");
        serde_json::from_str(&hash_table_content).unwrap_or_else(|_| BTreeMap::new())
    } else {
        BTreeMap::new()
    };

    let mut hasher = Sha256::new();
    hasher.update(image);
    let current_hash = format!("{:x}", hasher.finalize());

    if let Some(stored_hash) = hash_table.get(name) {
        assert_eq!(
            &current_hash, stored_hash,
            "Image hash mismatch for {name}. Expected: {stored_hash}, Got: {current_hash}. If you have updated the image, please delete the image_hashes.lock file and re-run the tests."
        );
    } else {
        // a fresh checkout records the hash, CI has to find it in the lock file
        assert!(
            std::env::var_os("CI").is_none(),
            "No hash for {name} in image_hashes.lock, run the tests locally and commit the lock file."
        );
        hash_table.insert(name.to_string(), current_hash.clone());
        let hash_table_content =
            serde_json::to_string_pretty(&hash_table).expect("Failed to serialize hash table");
        fs::write(hash_table_path, hash_table_content).expect("Failed to write hash table file");
        println!("Added new hash entry for: {name}");
    }

    fs::create_dir_all("tests/for_inspection").expect("Failed to create inspection folder");
    let output_path = format!("tests/for_inspection/{name}.png");
    let mut file = File::create(&output_path).expect("Failed to create file");
    file.write_all(image).expect("Failed to write to file");
}
