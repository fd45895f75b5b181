#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod api;
pub mod config;
pub mod export;
pub mod gps_processor;
pub mod journey_tracker;
pub mod journey_vector;
pub mod location_source;
mod logs;
pub mod map_snapshot;
pub mod path_projector;
pub mod session;
pub mod utils;
