/* The platform delivers location fixes through callbacks on whatever thread it
likes. Instead of letting those callbacks touch the journey directly, they go
through a single-consumer channel: the `LocationFeed` half is handed to the
platform glue and the `LocationStream` half is drained by whoever owns the
journey tracker.
*/
use std::sync::{mpsc, Arc, Mutex};

use anyhow::Result;
use strum_macros::Display;

use crate::gps_processor::{GpsProcessor, LocationSample, ProcessResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Sample(LocationSample),
    Authorization(AuthorizationStatus),
}

pub trait LocationSource {
    fn start(&self);
    fn stop(&self);
    fn is_updating(&self) -> bool;
}

struct FeedState {
    updating: bool,
    gps_processor: GpsProcessor,
}

#[derive(Clone)]
pub struct LocationFeed {
    sender: mpsc::Sender<LocationEvent>,
    state: Arc<Mutex<FeedState>>,
}

pub struct LocationStream {
    receiver: mpsc::Receiver<LocationEvent>,
}

pub fn location_channel(distance_filter_m: f64) -> (LocationFeed, LocationStream) {
    let (sender, receiver) = mpsc::channel();
    let feed = LocationFeed {
        sender,
        state: Arc::new(Mutex::new(FeedState {
            updating: false,
            gps_processor: GpsProcessor::new(distance_filter_m),
        })),
    };
    (feed, LocationStream { receiver })
}

impl LocationFeed {
    fn send(&self, event: LocationEvent) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| anyhow!("location stream is closed"))
    }

    /// Returns whether a sample was forwarded to the stream.
    pub fn push_batch(&self, batch: Vec<LocationSample>) -> Result<bool> {
        let latest = match GpsProcessor::pick_latest(batch) {
            None => return Ok(false),
            Some(latest) => latest,
        };
        let mut state = self.state.lock().unwrap();
        if !state.updating {
            debug!("dropping location update, updates are stopped");
            return Ok(false);
        }
        match state.gps_processor.check(&latest) {
            ProcessResult::Ignore => Ok(false),
            ProcessResult::Accept => {
                // still holding the lock so stream order follows acceptance order,
                // the filter only moves on once the fix is delivered
                self.send(LocationEvent::Sample(latest.clone()))?;
                state.gps_processor.accept(latest);
                Ok(true)
            }
        }
    }

    pub fn push(&self, sample: LocationSample) -> Result<bool> {
        self.push_batch(vec![sample])
    }

    pub fn set_authorization(&self, status: AuthorizationStatus) -> Result<()> {
        match status {
            AuthorizationStatus::Granted => info!("authorization success"),
            AuthorizationStatus::Denied => warn!("authorization denied"),
            AuthorizationStatus::NotDetermined => (),
        }
        self.send(LocationEvent::Authorization(status))
    }
}

impl LocationSource for LocationFeed {
    fn start(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.updating {
            state.gps_processor.reset();
            state.updating = true;
        }
    }

    fn stop(&self) {
        self.state.lock().unwrap().updating = false;
    }

    fn is_updating(&self) -> bool {
        self.state.lock().unwrap().updating
    }
}

impl LocationStream {
    pub fn try_next(&self) -> Option<LocationEvent> {
        self.receiver.try_recv().ok()
    }

    /// Every event that is pending right now, without blocking.
    pub fn drain(&self) -> mpsc::TryIter<'_, LocationEvent> {
        self.receiver.try_iter()
    }
}
