use std::mem;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex, OnceLock};

use anyhow::Result;

use crate::config::DrawConfig;
use crate::export::FileExportSink;
use crate::gps_processor::LocationSample;
use crate::journey_tracker::{JourneyObserver, RecordingState, StartResult, StopResult};
use crate::journey_vector::{Annotation, JourneyVector};
use crate::location_source::{AuthorizationStatus, LocationFeed};
use crate::logs;
use crate::map_snapshot::{MapRegion, PlainSnapshotProvider};
use crate::session::DrawSession;

#[derive(Default)]
struct Observers {
    list: Vec<Box<dyn JourneyObserver>>,
    // `list` is taken out while a thread is calling into it
    dispatching: bool,
}

struct MainState {
    cache_dir: String,
    feed: LocationFeed,
    session: Mutex<DrawSession<PlainSnapshotProvider>>,
    // journeys the tracker notified about, waiting for `observers`
    pending_changes: Arc<Mutex<Vec<JourneyVector>>>,
    observers: Mutex<Observers>,
}

static MAIN_STATE: OnceLock<MainState> = OnceLock::new();

/// `config_path` points to an optional JSON file, missing fields fall back to
/// the defaults.
pub fn init(cache_dir: String, config_path: Option<String>) -> Result<()> {
    if MAIN_STATE.get().is_some() {
        warn!("`init` is called multiple times");
        return Ok(());
    }

    if let Err(e) = logs::init(&cache_dir) {
        // most likely a logger is already installed (e.g. by the host)
        eprintln!("Failed to initialize logging: {e}");
    }

    let config = match config_path {
        None => DrawConfig::default(),
        Some(path) => DrawConfig::load(path)?,
    };
    let provider = PlainSnapshotProvider::new(config.background_color);
    let mut session = DrawSession::new(config, provider);
    let pending_changes = Arc::new(Mutex::new(Vec::new()));
    let pending = pending_changes.clone();
    session.add_observer(Box::new(move |journey: &JourneyVector| {
        pending.lock().unwrap().push(journey.clone());
    }));
    let state = MainState {
        cache_dir,
        feed: session.feed(),
        session: Mutex::new(session),
        pending_changes,
        observers: Mutex::new(Observers::default()),
    };
    if MAIN_STATE.set(state).is_err() {
        warn!("`init` is called multiple times");
    } else {
        info!("initialized");
    }
    Ok(())
}

fn get() -> Result<&'static MainState> {
    MAIN_STATE
        .get()
        .ok_or_else(|| anyhow!("main state is not initialized"))
}

// Observers are called once the session lock is released, so they are free to
// call back into this module.
fn dispatch_changes(state: &MainState) {
    loop {
        let (mut list, changes) = {
            let mut guard = state.observers.lock().unwrap();
            if guard.dispatching {
                // the dispatching thread picks up our changes on its next round
                return;
            }
            let changes = mem::take(&mut *state.pending_changes.lock().unwrap());
            if changes.is_empty() {
                return;
            }
            guard.dispatching = true;
            (mem::take(&mut guard.list), changes)
        };
        for journey in &changes {
            for observer in list.iter_mut() {
                observer.journey_changed(journey);
            }
        }
        let mut guard = state.observers.lock().unwrap();
        // observers registered from within a callback go last
        list.append(&mut guard.list);
        guard.list = list;
        guard.dispatching = false;
    }
}

fn with_session<T>(f: impl FnOnce(&mut DrawSession<PlainSnapshotProvider>) -> T) -> Result<T> {
    let state = get()?;
    let result = f(&mut state.session.lock().unwrap());
    dispatch_changes(state);
    Ok(result)
}

pub fn on_location_update(raw_data_list: Vec<LocationSample>) -> Result<()> {
    get()?.feed.push_batch(raw_data_list)?;
    with_session(|session| {
        session.pump();
    })
}

pub fn on_authorization_changed(status: AuthorizationStatus) -> Result<()> {
    get()?.feed.set_authorization(status)?;
    with_session(|session| {
        session.pump();
    })
}

pub fn start() -> Result<StartResult> {
    with_session(|session| session.start())
}

pub fn stop() -> Result<StopResult> {
    with_session(|session| session.stop())
}

pub fn toggle() -> Result<RecordingState> {
    with_session(|session| {
        session.toggle();
        session.tracker().state()
    })
}

pub fn clear() -> Result<()> {
    with_session(|session| session.clear())
}

pub fn recording_state() -> Result<RecordingState> {
    Ok(get()?.session.lock().unwrap().tracker().state())
}

pub fn can_export() -> Result<bool> {
    Ok(get()?.session.lock().unwrap().tracker().can_export())
}

pub fn get_journey() -> Result<JourneyVector> {
    Ok(get()?.session.lock().unwrap().tracker().journey().clone())
}

pub fn get_annotations() -> Result<Vec<Annotation>> {
    Ok(get()?.session.lock().unwrap().tracker().annotations())
}

pub fn get_display_region() -> Result<Option<MapRegion>> {
    Ok(get()?.session.lock().unwrap().display_region())
}

/// The observer may call any function of this module, it is never called with
/// the session locked.
pub fn register_journey_observer(observer: Box<dyn JourneyObserver>) -> Result<()> {
    get()?.observers.lock().unwrap().list.push(observer);
    Ok(())
}

/// Writes the drawing into `target_dir`, returns false if nothing was recorded.
pub fn share(target_dir: String) -> Result<bool> {
    let mut sink = FileExportSink::new(target_dir)?;
    with_session(|session| session.share(&mut sink))?
}

pub fn subscribe_to_log(sink: mpsc::Sender<String>) {
    logs::set_host_sink(sink);
}

pub fn export_logs(target_file_path: String) -> Result<()> {
    let cache_dir = &get()?.cache_dir;
    if !Path::new(cache_dir).join("logs").exists() {
        bail!("no logs in {}", cache_dir);
    }
    logs::export(cache_dir, &target_file_path)
}
