//! # Scan Session Control
//!
//! Owns the capture lifecycle: a state machine driven by caller commands
//! (`start`, `stop`, `reset`, `export_to`) on one side and tracking-source
//! events (fragments, progress, finalize) on the other, with fusion work
//! dispatched to background threads.
//!
//! ## Architecture
//!
//! All mutable session state lives behind one `Arc<Mutex<_>>`. Commands and
//! the event delivery path both funnel into it, making the controller the
//! single writer of the fragment store; fusion and export workers only ever
//! see cloned snapshots taken under the lock.
//!
//! Background fusion results carry the pass token current at dispatch time.
//! `reset()` bumps the token, so a result arriving after a reset is
//! recognized as stale and dropped instead of clobbering the new session.
//! There is no hard interruption of a running worker, only suppression of
//! its effect.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --start()--> Scanning --stop()--> Finalizing --fusion done--> Ready
//!                                              \--finalize error--> Failed
//! any state --reset()--> Idle
//! ```

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use thiserror::Error;

use crate::export::{export_scene, ExportError, SceneSerializer, TextSceneSerializer};
use crate::fusion::{assemble, MatcherConfig};
use crate::model::{FragmentStore, MeshFragment, ParametricSnapshot};
use crate::scene::FusedScene;

/// Lifecycle state of a scan session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Idle,
    Scanning,
    Finalizing,
    Ready,
    Failed,
}

/// Session-level failure reported by the tracking/parametric source
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CaptureError(pub String);

/// `start()` was called while a scan was already in progress
#[derive(Debug, Error)]
#[error("a scan is already in progress")]
pub struct ConcurrentStartError;

/// Events delivered by the tracking source
#[derive(Debug)]
pub enum TrackingEvent {
    /// A new dense fragment became available
    FragmentAdded(MeshFragment),
    /// A known fragment's content was refined; supersedes the prior buffers
    FragmentUpdated(MeshFragment),
    /// Capture finished: the parametric room model, or why it failed
    ParametricFinalized(Result<ParametricSnapshot, CaptureError>),
    /// Capture progress as reported by the source, forwarded verbatim
    Progress(f32),
}

/// State-change notifications published to subscribers
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StatusChanged { status: ScanStatus, message: String },
    ProgressChanged(f32),
    SceneReady,
}

/// Seam to the external tracking source
///
/// Acquisition itself is out of scope; the controller only signals intent.
/// Events flow back in through [`ScanSessionController::handle_event`].
pub trait CaptureDriver: Send {
    /// Tell the source to begin capturing
    fn begin_capture(&mut self);
    /// Tell the source to end capturing; a `ParametricFinalized` event is
    /// expected to follow
    fn end_capture(&mut self);
}

/// Driver that signals nothing; for tests and event replay
pub struct NullDriver;

impl CaptureDriver for NullDriver {
    fn begin_capture(&mut self) {}
    fn end_capture(&mut self) {}
}

struct SessionState {
    status: ScanStatus,
    progress: f32,
    status_message: String,
    fragments: FragmentStore,
    snapshot: Option<Arc<ParametricSnapshot>>,
    fused_scene: Option<Arc<FusedScene>>,
    /// Bumped on start and reset; in-flight fusion results carrying an older
    /// token are discarded on arrival
    pass_token: u64,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            status: ScanStatus::Idle,
            progress: 0.0,
            status_message: "Ready to start scanning".to_string(),
            fragments: FragmentStore::new(),
            snapshot: None,
            fused_scene: None,
            pass_token: 0,
            subscribers: Vec::new(),
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    fn set_status(&mut self, status: ScanStatus, message: &str) {
        self.status = status;
        self.status_message = message.to_string();
        log::info!("session status: {:?} ({})", status, message);
        self.notify(SessionEvent::StatusChanged {
            status,
            message: message.to_string(),
        });
    }
}

/// Asynchronous controller for one scan session
///
/// Commands may be issued from any thread; tracking events may be delivered
/// from any thread. One instance covers one scan; `reset()` returns it to a
/// fresh Idle session.
pub struct ScanSessionController {
    state: Arc<Mutex<SessionState>>,
    driver: Mutex<Box<dyn CaptureDriver>>,
    serializer: Box<dyn SceneSerializer + Send + Sync>,
    config: MatcherConfig,
}

impl ScanSessionController {
    /// Create a controller around a capture driver, with default matching
    /// parameters and the plain-text scene serializer
    pub fn new(driver: Box<dyn CaptureDriver>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            driver: Mutex::new(driver),
            serializer: Box::new(TextSceneSerializer),
            config: MatcherConfig::default(),
        }
    }

    /// Builder-style setter for the matcher configuration
    pub fn with_config(mut self, config: MatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder-style setter for the export serializer
    pub fn with_serializer(mut self, serializer: Box<dyn SceneSerializer + Send + Sync>) -> Self {
        self.serializer = serializer;
        self
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state lock poisoned")
    }

    // ---- Observable state ----

    pub fn status(&self) -> ScanStatus {
        self.state().status
    }

    pub fn progress(&self) -> f32 {
        self.state().progress
    }

    pub fn status_message(&self) -> String {
        self.state().status_message.clone()
    }

    pub fn is_scene_ready(&self) -> bool {
        self.state().status == ScanStatus::Ready
    }

    /// The published fused scene, once a fusion pass has completed
    pub fn fused_scene(&self) -> Option<Arc<FusedScene>> {
        self.state().fused_scene.clone()
    }

    /// Subscribe to state-change notifications
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.state().subscribers.push(tx);
        rx
    }

    // ---- Commands ----

    /// Begin a new capture
    ///
    /// Discards any prior session state and signals the tracking source to
    /// start. Rejected while a scan is already running, leaving the running
    /// session untouched.
    pub fn start(&self) -> Result<(), ConcurrentStartError> {
        {
            let mut state = self.state();
            if state.status == ScanStatus::Scanning {
                return Err(ConcurrentStartError);
            }

            state.pass_token += 1;
            state.fragments.clear();
            state.snapshot = None;
            state.fused_scene = None;
            state.progress = 0.0;
            state.set_status(ScanStatus::Scanning, "Scanning environment...");
        }

        self.driver
            .lock()
            .expect("capture driver lock poisoned")
            .begin_capture();
        Ok(())
    }

    /// End the capture
    ///
    /// Non-blocking: signals the tracking source and returns. The transition
    /// to Ready (or Failed) is observed asynchronously once the source
    /// delivers its finalize event and background fusion completes.
    pub fn stop(&self) {
        {
            let mut state = self.state();
            if state.status != ScanStatus::Scanning {
                log::warn!("stop() ignored in {:?} state", state.status);
                return;
            }
            state.set_status(ScanStatus::Finalizing, "Scan completed, processing...");
        }

        self.driver
            .lock()
            .expect("capture driver lock poisoned")
            .end_capture();
    }

    /// Return to Idle from any state, discarding all derived state
    ///
    /// An in-flight fusion or export result is not interrupted, but its
    /// eventual arrival is suppressed via the pass token.
    pub fn reset(&self) {
        let mut state = self.state();
        state.pass_token += 1;
        state.fragments.clear();
        state.snapshot = None;
        state.fused_scene = None;
        state.progress = 0.0;
        state.set_status(ScanStatus::Idle, "Ready to start scanning");
    }

    /// Export the finalized scan to `path`, re-running matching and building
    /// against the freshest fragment state
    ///
    /// Fails with [`ExportError::NoSnapshot`] before a successful finalize,
    /// without touching the filesystem.
    pub fn export_to(&self, path: &Path) -> Result<PathBuf, ExportError> {
        let (snapshot, fragments) = {
            let state = self.state();
            let snapshot = state.snapshot.clone().ok_or(ExportError::NoSnapshot)?;
            (snapshot, state.fragments.snapshot())
        };

        export_scene(
            &snapshot,
            &fragments,
            &self.config,
            self.serializer.as_ref(),
            path,
        )
    }

    // ---- Event intake ----

    /// Apply one tracking-source event
    ///
    /// Events are applied in arrival order. Fragment adds and updates share
    /// replace-or-append semantics, so duplicate delivery never duplicates
    /// an id.
    pub fn handle_event(&self, event: TrackingEvent) {
        match event {
            TrackingEvent::FragmentAdded(fragment) | TrackingEvent::FragmentUpdated(fragment) => {
                let mut state = self.state();
                log::debug!("applying {} ({} vertices)", fragment.id, fragment.positions.len());
                state.fragments.apply(fragment);
            }
            TrackingEvent::Progress(fraction) => {
                // Forwarded verbatim; the source owns progress semantics
                let mut state = self.state();
                state.progress = fraction;
                state.notify(SessionEvent::ProgressChanged(fraction));
            }
            TrackingEvent::ParametricFinalized(Ok(snapshot)) => self.on_finalized(snapshot),
            TrackingEvent::ParametricFinalized(Err(error)) => {
                let mut state = self.state();
                if !matches!(state.status, ScanStatus::Scanning | ScanStatus::Finalizing) {
                    log::warn!("capture error ignored in {:?} state: {}", state.status, error);
                    return;
                }
                state.set_status(ScanStatus::Failed, &format!("Scan error: {}", error));
            }
        }
    }

    fn on_finalized(&self, snapshot: ParametricSnapshot) {
        let (snapshot, fragments, token) = {
            let mut state = self.state();
            if !matches!(state.status, ScanStatus::Scanning | ScanStatus::Finalizing) {
                log::warn!("finalize ignored in {:?} state", state.status);
                return;
            }
            if state.snapshot.is_some() {
                log::warn!("duplicate finalize ignored; snapshot already captured");
                return;
            }

            let snapshot = Arc::new(snapshot);
            state.snapshot = Some(snapshot.clone());
            state.set_status(ScanStatus::Finalizing, "Generating 3D model...");
            (snapshot, state.fragments.snapshot(), state.pass_token)
        };

        let shared = self.state.clone();
        let config = self.config;
        thread::spawn(move || {
            let scene = assemble(&snapshot, &fragments, &config);

            let mut state = shared.lock().expect("session state lock poisoned");
            if state.pass_token != token || state.status != ScanStatus::Finalizing {
                log::info!("discarding stale fusion result (session was reset)");
                return;
            }
            state.fused_scene = Some(Arc::new(scene));
            state.set_status(ScanStatus::Ready, "3D model generation complete");
            state.notify(SessionEvent::SceneReady);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FragmentId, ObjectCategory, ObjectInstance};
    use cgmath::{Matrix4, Vector3};
    use std::time::{Duration, Instant};

    fn controller() -> ScanSessionController {
        ScanSessionController::new(Box::new(NullDriver))
    }

    fn snapshot_with_one_bed() -> ParametricSnapshot {
        ParametricSnapshot {
            surfaces: vec![],
            objects: vec![ObjectInstance {
                category: ObjectCategory::Bed,
                dimensions: Vector3::new(1.0, 1.0, 2.0),
                transform: Matrix4::from_translation(Vector3::new(0.0, 0.5, 0.0)),
            }],
        }
    }

    fn wait_for_status(controller: &ScanSessionController, status: ScanStatus) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.status() != status {
            assert!(Instant::now() < deadline, "timed out waiting for {:?}", status);
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_second_start_is_rejected() {
        let session = controller();
        session.start().unwrap();
        assert_eq!(session.status(), ScanStatus::Scanning);

        assert!(session.start().is_err());
        assert_eq!(session.status(), ScanStatus::Scanning);
    }

    #[test]
    fn test_stop_waits_for_finalize() {
        let session = controller();
        session.start().unwrap();
        session.stop();

        // No finalize delivered yet: the session must sit in Finalizing
        thread::sleep(Duration::from_millis(50));
        assert_eq!(session.status(), ScanStatus::Finalizing);
        assert!(!session.is_scene_ready());
    }

    #[test]
    fn test_full_lifecycle_publishes_scene() {
        let session = controller();
        session.start().unwrap();

        session.handle_event(TrackingEvent::FragmentAdded(MeshFragment {
            id: FragmentId(1),
            positions: vec![[0.0, 0.5, 0.0]; 12],
            indices: (0..12).collect(),
            normals: None,
        }));
        session.handle_event(TrackingEvent::Progress(0.6));
        assert_eq!(session.progress(), 0.6);

        session.stop();
        session.handle_event(TrackingEvent::ParametricFinalized(Ok(snapshot_with_one_bed())));

        wait_for_status(&session, ScanStatus::Ready);
        let scene = session.fused_scene().expect("scene published");
        assert_eq!(scene.entity_count(), 1);
        assert!(session.is_scene_ready());
    }

    #[test]
    fn test_finalize_error_fails_session() {
        let session = controller();
        session.start().unwrap();
        session.stop();
        session.handle_event(TrackingEvent::ParametricFinalized(Err(CaptureError(
            "tracking lost".to_string(),
        ))));

        assert_eq!(session.status(), ScanStatus::Failed);
        assert!(session.status_message().contains("tracking lost"));
        assert!(session.fused_scene().is_none());
    }

    #[test]
    fn test_progress_forwarded_verbatim() {
        let session = controller();
        session.start().unwrap();

        // Not monotonic, not clamped; forwarded as-is
        session.handle_event(TrackingEvent::Progress(0.8));
        session.handle_event(TrackingEvent::Progress(0.3));
        assert_eq!(session.progress(), 0.3);
    }

    #[test]
    fn test_reset_suppresses_inflight_fusion() {
        let session = controller();
        session.start().unwrap();
        session.stop();
        session.handle_event(TrackingEvent::ParametricFinalized(Ok(snapshot_with_one_bed())));

        // Reset races the background pass; whichever way it lands, the
        // session must end Idle with no published scene.
        session.reset();
        thread::sleep(Duration::from_millis(100));

        assert_eq!(session.status(), ScanStatus::Idle);
        assert!(session.fused_scene().is_none());
    }

    #[test]
    fn test_duplicate_finalize_captures_snapshot_once() {
        let session = controller();
        session.start().unwrap();
        session.stop();

        session.handle_event(TrackingEvent::ParametricFinalized(Ok(snapshot_with_one_bed())));
        wait_for_status(&session, ScanStatus::Ready);
        let first = session.fused_scene().unwrap();

        // A second finalize must not restart fusion or replace the snapshot
        session.handle_event(TrackingEvent::ParametricFinalized(Ok(ParametricSnapshot::default())));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(session.status(), ScanStatus::Ready);
        assert!(Arc::ptr_eq(&first, &session.fused_scene().unwrap()));
    }

    #[test]
    fn test_finalize_after_reset_is_ignored() {
        let session = controller();
        session.start().unwrap();
        session.stop();
        session.reset();

        session.handle_event(TrackingEvent::ParametricFinalized(Ok(snapshot_with_one_bed())));
        thread::sleep(Duration::from_millis(50));

        assert_eq!(session.status(), ScanStatus::Idle);
        assert!(session.fused_scene().is_none());
        assert!(matches!(
            session.export_to(Path::new("/nonexistent/roomfuse.scene")),
            Err(ExportError::NoSnapshot)
        ));
    }

    #[test]
    fn test_subscribers_observe_transitions() {
        let session = controller();
        let events = session.subscribe();

        session.start().unwrap();
        session.stop();
        session.handle_event(TrackingEvent::ParametricFinalized(Ok(snapshot_with_one_bed())));
        wait_for_status(&session, ScanStatus::Ready);

        let mut statuses = Vec::new();
        let mut scene_ready = false;
        while let Ok(event) = events.try_recv() {
            match event {
                SessionEvent::StatusChanged { status, .. } => statuses.push(status),
                SessionEvent::SceneReady => scene_ready = true,
                SessionEvent::ProgressChanged(_) => {}
            }
        }

        assert!(scene_ready);
        assert_eq!(
            statuses,
            vec![
                ScanStatus::Scanning,
                ScanStatus::Finalizing,
                ScanStatus::Finalizing,
                ScanStatus::Ready
            ]
        );
    }

    #[test]
    fn test_export_without_snapshot_is_rejected() {
        let session = controller();
        session.start().unwrap();

        let path = std::env::temp_dir().join("roomfuse_no_snapshot_test.scene");
        let result = session.export_to(&path);
        assert!(matches!(result, Err(ExportError::NoSnapshot)));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_after_finalize_writes_artifact() {
        let session = controller();
        session.start().unwrap();
        session.stop();
        session.handle_event(TrackingEvent::ParametricFinalized(Ok(snapshot_with_one_bed())));
        wait_for_status(&session, ScanStatus::Ready);

        let path = std::env::temp_dir().join("roomfuse_session_export_test.scene");
        let written = session.export_to(&path).unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }
}
