use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use crossbeam_channel::{Receiver, TryRecvError};

use crate::alert::domain::alert_sink::AlertSink;
use crate::alert::domain::throttle::Throttle;
use crate::detection::domain::object_detector::ObjectDetector;
use crate::detection::infrastructure::model_loader::LoadResult;
use crate::overlay::renderer::OverlayRenderer;
use crate::overlay::surface::OverlaySurface;
use crate::pipeline::pipeline_state::{PipelineState, STATUS_ACTIVE, STATUS_NO_SIGNAL};
use crate::shared::frame::Frame;
use crate::snapshot::domain::snapshot_writer::{snapshot_name, SnapshotWriter};
use crate::video::domain::frame_source::FrameSource;

/// Where the detector currently lives: still initializing on its loader
/// thread, ready for inference, or permanently unavailable.
pub enum DetectorSlot {
    Loading(Receiver<LoadResult>),
    Ready(Box<dyn ObjectDetector>),
    Failed,
}

/// One monitoring pipeline: acquires a frame per tick, runs inference,
/// repaints the overlay, and drives the throttled alert and snapshot side
/// effects.
///
/// State, overlay, and throttles sit behind shared mutexes so a session
/// handle can pause, resume, and inspect from other threads. Ticks take
/// explicit clocks (`Instant` for throttles, `SystemTime` for artifact
/// naming), which keeps every timing rule testable.
pub struct WatchFeedUseCase {
    source: Box<dyn FrameSource>,
    detector: DetectorSlot,
    renderer: OverlayRenderer,
    state: Arc<Mutex<PipelineState>>,
    surface: Arc<Mutex<OverlaySurface>>,
    alert_throttle: Arc<Mutex<Throttle>>,
    snapshot_throttle: Arc<Mutex<Throttle>>,
    alert: Box<dyn AlertSink>,
    snapshots: Box<dyn SnapshotWriter>,
}

impl WatchFeedUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: DetectorSlot,
        target_label: impl Into<String>,
        alert: Box<dyn AlertSink>,
        snapshots: Box<dyn SnapshotWriter>,
        alert_cooldown: Duration,
        snapshot_cooldown: Duration,
    ) -> Self {
        let mut state = PipelineState::new();
        if matches!(detector, DetectorSlot::Ready(_)) {
            state.model_ready();
        }
        Self {
            source,
            detector,
            renderer: OverlayRenderer::new(target_label),
            state: Arc::new(Mutex::new(state)),
            surface: Arc::new(Mutex::new(OverlaySurface::new())),
            alert_throttle: Arc::new(Mutex::new(Throttle::new(alert_cooldown))),
            snapshot_throttle: Arc::new(Mutex::new(Throttle::new(snapshot_cooldown))),
            alert,
            snapshots,
        }
    }

    pub fn state(&self) -> Arc<Mutex<PipelineState>> {
        Arc::clone(&self.state)
    }

    pub fn surface(&self) -> Arc<Mutex<OverlaySurface>> {
        Arc::clone(&self.surface)
    }

    pub fn alert_throttle(&self) -> Arc<Mutex<Throttle>> {
        Arc::clone(&self.alert_throttle)
    }

    pub fn snapshot_throttle(&self) -> Arc<Mutex<Throttle>> {
        Arc::clone(&self.snapshot_throttle)
    }

    /// Run one sampling tick.
    ///
    /// Nothing here is fatal: acquisition failures retry next tick,
    /// inference failures count as zero detections, and side-effect
    /// failures are logged and dropped.
    pub fn tick(&mut self, now: Instant, wall: SystemTime) {
        self.poll_model();

        if !self.state.lock().unwrap().is_active() {
            return;
        }

        let frame = match self.source.acquire() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::debug!("no frame available this tick");
                return;
            }
            Err(e) => {
                log::warn!("frame acquisition failed: {e}");
                self.state.lock().unwrap().set_status(STATUS_NO_SIGNAL);
                return;
            }
        };

        let DetectorSlot::Ready(detector) = &mut self.detector else {
            return;
        };
        let detections = match detector.detect(&frame) {
            Ok(detections) => detections,
            Err(e) => {
                log::warn!("inference failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };

        // The pipeline may have been paused while inference ran; a stale
        // result must not repaint the overlay or the count.
        let count = {
            let mut state = self.state.lock().unwrap();
            if !state.is_active() {
                log::debug!(
                    "discarding detections from frame {}: no longer active",
                    frame.index()
                );
                return;
            }
            let mut surface = self.surface.lock().unwrap();
            let count =
                self.renderer
                    .render(&mut surface, frame.width(), frame.height(), &detections);
            state.record_count(count);
            state.set_status(STATUS_ACTIVE);
            count
        };

        if count == 0 {
            return;
        }

        if self.alert_throttle.lock().unwrap().try_fire(now) {
            if let Err(e) = self.alert.play() {
                log::warn!("alert cue failed: {e}");
            }
        }
        if self.snapshot_throttle.lock().unwrap().try_fire(now) {
            self.persist(&frame, wall);
        }
    }

    /// Capture a snapshot on demand, outside the periodic cycle.
    ///
    /// Bypasses the snapshot throttle's interval check but records a fire,
    /// so the next periodic capture still waits a full cooldown.
    pub fn snapshot_now(&mut self, now: Instant, wall: SystemTime) {
        let frame = match self.source.acquire() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::warn!("manual snapshot skipped: no frame available");
                return;
            }
            Err(e) => {
                log::warn!("manual snapshot failed to acquire a frame: {e}");
                return;
            }
        };
        self.snapshot_throttle.lock().unwrap().force_fire(now);
        self.persist(&frame, wall);
    }

    fn poll_model(&mut self) {
        if let DetectorSlot::Loading(rx) = &self.detector {
            match rx.try_recv() {
                Ok(Ok(detector)) => {
                    log::info!("detection model ready");
                    self.detector = DetectorSlot::Ready(detector);
                    self.state.lock().unwrap().model_ready();
                }
                Ok(Err(e)) => {
                    log::error!("model load failed: {e}");
                    self.detector = DetectorSlot::Failed;
                    self.state.lock().unwrap().model_failed();
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::error!("model loader exited without a result");
                    self.detector = DetectorSlot::Failed;
                    self.state.lock().unwrap().model_failed();
                }
            }
        }
    }

    fn persist(&self, frame: &Frame, wall: SystemTime) {
        let name = snapshot_name(self.renderer.target_label(), wall);
        match self.snapshots.save(frame, &name) {
            Ok(path) => log::info!("snapshot saved to {}", path.display()),
            Err(e) => log::warn!("snapshot save failed: {e}"),
        }
    }
}
