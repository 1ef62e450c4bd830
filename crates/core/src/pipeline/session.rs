use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant, SystemTime};

use crossbeam_channel::{unbounded, Sender};

use crate::overlay::surface::OverlaySurface;
use crate::pipeline::pipeline_state::{DetectionPhase, PipelineState};

use super::watch_use_case::WatchFeedUseCase;

enum SessionCommand {
    Snapshot,
    Shutdown,
}

/// Runs a `WatchFeedUseCase` on its own sampling thread.
pub struct DetectionSession;

impl DetectionSession {
    /// Start the sampling loop with the given period.
    ///
    /// The tick channel holds at most one pending tick; if a tick's work
    /// overruns the period, missed ticks are dropped rather than queued.
    pub fn spawn(mut use_case: WatchFeedUseCase, period: Duration) -> SessionHandle {
        let state = use_case.state();
        let surface = use_case.surface();
        let (commands, command_rx) = unbounded();
        let ticker = crossbeam_channel::tick(period);

        let join = std::thread::spawn(move || loop {
            crossbeam_channel::select! {
                recv(ticker) -> _ => {
                    use_case.tick(Instant::now(), SystemTime::now());
                }
                recv(command_rx) -> msg => match msg {
                    Ok(SessionCommand::Snapshot) => {
                        use_case.snapshot_now(Instant::now(), SystemTime::now());
                    }
                    Ok(SessionCommand::Shutdown) | Err(_) => break,
                },
            }
        });

        SessionHandle {
            state,
            surface,
            commands,
            join: Some(join),
        }
    }
}

/// Control surface for a running session.
///
/// Pause and resume act on the shared state directly rather than going
/// through the sampling thread, so they take effect immediately even if a
/// tick is mid-flight; the tick discards its result when it completes.
pub struct SessionHandle {
    state: Arc<Mutex<PipelineState>>,
    surface: Arc<Mutex<OverlaySurface>>,
    commands: Sender<SessionCommand>,
    join: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub fn phase(&self) -> DetectionPhase {
        self.state.lock().unwrap().phase()
    }

    pub fn detection_count(&self) -> usize {
        self.state.lock().unwrap().last_detection_count()
    }

    pub fn status_text(&self) -> String {
        self.state.lock().unwrap().status_text().to_string()
    }

    /// Copy of the current overlay, for display.
    pub fn overlay(&self) -> OverlaySurface {
        self.surface.lock().unwrap().clone()
    }

    /// Flip between `Active` and `Paused`; ignored while the model loads.
    /// Entering `Paused` zeroes the count and clears the overlay before
    /// returning. Returns the phase after the toggle.
    pub fn toggle(&self) -> DetectionPhase {
        // Lock order (state, then surface) matches the sampling thread
        let mut state = self.state.lock().unwrap();
        let phase = state.toggle();
        if phase == DetectionPhase::Paused {
            self.surface.lock().unwrap().clear();
        }
        phase
    }

    pub fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        if state.is_active() {
            state.pause();
            self.surface.lock().unwrap().clear();
        }
    }

    pub fn resume(&self) {
        self.state.lock().unwrap().resume();
    }

    /// Request an immediate snapshot from the sampling thread.
    pub fn snapshot_now(&self) {
        if self.commands.send(SessionCommand::Snapshot).is_err() {
            log::warn!("snapshot request dropped: session is gone");
        }
    }

    /// Stop the sampling loop and wait for the thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.commands.send(SessionCommand::Shutdown);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::error!("sampling thread panicked");
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::domain::alert_sink::AlertSink;
    use crate::detection::domain::detection::{BoundingBox, Detection};
    use crate::detection::domain::object_detector::ObjectDetector;
    use crate::pipeline::watch_use_case::DetectorSlot;
    use crate::shared::frame::Frame;
    use crate::snapshot::domain::snapshot_writer::SnapshotWriter;
    use crate::video::domain::frame_source::FrameSource;
    use std::path::PathBuf;

    struct EndlessSource;

    impl FrameSource for EndlessSource {
        fn acquire(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            Ok(Some(Frame::new(vec![0u8; 64 * 48 * 3], 64, 48, 0)))
        }

        fn dimensions(&self) -> Option<(u32, u32)> {
            Some((64, 48))
        }
    }

    struct OnePersonDetector;

    impl ObjectDetector for OnePersonDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Ok(vec![Detection::new(
                "person",
                0.9,
                BoundingBox::new(10.0, 35.0, 20.0, 10.0),
            )])
        }
    }

    struct CountingAlert {
        plays: Arc<Mutex<usize>>,
    }

    impl AlertSink for CountingAlert {
        fn play(&self) -> Result<(), Box<dyn std::error::Error>> {
            *self.plays.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct CountingSnapshots {
        saves: Arc<Mutex<usize>>,
    }

    impl SnapshotWriter for CountingSnapshots {
        fn save(&self, _frame: &Frame, name: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
            *self.saves.lock().unwrap() += 1;
            Ok(PathBuf::from(name))
        }
    }

    fn spawn_session() -> (SessionHandle, Arc<Mutex<usize>>, Arc<Mutex<usize>>) {
        let plays = Arc::new(Mutex::new(0));
        let saves = Arc::new(Mutex::new(0));
        let use_case = WatchFeedUseCase::new(
            Box::new(EndlessSource),
            DetectorSlot::Ready(Box::new(OnePersonDetector)),
            "person",
            Box::new(CountingAlert {
                plays: Arc::clone(&plays),
            }),
            Box::new(CountingSnapshots {
                saves: Arc::clone(&saves),
            }),
            Duration::from_secs(3600),
            Duration::from_secs(3600),
        );
        let handle = DetectionSession::spawn(use_case, Duration::from_millis(10));
        (handle, plays, saves)
    }

    fn wait_for(mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("condition not met within 5s");
    }

    #[test]
    fn test_session_ticks_and_fires_effects_once() {
        let (handle, plays, saves) = spawn_session();
        wait_for(|| handle.detection_count() == 1);
        // Long cooldowns: repeated detections, single fire each
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(*plays.lock().unwrap(), 1);
        assert_eq!(*saves.lock().unwrap(), 1);
        handle.shutdown();
    }

    #[test]
    fn test_toggle_pauses_immediately_and_resumes() {
        let (handle, plays, saves) = spawn_session();
        wait_for(|| handle.detection_count() == 1);

        assert_eq!(handle.toggle(), DetectionPhase::Paused);
        // Synchronous effects of entering Paused
        assert_eq!(handle.detection_count(), 0);
        assert!(handle.overlay().is_blank());
        assert_eq!(handle.phase(), DetectionPhase::Paused);

        assert_eq!(handle.toggle(), DetectionPhase::Active);
        wait_for(|| handle.detection_count() == 1);
        // The round-trip did not hand the throttles a fresh window
        assert_eq!(*plays.lock().unwrap(), 1);
        assert_eq!(*saves.lock().unwrap(), 1);
        handle.shutdown();
    }

    #[test]
    fn test_paused_session_stays_quiet() {
        let (handle, _plays, saves) = spawn_session();
        wait_for(|| handle.detection_count() == 1);
        handle.pause();
        let saved_before = *saves.lock().unwrap();
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(handle.detection_count(), 0);
        assert_eq!(*saves.lock().unwrap(), saved_before);
        handle.shutdown();
    }

    #[test]
    fn test_manual_snapshot_command() {
        let (handle, _plays, saves) = spawn_session();
        wait_for(|| *saves.lock().unwrap() == 1);
        handle.snapshot_now();
        wait_for(|| *saves.lock().unwrap() == 2);
        handle.shutdown();
    }

    #[test]
    fn test_drop_stops_the_thread() {
        let (handle, _plays, _saves) = spawn_session();
        drop(handle); // must not hang
    }
}
