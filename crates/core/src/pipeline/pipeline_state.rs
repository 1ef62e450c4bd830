/// Lifecycle of the detection loop.
///
/// `ModelLoading` is entered once at startup and left exactly once, when
/// the detector finishes initializing. After that the pipeline moves only
/// between `Active` and `Paused`, and only via an explicit toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionPhase {
    ModelLoading,
    Active,
    Paused,
}

pub const STATUS_LOADING: &str = "Loading detection model...";
pub const STATUS_ACTIVE: &str = "Actively detecting...";
pub const STATUS_PAUSED: &str = "Detection paused";
pub const STATUS_MODEL_FAILED: &str = "Detection model failed to load";
pub const STATUS_NO_SIGNAL: &str = "Camera signal lost, retrying...";

/// Shared pipeline state: phase, the most recent matching-detection count,
/// and a user-facing status line.
///
/// Held behind a mutex by the session; all mutation goes through these
/// methods so the phase invariants hold no matter which thread calls.
#[derive(Clone, Debug)]
pub struct PipelineState {
    phase: DetectionPhase,
    last_detection_count: usize,
    status_text: String,
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            phase: DetectionPhase::ModelLoading,
            last_detection_count: 0,
            status_text: STATUS_LOADING.to_string(),
        }
    }

    pub fn phase(&self) -> DetectionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == DetectionPhase::Active
    }

    pub fn last_detection_count(&self) -> usize {
        self.last_detection_count
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn set_status(&mut self, text: &str) {
        self.status_text = text.to_string();
    }

    /// Detector finished initializing. Only meaningful in `ModelLoading`;
    /// later calls are ignored, so the transition happens at most once.
    pub fn model_ready(&mut self) {
        if self.phase == DetectionPhase::ModelLoading {
            self.phase = DetectionPhase::Active;
            self.status_text = STATUS_ACTIVE.to_string();
        }
    }

    /// Detector initialization failed. The pipeline stays out of `Active`
    /// permanently; sampling keeps running but performs no inference.
    pub fn model_failed(&mut self) {
        if self.phase == DetectionPhase::ModelLoading {
            self.status_text = STATUS_MODEL_FAILED.to_string();
        }
    }

    /// Record the matching-detection count for a completed tick.
    pub fn record_count(&mut self, count: usize) {
        self.last_detection_count = count;
    }

    pub fn pause(&mut self) {
        if self.phase == DetectionPhase::Active {
            self.phase = DetectionPhase::Paused;
            self.last_detection_count = 0;
            self.status_text = STATUS_PAUSED.to_string();
        }
    }

    pub fn resume(&mut self) {
        if self.phase == DetectionPhase::Paused {
            self.phase = DetectionPhase::Active;
            self.status_text = STATUS_ACTIVE.to_string();
        }
    }

    /// Flip between `Active` and `Paused`. A no-op during `ModelLoading`.
    /// Returns the phase after the toggle.
    pub fn toggle(&mut self) -> DetectionPhase {
        match self.phase {
            DetectionPhase::Active => self.pause(),
            DetectionPhase::Paused => self.resume(),
            DetectionPhase::ModelLoading => {
                log::debug!("toggle ignored while the model is still loading");
            }
        }
        self.phase
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_loading_with_zero_count() {
        let state = PipelineState::new();
        assert_eq!(state.phase(), DetectionPhase::ModelLoading);
        assert_eq!(state.last_detection_count(), 0);
        assert_eq!(state.status_text(), STATUS_LOADING);
        assert!(!state.is_active());
    }

    #[test]
    fn test_model_ready_activates_once() {
        let mut state = PipelineState::new();
        state.model_ready();
        assert_eq!(state.phase(), DetectionPhase::Active);
        assert_eq!(state.status_text(), STATUS_ACTIVE);

        // A duplicate delivery must not disturb a paused pipeline
        state.pause();
        state.model_ready();
        assert_eq!(state.phase(), DetectionPhase::Paused);
    }

    #[test]
    fn test_pause_zeroes_count() {
        let mut state = PipelineState::new();
        state.model_ready();
        state.record_count(3);
        state.pause();
        assert_eq!(state.phase(), DetectionPhase::Paused);
        assert_eq!(state.last_detection_count(), 0);
        assert_eq!(state.status_text(), STATUS_PAUSED);
    }

    #[test]
    fn test_resume_only_from_paused() {
        let mut state = PipelineState::new();
        state.resume();
        assert_eq!(state.phase(), DetectionPhase::ModelLoading);

        state.model_ready();
        state.pause();
        state.resume();
        assert_eq!(state.phase(), DetectionPhase::Active);
    }

    #[test]
    fn test_toggle_cycles_active_and_paused() {
        let mut state = PipelineState::new();
        state.model_ready();
        assert_eq!(state.toggle(), DetectionPhase::Paused);
        assert_eq!(state.toggle(), DetectionPhase::Active);
    }

    #[test]
    fn test_toggle_ignored_while_loading() {
        let mut state = PipelineState::new();
        assert_eq!(state.toggle(), DetectionPhase::ModelLoading);
    }

    #[test]
    fn test_model_failed_keeps_pipeline_inactive() {
        let mut state = PipelineState::new();
        state.model_failed();
        assert_eq!(state.phase(), DetectionPhase::ModelLoading);
        assert_eq!(state.status_text(), STATUS_MODEL_FAILED);
        assert!(!state.is_active());
    }
}
