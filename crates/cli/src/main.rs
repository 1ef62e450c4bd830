use std::io::BufRead;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use sentrycam_core::alert::domain::alert_sink::{AlertSink, NullAlertSink};
use sentrycam_core::alert::infrastructure::rodio_alert_sink::RodioAlertSink;
use sentrycam_core::detection::infrastructure::model_loader::{self, ModelLoadRequest};
use sentrycam_core::pipeline::session::{DetectionSession, SessionHandle};
use sentrycam_core::pipeline::watch_use_case::{DetectorSlot, WatchFeedUseCase};
use sentrycam_core::shared::constants::{
    ALERT_COOLDOWN_MS, COCO_MODEL_NAME, COCO_MODEL_URL, DEFAULT_CONFIDENCE, SNAPSHOT_COOLDOWN_MS,
    TARGET_LABEL, TICK_INTERVAL_MS,
};
use sentrycam_core::snapshot::infrastructure::png_snapshot_writer::PngSnapshotWriter;
use sentrycam_core::video::infrastructure::ffmpeg_frame_source::FfmpegFrameSource;

/// Watch a video feed and alert when a person is in frame.
#[derive(Parser)]
#[command(name = "sentrycam")]
struct Cli {
    /// Input feed: a video file or anything ffmpeg can open as a URL.
    input: PathBuf,

    /// Object class to watch for.
    #[arg(long, default_value = TARGET_LABEL)]
    label: String,

    /// Detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Sampling period in milliseconds.
    #[arg(long, default_value_t = TICK_INTERVAL_MS)]
    interval_ms: u64,

    /// Minimum gap between audible alerts, in milliseconds.
    #[arg(long, default_value_t = ALERT_COOLDOWN_MS)]
    alert_cooldown_ms: u64,

    /// Minimum gap between automatic snapshots, in milliseconds.
    #[arg(long, default_value_t = SNAPSHOT_COOLDOWN_MS)]
    snapshot_cooldown_ms: u64,

    /// Directory for captured snapshots.
    #[arg(long, default_value = "snapshots")]
    snapshot_dir: PathBuf,

    /// Audio file to play when the watched class appears. Silent if omitted.
    #[arg(long)]
    alert_sound: Option<PathBuf>,

    /// Restart a file input from the beginning when it ends.
    #[arg(long)]
    loop_input: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let alert: Box<dyn AlertSink> = match &cli.alert_sound {
        Some(path) => Box::new(RodioAlertSink::from_file(path)?),
        None => Box::new(NullAlertSink),
    };

    let detector = DetectorSlot::Loading(model_loader::spawn_load(ModelLoadRequest {
        name: COCO_MODEL_NAME.to_string(),
        url: COCO_MODEL_URL.to_string(),
        bundled_dir: None,
        confidence: cli.confidence,
    }));

    let use_case = WatchFeedUseCase::new(
        Box::new(FfmpegFrameSource::new(&cli.input, cli.loop_input)),
        detector,
        cli.label.clone(),
        alert,
        Box::new(PngSnapshotWriter::new(&cli.snapshot_dir)),
        Duration::from_millis(cli.alert_cooldown_ms),
        Duration::from_millis(cli.snapshot_cooldown_ms),
    );

    let handle = DetectionSession::spawn(use_case, Duration::from_millis(cli.interval_ms));

    let running = Arc::new(AtomicBool::new(true));
    let running_in_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_in_handler.store(false, Ordering::SeqCst);
    })?;

    let keys = spawn_key_reader();

    eprintln!("Watching {} for \"{}\"", cli.input.display(), cli.label);
    eprintln!("Commands: p = pause/resume, s = snapshot, q = quit");

    let mut last_status = String::new();
    let mut last_count = 0usize;
    while running.load(Ordering::SeqCst) {
        match keys.recv_timeout(Duration::from_millis(250)) {
            Ok(Key::Toggle) => {
                let phase = handle.toggle();
                log::info!("detection toggled: {phase:?}");
            }
            Ok(Key::Snapshot) => handle.snapshot_now(),
            Ok(Key::Quit) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
        }
        report(&handle, &mut last_status, &mut last_count);
    }

    handle.shutdown();
    Ok(())
}

fn report(handle: &SessionHandle, last_status: &mut String, last_count: &mut usize) {
    let status = handle.status_text();
    let count = handle.detection_count();
    if status != *last_status || count != *last_count {
        eprintln!("{status} ({count} in frame)");
        *last_status = status;
        *last_count = count;
    }
}

enum Key {
    Toggle,
    Snapshot,
    Quit,
}

/// Line-based control on stdin; the reader thread exits with the process.
fn spawn_key_reader() -> crossbeam_channel::Receiver<Key> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let key = match line.trim() {
                "p" => Key::Toggle,
                "s" => Key::Snapshot,
                "q" => Key::Quit,
                _ => continue,
            };
            if tx.send(key).is_err() {
                break;
            }
        }
    });
    rx
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let looks_like_url = cli.input.to_string_lossy().contains("://");
    if !looks_like_url && !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.interval_ms == 0 {
        return Err("Sampling interval must be positive".into());
    }
    if let Some(sound) = &cli.alert_sound {
        if !sound.exists() {
            return Err(format!("Alert sound not found: {}", sound.display()).into());
        }
    }
    Ok(())
}
