use arrestick::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders pipeline stages as a single spinner line on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new_spinner()
            .with_style(Self::spinner_style())
            .with_message("Starting...");
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::StageStart { stage } if stage.is_terminal() => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_and_clear();
                }
                Progress::StageStart { stage } => {
                    if pb_guard.is_finished() {
                        pb_guard.reset();
                        pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    }
                    pb_guard.set_message(stage.name());
                }
                Progress::Retry { attempt, delay } => {
                    pb_guard.set_message(format!(
                        "Retrying in {:.1}s (attempt {})",
                        delay.as_secs_f64(),
                        attempt + 1
                    ));
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    /// Clears the spinner, whether or not the pipeline reached a terminal stage.
    pub fn finish(&self) {
        if let Ok(pb) = self.pb.lock() {
            pb.disable_steady_tick();
            pb.finish_and_clear();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
