use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use ljcluster::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

const SPINNER_TICK_MS: u64 = 80;

/// The integration bar advances in thousandths of `total_t`.
const TIME_TICKS: u64 = 1000;

/// What the integration bar measures against, fixed at `TaskStart`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RunScale {
    total_time: f64,
    initial_energy: f64,
}

#[derive(Debug, Default)]
struct DisplayState {
    phase: &'static str,
    scale: Option<RunScale>,
}

/// Renders workflow progress on stderr: a spinner per phase and, while
/// integrating, a bar over simulated time annotated with the energy drift.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
    state: Arc<Mutex<DisplayState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::new(0).with_style(spinner_style());
        bar.set_draw_target(target);
        Self {
            bar,
            state: Arc::default(),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let handler = self.clone();
        Box::new(move |event| handler.handle(event))
    }

    fn handle(&self, event: Progress) {
        let Ok(mut state) = self.state.lock() else {
            warn!("Progress display state was poisoned. Cannot update progress.");
            return;
        };

        match event {
            Progress::PhaseStart { name } => {
                state.phase = name;
                state.scale = None;
                self.bar.reset();
                self.bar.set_style(spinner_style());
                self.bar
                    .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                self.bar.set_message(name);
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar.finish_with_message(format!("✓ {}", state.phase));
            }
            Progress::TaskStart {
                total_steps,
                total_time,
                initial_energy,
            } => {
                state.scale = Some(RunScale {
                    total_time,
                    initial_energy,
                });
                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_length(TIME_TICKS);
                self.bar.set_style(bar_style());
                self.bar
                    .set_message(format!("{total_steps} steps to t = {total_time}"));
            }
            Progress::StepFinished {
                step,
                time,
                total_energy,
            } => match state.scale {
                Some(scale) => {
                    self.bar.set_position(time_ticks(time, scale.total_time));
                    self.bar.set_message(step_message(time, total_energy, scale));
                }
                None => self.bar.set_message(format!("step {step}, t {time:.3}")),
            },
            Progress::TaskFinish => self.bar.finish(),
            Progress::Message(msg) => {
                info!("{}", msg);
                if self.bar.is_finished() {
                    self.bar.set_message(msg);
                } else {
                    self.bar.println(format!("  {msg}"));
                }
            }
        }
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Relative drift `(E − E₀)/|E₀|`; the absolute change when `E₀` is zero.
pub fn energy_drift(current: f64, initial: f64) -> f64 {
    let change = current - initial;
    if initial == 0.0 {
        change
    } else {
        change / initial.abs()
    }
}

fn time_ticks(time: f64, total_time: f64) -> u64 {
    if total_time <= 0.0 {
        return TIME_TICKS;
    }
    ((time / total_time).clamp(0.0, 1.0) * TIME_TICKS as f64).round() as u64
}

fn step_message(time: f64, total_energy: f64, scale: RunScale) -> String {
    format!(
        "t {time:.3}/{:.3}  ΔE/E₀ {:+.2e}",
        scale.total_time,
        energy_drift(total_energy, scale.initial_energy)
    )
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("Failed to create spinner style template")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<32} [{bar:40.cyan/blue}] {percent:>3}% ({elapsed})")
        .expect("Failed to create bar style template")
        .progress_chars("##-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const TOLERANCE: f64 = 1e-12;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn start_integration(callback: &ProgressCallback<'static>) {
        callback(Progress::PhaseStart { name: "Integrating" });
        callback(Progress::TaskStart {
            total_steps: 3,
            total_time: 0.03,
            initial_energy: -1.0,
        });
    }

    #[test]
    fn energy_drift_is_relative_to_magnitude_of_initial_energy() {
        assert!((energy_drift(-0.99, -1.0) - 0.01).abs() < TOLERANCE);
        assert!((energy_drift(1.5, 2.0) + 0.25).abs() < TOLERANCE);
        assert_eq!(energy_drift(0.5, 0.0), 0.5);
        assert_eq!(energy_drift(-1.0, -1.0), 0.0);
    }

    #[test]
    fn time_ticks_clamp_to_the_run_length() {
        assert_eq!(time_ticks(0.02, 0.04), 500);
        assert_eq!(time_ticks(0.05, 0.04), TIME_TICKS);
        assert_eq!(time_ticks(0.0, 0.04), 0);
        assert_eq!(time_ticks(0.0, 0.0), TIME_TICKS);
    }

    #[test]
    fn integration_bar_follows_simulated_time_and_drift() {
        let handler = hidden_handler();
        let callback = handler.get_callback();
        start_integration(&callback);
        assert_eq!(handler.bar.length(), Some(TIME_TICKS));
        assert_eq!(handler.bar.position(), 0);
        assert_eq!(handler.bar.message(), "3 steps to t = 0.03");

        callback(Progress::StepFinished {
            step: 1,
            time: 0.01,
            total_energy: -0.99,
        });
        assert_eq!(handler.bar.position(), 333);
        assert_eq!(handler.bar.message(), "t 0.010/0.030  ΔE/E₀ +1.00e-2");

        callback(Progress::StepFinished {
            step: 3,
            time: 0.03,
            total_energy: -1.0,
        });
        assert_eq!(handler.bar.position(), TIME_TICKS);
        assert_eq!(handler.bar.message(), "t 0.030/0.030  ΔE/E₀ +0.00e0");
    }

    #[test]
    fn task_finish_keeps_the_last_reported_time() {
        let handler = hidden_handler();
        let callback = handler.get_callback();
        start_integration(&callback);
        callback(Progress::StepFinished {
            step: 1,
            time: 0.015,
            total_energy: -1.0,
        });

        callback(Progress::TaskFinish);

        assert!(handler.bar.is_finished());
        assert_eq!(handler.bar.position(), 500);
    }

    #[test]
    fn step_without_task_start_only_labels_the_spinner() {
        let handler = hidden_handler();
        let callback = handler.get_callback();
        callback(Progress::PhaseStart { name: "Integrating" });

        callback(Progress::StepFinished {
            step: 7,
            time: 0.07,
            total_energy: -1.0,
        });

        assert_eq!(handler.bar.position(), 0);
        assert_eq!(handler.bar.message(), "step 7, t 0.070");
    }

    #[test]
    fn new_phase_forgets_the_previous_run_scale() {
        let handler = hidden_handler();
        let callback = handler.get_callback();
        start_integration(&callback);
        callback(Progress::PhaseFinish);

        callback(Progress::PhaseStart { name: "Finalizing" });

        assert!(!handler.bar.is_finished());
        assert_eq!(handler.bar.message(), "Finalizing");
        assert!(handler.state.lock().unwrap().scale.is_none());
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Building" });
            callback(Progress::Message("Clusters built.".to_string()));
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(handler.bar.is_finished());
        assert_eq!(handler.bar.message(), "✓ Building");
    }
}
