//! Progress and log event sink.

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Sink for named log events and per-episode progress updates.
///
/// `MultiProgress` serializes concurrent draws, so the pipeline and its
/// segment tasks can report through a shared reference. With the UI
/// disabled, bars are hidden and log events are routed through tracing.
pub struct Reporter {
    multi: MultiProgress,
    disable_ui: bool,
}

impl Reporter {
    pub fn new(disable_ui: bool) -> Self {
        let multi = MultiProgress::new();
        if disable_ui {
            multi.set_draw_target(ProgressDrawTarget::hidden());
        }

        Self { multi, disable_ui }
    }

    /// Add a percent-scale progress task for one episode file.
    pub fn add_task(&self, label: &str) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}%")
                .unwrap()
                .progress_chars("#>-"),
        );
        bar.set_message(label.to_string());
        bar
    }

    /// Record completion progress as a 0-100 percentage.
    pub fn update_percent(&self, task: &ProgressBar, percent: f64) {
        task.set_position(percent.clamp(0.0, 100.0).round() as u64);
    }

    /// Complete a progress task.
    pub fn finish_task(&self, task: &ProgressBar) {
        task.finish();
    }

    /// Emit a named log event.
    pub fn log(&self, category: &str, message: &str) {
        if self.disable_ui {
            tracing::warn!("{}: {}", category, message);
        } else {
            let line = format!("{} {}", style(category).yellow().bold(), message);
            let _ = self.multi.println(line);
        }
    }
}
