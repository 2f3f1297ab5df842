//! Incremental progress output for a running research session

use colored::*;
use folio_core::domain::session::Session;

/// Tracks what has already been printed for a session
#[derive(Debug, Default)]
pub struct ProgressLog {
    activity: String,
    plan_printed: bool,
    current_step: Option<usize>,
    step_results: usize,
    failed_polls: u32,
}

impl ProgressLog {
    /// Lines describing what changed since the previous update
    pub fn update(&mut self, session: &Session) -> Vec<String> {
        let mut lines = Vec::new();

        if !self.plan_printed && !session.plan_steps.is_empty() {
            self.plan_printed = true;
            lines.push(format!("{}", "Plan:".bold()));
            for (i, step) in session.plan_steps.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, step));
            }
        }

        if session.status.is_active()
            && self.plan_printed
            && self.current_step != Some(session.current_step)
        {
            self.current_step = Some(session.current_step);
            if let Some(step) = session.current_plan_step() {
                lines.push(format!(
                    "{} Step {}/{}: {}",
                    "▸".cyan(),
                    session.current_step + 1,
                    session.plan_steps.len(),
                    step
                ));
            }
        }

        for result in session.step_results.iter().skip(self.step_results) {
            lines.push(format!(
                "  {} [{}] step {}: {}",
                "✓".green(),
                result.timestamp.format("%H:%M:%S").to_string().dimmed(),
                result.step + 1,
                result.result
            ));
        }
        self.step_results = session.step_results.len();

        if !session.activity.is_empty() && session.activity != self.activity {
            self.activity = session.activity.clone();
            lines.push(format!(
                "{} {} {}",
                "…".dimmed(),
                session.activity,
                format!("(confidence {:.0}%)", session.confidence * 100.0).dimmed()
            ));
        }

        if session.failed_polls > self.failed_polls {
            self.failed_polls = session.failed_polls;
            if let Some(err) = &session.last_poll_error {
                lines.push(format!("{} {}, retrying", "⚠".yellow(), err).yellow().to_string());
            }
        }

        lines
    }
}
