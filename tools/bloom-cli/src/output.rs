//! Output formatting for the CLI.

use bloom_commerce::checkout::{OrderStatus, StepState};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stderr(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            let body = serde_json::json!({ "error": msg });
            eprintln!("{}", body);
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a step in a process.
    pub fn step(&self, num: usize, total: usize, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style(format!("[{}/{}]", num, total)).dim(), msg);
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print label/amount rows with the amounts right-aligned. The last row
    /// is the total and printed bold.
    pub fn price_rows(&self, rows: &[(String, String)]) {
        if self.json {
            return;
        }
        let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let amount_width = rows.iter().map(|(_, a)| a.chars().count()).max().unwrap_or(0);
        let last = rows.len().saturating_sub(1);
        for (i, (label, amount)) in rows.iter().enumerate() {
            let line = format!(
                "{:<lw$}  {:>aw$}",
                label,
                amount,
                lw = label_width,
                aw = amount_width
            );
            if i == last {
                println!("  {}", style(line).bold());
            } else {
                println!("  {}", line);
            }
        }
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Whether prompts can be shown.
    pub fn is_interactive(&self) -> bool {
        !self.json && self.term.is_term()
    }
}

/// Colored order status.
pub fn status_badge(status: &str) -> String {
    match OrderStatus::from_str(status) {
        Some(OrderStatus::Delivered) => style(status).green().to_string(),
        Some(OrderStatus::Confirmed | OrderStatus::Processing | OrderStatus::Shipped) => {
            style(status).cyan().to_string()
        }
        Some(OrderStatus::Pending) => style(status).yellow().to_string(),
        Some(OrderStatus::Cancelled) => style(status).red().to_string(),
        None => status.to_string(),
    }
}

/// Timeline marker for a tracking step.
pub fn step_marker(state: StepState) -> String {
    match state {
        StepState::Completed => style("●").green().to_string(),
        StepState::Current => style("◉").cyan().to_string(),
        StepState::Upcoming => style("○").dim().to_string(),
    }
}
