//! Progress bar for merges.
//!
//! Advances once per merged file.
//!
//! # Examples
//!
//! ```
//! use pdfmerge::output::progress::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(3, ProgressStyle::Bar);
//! progress.set_message("Merging");
//!
//! for _ in 0..3 {
//!     progress.increment();
//! }
//!
//! progress.finish();
//! ```

use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ]
    Bar,
    /// Simple counter: 2/5
    Counter,
}

/// Progress bar for visual feedback during a merge.
pub struct ProgressBar {
    total: usize,
    current: usize,
    style: ProgressStyle,
    message: Option<String>,
    start_time: Instant,
    /// Whether anything is drawn.
    enabled: bool,
}

impl ProgressBar {
    /// Create a new progress bar, drawn only when stdout is a terminal.
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            style,
            message: None,
            start_time: Instant::now(),
            enabled: Self::is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new(0, ProgressStyle::Counter);
        pb.enabled = false;
        pb
    }

    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// Set the message to display with the progress bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Update the progress bar to a specific value.
    pub fn update(&mut self, current: usize) {
        self.current = current;
        self.render();
    }

    /// Increment the progress bar by one.
    pub fn increment(&mut self) {
        self.update(self.current + 1);
    }

    /// Mark the progress bar as finished.
    pub fn finish(&mut self) {
        if self.enabled {
            self.current = self.total;
            self.render();
            println!();
        }
    }

    /// Clear the progress bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }

        let output = match self.style {
            ProgressStyle::Bar => self.render_bar(),
            ProgressStyle::Counter => self.render_counter(),
        };

        print!("\r{output}");
        io::stdout().flush().ok();
    }

    fn render_bar(&self) -> String {
        let width = 30;
        let filled = (width * self.current) / self.total.max(1);
        let empty = width - filled.min(width);

        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.saturating_sub(1)) + if filled > 0 { ">" } else { "" },
            " ".repeat(empty)
        );

        let mut parts = vec![
            bar,
            format!("{:.0}%", self.percent()),
            format!("{}/{}", self.current, self.total),
            format_duration(self.start_time.elapsed()),
        ];

        if let Some(ref msg) = self.message {
            parts.insert(0, msg.clone());
        }

        parts.join(" ")
    }

    fn render_counter(&self) -> String {
        let mut parts = vec![
            format!("{}/{}", self.current, self.total),
            format_duration(self.start_time.elapsed()),
        ];

        if let Some(ref msg) = self.message {
            parts.insert(0, msg.clone());
        }

        parts.join(" ")
    }

    /// Get the current progress percentage.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Get the elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
