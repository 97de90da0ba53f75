//! Console progress output for the sink
//!
//! Progress lines go to stdout (or through the progress bar when one is
//! shown) and to the tracing log. Nothing downstream parses them.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::constants::progress;

/// Where the sink's human-readable output goes
#[derive(Debug)]
pub struct ProgressReporter {
    console: bool,
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Reporter printing to stdout when `console` is set, with an optional bar
    pub fn new(total: u64, console: bool, show_bar: bool) -> Self {
        let bar = if console && show_bar {
            let bar = ProgressBar::new(total);
            match ProgressStyle::default_bar().template(progress::BAR_TEMPLATE) {
                Ok(style) => bar.set_style(style.progress_chars("##-")),
                Err(e) => tracing::debug!("Invalid progress bar template: {}", e),
            }
            Some(bar)
        } else {
            None
        };
        Self { console, bar }
    }

    /// Emit one human-readable line
    pub fn line(&self, message: &str) {
        info!("{}", message);
        if !self.console {
            return;
        }
        match &self.bar {
            Some(bar) => bar.println(message),
            None => println!("{}", message),
        }
    }

    /// Advance the bar by one result
    pub fn tick(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Remove the bar before the summary is printed
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
