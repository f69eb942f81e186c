//! Progress indication for listings and transfers

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::OutputConfig;

/// Progress display that stays silent in quiet, JSON and no-progress modes
#[derive(Debug)]
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Counter over `total` items, e.g. files being uploaded
    pub fn items(config: &OutputConfig, total: u64, message: &str) -> Self {
        if !Self::visible(config) {
            return Self { bar: None };
        }
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    /// Spinner for work of unknown length, e.g. paginated listings
    pub fn spinner(config: &OutputConfig, message: &str) -> Self {
        if !Self::visible(config) {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    fn visible(config: &OutputConfig) -> bool {
        !(config.quiet || config.json || config.no_progress)
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Advance by one item, showing `message` as the current item
    pub fn advance(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
            bar.inc(1);
        }
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_in_json_mode() {
        let config = OutputConfig {
            json: true,
            ..Default::default()
        };
        assert!(!Progress::items(&config, 10, "upload").is_visible());
        assert!(!Progress::spinner(&config, "listing").is_visible());
    }

    #[test]
    fn test_hidden_when_disabled() {
        let config = OutputConfig {
            no_progress: true,
            ..Default::default()
        };
        let progress = Progress::items(&config, 3, "upload");
        assert!(!progress.is_visible());
        // No-ops without a bar
        progress.advance("a.txt");
        progress.finish();
    }

    #[test]
    fn test_visible_by_default() {
        let progress = Progress::items(&OutputConfig::default(), 2, "upload");
        assert!(progress.is_visible());
        progress.finish();
    }
}
