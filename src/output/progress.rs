//! Progress line utilities.

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::SourceKind;

/// Create a spinner for long-running operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Status text shown while a source is being crawled.
pub fn progress_message(source: SourceKind, in_queue: usize, downloaded: u64) -> String {
    format!(
        "Crawling {}. {} item(s) in queue, {} items downloaded.",
        source, in_queue, downloaded
    )
}

/// Single status line, rewritten in place. Disabled lines do nothing.
#[derive(Debug, Clone)]
pub struct ProgressLine {
    source: SourceKind,
    bar: Option<ProgressBar>,
}

impl ProgressLine {
    pub fn new(source: SourceKind, enabled: bool) -> Self {
        let bar = enabled.then(|| create_spinner(&progress_message(source, 0, 0)));
        Self { source, bar }
    }

    pub fn update(&self, in_queue: usize, downloaded: u64) {
        if let Some(bar) = &self.bar {
            bar.set_message(progress_message(self.source, in_queue, downloaded));
        }
    }

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
    fn test_progress_message() {
        assert_eq!(
            progress_message(SourceKind::Likes, 3, 12),
            "Crawling likes. 3 item(s) in queue, 12 items downloaded."
        );
    }

    #[test]
    fn test_disabled_line_is_noop() {
        let line = ProgressLine::new(SourceKind::Timeline, false);
        assert!(line.bar.is_none());
        line.update(1, 1);
        line.finish();
    }
}
