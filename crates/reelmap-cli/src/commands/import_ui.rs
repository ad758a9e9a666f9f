use indicatif::{ProgressBar, ProgressStyle};
use reelmap_core::ProgressObserver;
use reelmap_models::ProcessingProgress;
use std::io::IsTerminal;

/// Progress bar for the enrichment run. Falls back to structured log lines
/// when not attached to a terminal.
pub struct ImportUI {
    bar: ProgressBar,
    interactive: bool,
}

impl ImportUI {
    pub fn new(total: usize, quiet: bool) -> Self {
        let interactive = is_interactive() && !quiet;
        let bar = if interactive {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        bar.set_message("Looking up movies on TMDB...");

        if !interactive {
            tracing::info!(
                operation = "ui_init",
                mode = "non_interactive",
                "Running in non-interactive mode - progress bar disabled, using structured logging"
            );
        }

        Self { bar, interactive }
    }

    pub fn finish(&self, msg: &str) {
        self.bar.finish_with_message(msg.to_string());
    }

    pub fn abandon(&self, msg: &str) {
        self.bar.abandon_with_message(msg.to_string());
    }
}

impl ProgressObserver for ImportUI {
    fn on_progress(&mut self, progress: &ProcessingProgress) {
        if self.interactive {
            self.bar.set_position(progress.processed as u64);
            self.bar.set_message(progress.current_movie.clone());
        } else if progress.is_complete() || progress.processed % 25 == 0 {
            tracing::info!(
                operation = "progress",
                current = progress.processed,
                total = progress.total,
                movie = %progress.current_movie,
                "Enrichment progress update"
            );
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
