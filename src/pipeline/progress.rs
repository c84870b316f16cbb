// file: src/pipeline/progress.rs
// description: progress reporting for the embedding loop during ingestion
// reference: uses indicatif for progress bars

use indicatif::{ProgressBar, ProgressStyle};

pub struct EmbeddingProgress {
    bar: ProgressBar,
}

impl EmbeddingProgress {
    pub fn new(total_fragments: usize) -> Self {
        Self::with_color(total_fragments, true)
    }

    pub fn with_color(total_fragments: usize, colored: bool) -> Self {
        let bar = ProgressBar::new(total_fragments as u64);

        if colored {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                    )
                    .expect("Failed to create progress bar template")
                    .progress_chars("█▓▒░"),
            );
        } else {
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}")
                    .expect("Failed to create progress bar template")
                    .progress_chars("=>-"),
            );
        }

        Self { bar }
    }

    pub fn embedded(&self, source: &str, page: u32) {
        self.bar.set_message(format!("{} p.{}", source, page));
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Embedding complete");
    }
}

impl Drop for EmbeddingProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
