//! Indicatif-based renderer for live terminal status.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

use super::{ProgressItem, StatusRenderer};

const TICK: Duration = Duration::from_millis(120);

struct TrackedBar {
    bar: ProgressBar,
    line: String,
    done: bool,
}

/// Renderer drawing one spinner line per item.
///
/// Pending items spin; done items show `✅ text`, or just the text when the
/// item hides its checkmark.
pub struct ConsoleRenderer {
    multi: MultiProgress,
    bars: HashMap<String, TrackedBar>,
}

impl ConsoleRenderer {
    /// Create a new renderer drawing to stderr
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: HashMap::new(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn done_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn line_for(item: &ProgressItem) -> String {
        if item.done && !item.hide_checkmark {
            format!("✅ {}", item.text)
        } else {
            item.text.clone()
        }
    }

    fn new_bar(&self, done: bool) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new_spinner());
        if done {
            bar.set_style(Self::done_style());
        } else {
            bar.set_style(Self::spinner_style());
            bar.enable_steady_tick(TICK);
        }
        bar
    }

    fn draw(&mut self, item: &ProgressItem) {
        let line = Self::line_for(item);

        if let Some(tracked) = self.bars.get_mut(&item.key) {
            if tracked.line == line && tracked.done == item.done {
                return;
            }
            if !tracked.done && !item.done {
                tracked.bar.set_message(line.clone());
                tracked.line = line;
                return;
            }
            if !tracked.done && item.done {
                tracked.bar.set_style(Self::done_style());
                tracked.bar.finish_with_message(line.clone());
                tracked.line = line;
                tracked.done = true;
                return;
            }
            // A finished line cannot be redrawn in place; replace it
            let old = tracked.bar.clone();
            self.multi.remove(&old);
        }

        let bar = self.new_bar(item.done);
        if item.done {
            bar.finish_with_message(line.clone());
        } else {
            bar.set_message(line.clone());
        }
        self.bars.insert(
            item.key.clone(),
            TrackedBar {
                bar,
                line,
                done: item.done,
            },
        );
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRenderer for ConsoleRenderer {
    fn render(&mut self, items: &[ProgressItem]) {
        for item in items {
            self.draw(item);
        }
    }

    fn finish(&mut self, items: &[ProgressItem]) {
        self.render(items);
        for (_, tracked) in self.bars.drain() {
            if !tracked.bar.is_finished() {
                tracked.bar.finish();
            }
        }
    }
}
