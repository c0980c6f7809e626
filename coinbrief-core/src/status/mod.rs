//! Live status reporting.
//!
//! [`Printer`] keeps an ordered set of progress items keyed by a stable
//! identifier. Every mutation is a full overwrite of one item followed by a
//! re-render through a [`StatusRenderer`], so callers never need to read
//! state back.

mod console;

pub use console::ConsoleRenderer;

use std::collections::HashMap;

/// One line of status output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressItem {
    /// Stable identifier
    pub key: String,
    /// Current display text
    pub text: String,
    /// Whether this item has completed
    pub done: bool,
    /// Show a completed item without the checkmark
    pub hide_checkmark: bool,
}

/// Display backend for [`Printer`]
pub trait StatusRenderer: Send {
    /// Draw the current items, in insertion order
    fn render(&mut self, items: &[ProgressItem]);

    /// Finalize the display; the next render starts a fresh one
    fn finish(&mut self, items: &[ProgressItem]);
}

/// Tracks progress items and renders them on every change
pub struct Printer {
    items: Vec<ProgressItem>,
    renderer: Box<dyn StatusRenderer>,
}

impl Printer {
    /// Create a printer over a renderer
    pub fn new(renderer: impl StatusRenderer + 'static) -> Self {
        Self {
            items: Vec::new(),
            renderer: Box::new(renderer),
        }
    }

    /// Printer with live terminal spinners
    pub fn console() -> Self {
        Self::new(ConsoleRenderer::new())
    }

    /// Printer that logs changes instead of drawing
    pub fn log() -> Self {
        Self::new(LogRenderer::default())
    }

    /// Insert or overwrite an item, then re-render
    pub fn update_item(
        &mut self,
        key: &str,
        text: impl Into<String>,
        is_done: bool,
        hide_checkmark: bool,
    ) {
        let text = text.into();
        match self.items.iter_mut().find(|item| item.key == key) {
            Some(item) => {
                item.text = text;
                item.done = is_done;
                item.hide_checkmark = hide_checkmark;
            }
            None => self.items.push(ProgressItem {
                key: key.to_string(),
                text,
                done: is_done,
                hide_checkmark,
            }),
        }
        self.renderer.render(&self.items);
    }

    /// Mark an item done, keeping its text. Unknown keys are ignored.
    pub fn mark_item_done(&mut self, key: &str) {
        if let Some(item) = self.items.iter_mut().find(|item| item.key == key) {
            item.done = true;
            self.renderer.render(&self.items);
        }
    }

    /// Finalize the display and start over with no items
    pub fn end(&mut self) {
        self.renderer.finish(&self.items);
        self.items.clear();
    }
}

impl std::fmt::Debug for Printer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Printer")
            .field("items", &self.items)
            .finish()
    }
}

/// Renderer for non-interactive output: one log line per changed item
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_seen: HashMap<String, (String, bool)>,
}

impl StatusRenderer for LogRenderer {
    fn render(&mut self, items: &[ProgressItem]) {
        for item in items {
            let state = (item.text.clone(), item.done);
            if self.last_seen.get(&item.key) == Some(&state) {
                continue;
            }
            tracing::info!(item = %item.key, done = item.done, "{}", item.text);
            self.last_seen.insert(item.key.clone(), state);
        }
    }

    fn finish(&mut self, items: &[ProgressItem]) {
        self.render(items);
        self.last_seen.clear();
    }
}
