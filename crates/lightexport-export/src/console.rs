//! Live observability channel
//!
//! Every document line, frame banner and error is mirrored here for live
//! inspection. This is separate from the document sink: a console never
//! affects what ends up in a frame document.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use tracing::{debug, error, info};

/// Category of a console entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleCategory {
    Input,
    Output,
    Info,
    Error,
}

impl fmt::Display for ConsoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsoleCategory::Input => "input",
            ConsoleCategory::Output => "output",
            ConsoleCategory::Info => "info",
            ConsoleCategory::Error => "error",
        };
        f.write_str(name)
    }
}

/// Receiver for console entries
pub trait ConsoleSink {
    fn append(&mut self, category: ConsoleCategory, text: &str);

    fn input(&mut self, text: &str) {
        self.append(ConsoleCategory::Input, text);
    }

    fn output(&mut self, text: &str) {
        self.append(ConsoleCategory::Output, text);
    }

    fn info(&mut self, text: &str) {
        self.append(ConsoleCategory::Info, text);
    }

    fn error(&mut self, text: &str) {
        self.append(ConsoleCategory::Error, text);
    }
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for Box<S> {
    fn append(&mut self, category: ConsoleCategory, text: &str) {
        (**self).append(category, text);
    }
}

/// Forwards entries to `tracing` under the `lightexport::console` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
    fn append(&mut self, category: ConsoleCategory, text: &str) {
        match category {
            ConsoleCategory::Error => error!(target: "lightexport::console", %category, "{text}"),
            ConsoleCategory::Input => debug!(target: "lightexport::console", %category, "{text}"),
            ConsoleCategory::Output | ConsoleCategory::Info => {
                info!(target: "lightexport::console", %category, "{text}");
            }
        }
    }
}

/// One recorded console entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleEntry {
    pub category: ConsoleCategory,
    pub text: String,
}

/// Bounded in-memory console; the oldest entries are dropped first
#[derive(Debug, Clone)]
pub struct MemoryConsole {
    entries: VecDeque<ConsoleEntry>,
    capacity: usize,
}

impl MemoryConsole {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Texts of every entry in `category`, oldest first
    pub fn texts(&self, category: ConsoleCategory) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.text.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for MemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink for MemoryConsole {
    fn append(&mut self, category: ConsoleCategory, text: &str) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ConsoleEntry {
            category,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_console_records_categories() {
        let mut console = MemoryConsole::new();
        console.info("[mesh]");
        console.output("=====");
        console.error("boom");

        assert_eq!(console.len(), 3);
        assert_eq!(console.texts(ConsoleCategory::Info), vec!["[mesh]"]);
        assert_eq!(console.texts(ConsoleCategory::Error), vec!["boom"]);
        assert!(console.texts(ConsoleCategory::Input).is_empty());
    }

    #[test]
    fn test_memory_console_is_bounded() {
        let mut console = MemoryConsole::with_capacity(2);
        console.info("a");
        console.info("b");
        console.info("c");

        assert_eq!(console.texts(ConsoleCategory::Info), vec!["b", "c"]);
    }

    #[test]
    fn test_entries_keep_category_order() {
        let mut console = MemoryConsole::new();
        console.output("banner");
        console.info("line");
        console.error("failed");

        let entries: Vec<_> = console.entries().map(|e| (e.category, e.text.as_str())).collect();
        assert_eq!(
            entries,
            vec![
                (ConsoleCategory::Output, "banner"),
                (ConsoleCategory::Info, "line"),
                (ConsoleCategory::Error, "failed"),
            ]
        );
    }

    #[test]
    fn test_boxed_console_forwards() {
        let mut console: Box<dyn ConsoleSink> = Box::new(TracingConsole);
        console.info("forwarded without a subscriber");
        console.error("still fine");
    }

    #[test]
    fn test_clear() {
        let mut console = MemoryConsole::new();
        console.input("export 1..=3");
        console.clear();
        assert!(console.is_empty());
    }
}
