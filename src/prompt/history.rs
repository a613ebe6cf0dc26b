use std::collections::VecDeque;

/// Recently used prompt texts, newest first.
///
/// Only used for duplicate avoidance; it lives as long as the session.
#[derive(Debug, Clone)]
pub struct PromptHistory {
    entries: VecDeque<String>,
    limit: usize,
}

impl PromptHistory {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit + 1),
            limit,
        }
    }

    pub fn contains(&self, full_text: &str) -> bool {
        self.entries.iter().any(|e| e == full_text)
    }

    /// Push to the front, dropping the oldest entry on overflow
    pub fn record(&mut self, full_text: impl Into<String>) {
        self.entries.push_front(full_text.into());
        self.entries.truncate(self.limit);
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
