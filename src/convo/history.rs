use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Message author, serialized the way the chat service expects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One prior exchange fed back to the chat model as context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Bounded conversation memory for one channel.
///
/// Holds at most `max_entries` entries in insertion order; appending past
/// the bound evicts the oldest entries first, preserving recency.
#[derive(Debug)]
pub struct ConversationHistory {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl ConversationHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Append an entry, evicting from the front while over the bound
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// The full chat context: system prompt followed by the stored history
    pub fn to_messages(&self, system_prompt: &str) -> Vec<HistoryEntry> {
        let mut messages = Vec::with_capacity(self.entries.len() + 1);
        messages.push(HistoryEntry::system(system_prompt));
        messages.extend(self.entries.iter().cloned());
        messages
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eviction_is_fifo_bounded() {
        let mut history = ConversationHistory::new(10);
        for i in 0..11 {
            history.push(HistoryEntry::user(format!("message {i}")));
        }

        assert_eq!(history.len(), 10);
        let contents: Vec<&str> = history.entries().map(|e| e.content.as_str()).collect();
        assert!(!contents.contains(&"message 0"), "Oldest entry should be evicted");
        assert_eq!(contents.first(), Some(&"message 1"));
        assert_eq!(contents.last(), Some(&"message 10"));
    }

    #[test]
    fn to_messages_prepends_system_prompt() {
        let mut history = ConversationHistory::new(10);
        history.push(HistoryEntry::user("oi"));
        history.push(HistoryEntry::assistant("olá!"));

        let messages = history.to_messages("be brief");

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], HistoryEntry::system("be brief"));
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
    }

    #[test]
    fn clear_empties_the_history() {
        let mut history = ConversationHistory::new(10);
        history.push(HistoryEntry::user("oi"));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn role_serializes_lowercase() {
        let entry = HistoryEntry::assistant("tudo bem");
        let json = serde_json::to_string(&entry).expect("serialize");
        assert_eq!(json, r#"{"role":"assistant","content":"tudo bem"}"#);
    }
}
