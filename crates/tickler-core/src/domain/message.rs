//! Canned reminder messages.

use rand::seq::SliceRandom;

/// Used when the pool is empty.
pub const FALLBACK_MESSAGE: &str = "Reminder!";

const DEFAULT_MESSAGES: &[&str] = &[
    "Reminder: that thing you promised yourself? It's time.",
    "Knock knock. Who's there? Your to-do list.",
    "Time's up! Future you already said thanks.",
    "Psst. This task has been waiting very patiently.",
    "Reminder ringing! Cape optional, action required.",
];

/// Fixed pool of user-facing messages, picked uniformly at random.
#[derive(Debug, Clone)]
pub struct MessagePool {
    messages: Vec<String>,
}

impl MessagePool {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn pick(&self) -> &str {
        self.messages
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(FALLBACK_MESSAGE)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for MessagePool {
    fn default() -> Self {
        Self::new(default_messages())
    }
}

pub fn default_messages() -> Vec<String> {
    DEFAULT_MESSAGES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_falls_back() {
        let pool = MessagePool::new(vec![]);
        assert_eq!(pool.pick(), FALLBACK_MESSAGE);
    }

    #[test]
    fn pick_comes_from_pool() {
        let pool = MessagePool::default();
        for _ in 0..50 {
            let msg = pool.pick();
            assert!(DEFAULT_MESSAGES.contains(&msg));
        }
    }

    #[test]
    fn single_entry_pool_is_deterministic() {
        let pool = MessagePool::new(vec!["only one".to_string()]);
        assert_eq!(pool.pick(), "only one");
    }
}
