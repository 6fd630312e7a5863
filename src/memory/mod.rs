//! Conversation memory stores.
//!
//! Each agent instance owns exactly one store, so no locking is needed:
//! the engine is the single writer for an instance's memory. Persistent
//! backends implement [`MemoryStore`] behind a [`MemoryFactory`]; the
//! in-process default keeps messages in a `Vec`.

use crate::provider::{Message, Role};

/// Ordered conversation storage for one agent instance.
pub trait MemoryStore: Send {
    /// Append a message, preserving insertion order.
    fn append(&mut self, message: Message);

    /// Read messages in insertion order.
    ///
    /// `role` filters first; `limit` then keeps only the most recent
    /// messages of the filtered view.
    fn read(&self, limit: Option<usize>, role: Option<Role>) -> Vec<Message>;

    /// Remove all messages.
    fn clear(&mut self);

    /// Number of stored messages.
    fn len(&self) -> usize;

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Creates a fresh store per agent instantiation.
pub trait MemoryFactory: Send + Sync {
    /// Build an empty store.
    fn create(&self) -> Box<dyn MemoryStore>;
}

/// Default volatile store backed by a `Vec`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    messages: Vec<Message>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryStore for InMemoryStore {
    fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn read(&self, limit: Option<usize>, role: Option<Role>) -> Vec<Message> {
        let filtered: Vec<Message> = self
            .messages
            .iter()
            .filter(|message| role.map(|r| message.role == r).unwrap_or(true))
            .cloned()
            .collect();
        match limit {
            Some(limit) if filtered.len() > limit => {
                filtered[filtered.len() - limit..].to_vec()
            }
            _ => filtered,
        }
    }

    fn clear(&mut self) {
        self.messages.clear();
    }

    fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Factory for [`InMemoryStore`].
#[derive(Clone, Copy, Debug, Default)]
pub struct InMemoryFactory;

impl MemoryFactory for InMemoryFactory {
    fn create(&self) -> Box<dyn MemoryStore> {
        Box::new(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.append(Message::user("one"));
        store.append(Message::assistant("two"));
        store.append(Message::user("three"));
        store
    }

    #[test]
    fn test_append_preserves_order() {
        let store = seeded();
        let all = store.read(None, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].text(), "one");
        assert_eq!(all[2].text(), "three");
    }

    #[test]
    fn test_role_filter() {
        let store = seeded();
        let users = store.read(None, Some(Role::User));
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|m| m.role == Role::User));
    }

    #[test]
    fn test_limit_keeps_most_recent() {
        let store = seeded();
        let tail = store.read(Some(2), None);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].text(), "two");
        assert_eq!(tail[1].text(), "three");
    }

    #[test]
    fn test_limit_after_role_filter() {
        let store = seeded();
        let tail = store.read(Some(1), Some(Role::User));
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].text(), "three");
    }

    #[test]
    fn test_clear() {
        let mut store = seeded();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.read(None, None).len(), 0);
    }

    #[test]
    fn test_factory_creates_independent_stores() {
        let factory = InMemoryFactory;
        let mut a = factory.create();
        let b = factory.create();
        a.append(Message::user("only in a"));
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
