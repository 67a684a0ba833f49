use serde::{Deserialize, Serialize};

use crate::models::message::Message;

/// Ordered conversation history for one chat session.
///
/// Append-only: turns are only ever pushed, never edited or removed. The
/// session is owned by the caller and lent to the agent for each run, so
/// there is no shared mutable state behind it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_user<S: Into<String>>(&mut self, text: S) {
        self.push(Message::user(text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::Role;

    #[test]
    fn test_starts_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert!(session.last().is_none());
    }

    #[test]
    fn test_push_preserves_order() {
        let mut session = Session::new();
        session.push_user("first");
        session.push(Message::assistant("second"));
        session.push(Message::tool("call_1", "third"));

        assert_eq!(session.len(), 3);
        assert!(matches!(session.messages()[0].role, Role::User));
        assert!(matches!(session.messages()[1].role, Role::Assistant));
        assert_eq!(session.last().unwrap().text(), "third");
    }
}
