//! Role-tagged messages and the append-only conversation history of a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Returns the wire name of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a conversation.
///
/// Fields are private so a message cannot change after it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversationError {
    /// A system message may only open the conversation.
    #[error("system message must be the first message of a conversation")]
    MisplacedSystemMessage,
}

/// Ordered message history for one session.
///
/// Messages can only be appended; there is no way to remove or edit them.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Creates a conversation opened by a single system message.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    /// Adds a message to the end of the conversation.
    ///
    /// A system message is only accepted while the conversation is empty.
    pub fn append(&mut self, message: Message) -> Result<(), ConversationError> {
        if message.role() == Role::System && !self.messages.is_empty() {
            return Err(ConversationError::MisplacedSystemMessage);
        }
        self.messages.push(message);
        Ok(())
    }

    /// Returns an owned copy of the history, unaffected by later appends.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the system prompt, if the conversation was seeded with one.
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role() == Role::System)
            .map(Message::content)
    }

    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_str::<Message>(r#"{"role":"tool","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_append_keeps_arrival_order() {
        let mut conversation = Conversation::new();
        conversation.append(Message::user("one")).unwrap();
        conversation.append(Message::assistant("two")).unwrap();
        conversation.append(Message::user("three")).unwrap();

        let contents: Vec<&str> = conversation.messages().iter().map(Message::content).collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[test]
    fn test_consecutive_same_role_is_allowed() {
        let mut conversation = Conversation::new();
        conversation.append(Message::assistant("a")).unwrap();
        conversation.append(Message::assistant("b")).unwrap();
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn test_system_message_only_first() {
        let mut conversation = Conversation::with_system_prompt("Responde en español.");
        let result = conversation.append(Message::system("again"));

        assert_eq!(result, Err(ConversationError::MisplacedSystemMessage));
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.system_prompt(), Some("Responde en español."));
    }

    #[test]
    fn test_system_message_accepted_on_empty() {
        let mut conversation = Conversation::new();
        conversation.append(Message::system("persona")).unwrap();
        assert_eq!(conversation.system_prompt(), Some("persona"));
    }

    #[test]
    fn test_system_prompt_none_without_seed() {
        let mut conversation = Conversation::new();
        conversation.append(Message::user("hola")).unwrap();
        assert!(conversation.system_prompt().is_none());
    }

    #[test]
    fn test_snapshot_is_a_value() {
        let mut conversation = Conversation::new();
        conversation.append(Message::user("first")).unwrap();
        conversation.append(Message::assistant("second")).unwrap();

        let snapshot = conversation.snapshot();
        conversation.append(Message::user("third")).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0], Message::user("first"));
        assert_eq!(snapshot[1], Message::assistant("second"));
        assert_eq!(conversation.len(), 3);
    }
}
