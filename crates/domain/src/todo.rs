use crate::errors::TodoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store assigned identifier. Always a ULID string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Parses a caller supplied id. Anything that is not a ULID is rejected,
    /// including 26-char strings above the 128-bit range, which the decoder
    /// would otherwise wrap into a different id.
    pub fn parse(id: &str) -> Result<Self, TodoError> {
        match ulid::Ulid::from_string(id) {
            Ok(ulid) if ulid.to_string().eq_ignore_ascii_case(id) => Ok(Self(ulid.to_string())),
            _ => Err(TodoError::InvalidId(id.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TodoId {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }
}

/// A todo that has not been persisted yet. The store assigns the id on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }

    pub fn with_id(self, id: TodoId) -> Todo {
        Todo {
            id,
            title: self.title,
            completed: self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_id_new_generates_26_char_string() {
        let todo_id = TodoId::new();
        let id_str = todo_id.as_str();

        assert_eq!(id_str.len(), 26);
        let valid_chars = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";
        for c in id_str.chars() {
            assert!(valid_chars.contains(c), "Invalid character: {c}");
        }
    }

    #[test]
    fn test_todo_id_parse_accepts_generated_ids() {
        let todo_id = TodoId::new();

        let parsed = TodoId::parse(todo_id.as_str()).unwrap();

        assert_eq!(parsed, todo_id);
        assert_eq!(
            TodoId::parse(&todo_id.as_str().to_lowercase()).unwrap(),
            todo_id
        );
    }

    #[test]
    fn test_todo_id_parse_rejects_out_of_range_ids() {
        let overflowing = "ZZZZZZZZZZZZZZZZZZZZZZZZZZ";

        let result = TodoId::parse(overflowing);

        assert_eq!(result, Err(TodoError::InvalidId(overflowing.to_string())));
        assert!(TodoId::parse("7ZZZZZZZZZZZZZZZZZZZZZZZZZ").is_ok());
    }

    #[test]
    fn test_todo_id_parse_rejects_garbage() {
        let result = TodoId::parse("not-an-id");

        assert_eq!(result, Err(TodoError::InvalidId("not-an-id".to_string())));
        assert!("".parse::<TodoId>().is_err());
    }

    #[test]
    fn test_new_todo_defaults_to_not_completed() {
        let todo = NewTodo::new("Buy milk").with_id(TodoId::new());

        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut todo = NewTodo::new("Task").with_id(TodoId::new());

        todo.toggle();
        assert!(todo.completed);
        todo.toggle();
        assert!(!todo.completed);
    }

    #[test]
    fn test_rename_keeps_id_and_completed() {
        let mut todo = NewTodo::new("Old").with_id(TodoId::new());
        todo.toggle();
        let before = todo.clone();

        todo.rename("New");

        assert_eq!(todo.title, "New");
        assert_eq!(todo.id, before.id);
        assert_eq!(todo.completed, before.completed);
    }

    #[test]
    fn test_todo_serializes_with_single_id_field() {
        let todo = NewTodo::new("Task").with_id(TodoId::new());

        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(json["id"], todo.id.as_str());
        assert!(json.get("_id").is_none());
    }
}
