use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoError, TodoId};
use std::collections::HashMap;

pub const ATTR_ID: &str = "id";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_COMPLETED: &str = "completed";

pub type Item = HashMap<String, AttributeValue>;

pub fn id_key(id: &TodoId) -> AttributeValue {
    AttributeValue::S(id.as_str().to_string())
}

pub fn todo_to_item(todo: &Todo) -> Item {
    let mut item = HashMap::new();
    item.insert(ATTR_ID.to_string(), id_key(&todo.id));
    item.insert(ATTR_TITLE.to_string(), AttributeValue::S(todo.title.clone()));
    item.insert(ATTR_COMPLETED.to_string(), AttributeValue::Bool(todo.completed));
    item
}

/// Rebuilds a todo from a stored item. A missing `completed` reads as false so
/// the field is never null on the way out.
pub fn item_to_todo(item: &Item) -> Result<Todo, TodoError> {
    let id = item
        .get(ATTR_ID)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| TodoError::Store("item without id".to_string()))?;
    let id = TodoId::parse(id)
        .map_err(|_| TodoError::Store(format!("item with malformed id: {id}")))?;

    let title = item
        .get(ATTR_TITLE)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| TodoError::Store(format!("item {id} without title")))?
        .clone();

    let completed = item
        .get(ATTR_COMPLETED)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false);

    Ok(Todo {
        id,
        title,
        completed,
    })
}
