use async_trait::async_trait;
use domain::{NewTodo, Todo, TodoError, TodoId, TodoResult};
use std::sync::{Mutex, MutexGuard};

use crate::TodoRepository;

/// Process local store for development and tests. Keeps insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> TodoResult<MutexGuard<'_, Vec<Todo>>> {
        self.todos
            .lock()
            .map_err(|e| TodoError::Store(e.to_string()))
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_all(&self) -> TodoResult<Vec<Todo>> {
        Ok(self.lock()?.clone())
    }

    async fn find_by_completed(&self, completed: bool) -> TodoResult<Vec<Todo>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|t| t.completed == completed)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &TodoId) -> TodoResult<Option<Todo>> {
        Ok(self.lock()?.iter().find(|t| &t.id == id).cloned())
    }

    async fn insert(&self, todo: NewTodo) -> TodoResult<Todo> {
        let todo = todo.with_id(TodoId::new());
        self.lock()?.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, todo: &Todo) -> TodoResult<()> {
        let mut todos = self.lock()?;
        let stored = todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or_else(|| TodoError::NotFound(todo.id.to_string()))?;
        stored.title = todo.title.clone();
        stored.completed = todo.completed;
        Ok(())
    }

    async fn set_completed(&self, ids: &[TodoId], completed: bool) -> TodoResult<()> {
        for todo in self.lock()?.iter_mut().filter(|t| ids.contains(&t.id)) {
            todo.completed = completed;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &TodoId) -> TodoResult<()> {
        let mut todos = self.lock()?;
        let index = todos
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        todos.remove(index);
        Ok(())
    }

    async fn delete_many(&self, ids: &[TodoId]) -> TodoResult<()> {
        self.lock()?.retain(|t| !ids.contains(&t.id));
        Ok(())
    }
}
