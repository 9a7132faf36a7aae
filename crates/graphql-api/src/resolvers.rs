//! Store logic behind each GraphQL field, kept free of GraphQL types.

use domain::{NewTodo, Todo, TodoError, TodoId, TodoResult};
use infrastructure::TodoRepository;
use tracing::info;

/// Resolves a caller supplied id to a stored record.
/// Malformed id, store failure and missing record stay distinct.
async fn find_existing(repo: &dyn TodoRepository, id: &str) -> TodoResult<Todo> {
    let id = TodoId::parse(id)?;
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| TodoError::NotFound(id.to_string()))
}

pub async fn list_todos(repo: &dyn TodoRepository) -> TodoResult<Vec<Todo>> {
    repo.find_all().await
}

pub async fn add_todo(repo: &dyn TodoRepository, title: String) -> TodoResult<Todo> {
    let todo = repo.insert(NewTodo::new(title)).await?;
    info!(todo_id = %todo.id, "todo added");
    Ok(todo)
}

pub async fn toggle_todo(repo: &dyn TodoRepository, id: &str) -> TodoResult<Todo> {
    let mut todo = find_existing(repo, id).await?;
    todo.toggle();
    repo.update(&todo).await?;
    info!(todo_id = %todo.id, completed = todo.completed, "todo toggled");
    Ok(todo)
}

/// Returns the record as it was right before removal.
pub async fn destroy_todo(repo: &dyn TodoRepository, id: &str) -> TodoResult<Todo> {
    let todo = find_existing(repo, id).await?;
    repo.delete_by_id(&todo.id).await?;
    info!(todo_id = %todo.id, "todo destroyed");
    Ok(todo)
}

/// Fetch, bulk update, then fetch again. The steps are not isolated from
/// concurrent writers.
pub async fn toggle_all(repo: &dyn TodoRepository, checked: bool) -> TodoResult<Vec<Todo>> {
    let ids: Vec<TodoId> = repo.find_all().await?.into_iter().map(|t| t.id).collect();
    repo.set_completed(&ids, checked).await?;
    info!(count = ids.len(), checked, "all todos toggled");
    repo.find_all().await
}

/// Deletes exactly the completed records seen by the fetch and returns them.
pub async fn clear_completed(repo: &dyn TodoRepository) -> TodoResult<Vec<Todo>> {
    let completed = repo.find_by_completed(true).await?;
    let ids: Vec<TodoId> = completed.iter().map(|t| t.id.clone()).collect();
    repo.delete_many(&ids).await?;
    info!(count = ids.len(), "completed todos cleared");
    Ok(completed)
}

pub async fn save_todo(repo: &dyn TodoRepository, id: &str, title: String) -> TodoResult<Todo> {
    let mut todo = find_existing(repo, id).await?;
    todo.rename(title);
    repo.update(&todo).await?;
    info!(todo_id = %todo.id, "todo saved");
    Ok(todo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure::InMemoryTodoRepository;

    #[tokio::test]
    async fn test_add_then_list() {
        let repo = InMemoryTodoRepository::new();

        let added = add_todo(&repo, "X".to_string()).await.unwrap();
        let todos = list_todos(&repo).await.unwrap();

        assert_eq!(todos, vec![added.clone()]);
        assert_eq!(added.title, "X");
        assert!(!added.completed);
    }

    #[tokio::test]
    async fn test_toggle_is_reversible() {
        let repo = InMemoryTodoRepository::new();
        let todo = add_todo(&repo, "task".to_string()).await.unwrap();

        let once = toggle_todo(&repo, todo.id.as_str()).await.unwrap();
        let twice = toggle_todo(&repo, todo.id.as_str()).await.unwrap();

        assert!(once.completed);
        assert!(!twice.completed);
        assert_eq!(list_todos(&repo).await.unwrap(), vec![twice]);
    }

    #[tokio::test]
    async fn test_lookup_errors_are_distinct() {
        let repo = InMemoryTodoRepository::new();
        add_todo(&repo, "keep".to_string()).await.unwrap();
        let before = list_todos(&repo).await.unwrap();
        let missing = TodoId::new();

        assert_eq!(
            toggle_todo(&repo, "nope").await,
            Err(TodoError::InvalidId("nope".to_string()))
        );
        assert_eq!(
            toggle_todo(&repo, missing.as_str()).await,
            Err(TodoError::NotFound(missing.to_string()))
        );
        assert_eq!(
            destroy_todo(&repo, missing.as_str()).await,
            Err(TodoError::NotFound(missing.to_string()))
        );
        assert_eq!(
            save_todo(&repo, missing.as_str(), "Y".to_string()).await,
            Err(TodoError::NotFound(missing.to_string()))
        );

        assert_eq!(list_todos(&repo).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_destroy_returns_pre_deletion_state() {
        let repo = InMemoryTodoRepository::new();
        let todo = add_todo(&repo, "gone".to_string()).await.unwrap();
        let todo = toggle_todo(&repo, todo.id.as_str()).await.unwrap();

        let destroyed = destroy_todo(&repo, todo.id.as_str()).await.unwrap();

        assert_eq!(destroyed, todo);
        assert!(list_todos(&repo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_all_sets_every_record() {
        let repo = InMemoryTodoRepository::new();
        let a = add_todo(&repo, "a".to_string()).await.unwrap();
        add_todo(&repo, "b".to_string()).await.unwrap();
        toggle_todo(&repo, a.id.as_str()).await.unwrap();

        let checked = toggle_all(&repo, true).await.unwrap();
        assert_eq!(checked.len(), 2);
        assert!(checked.iter().all(|t| t.completed));

        let unchecked = toggle_all(&repo, false).await.unwrap();
        assert!(unchecked.iter().all(|t| !t.completed));
    }

    #[tokio::test]
    async fn test_clear_completed_returns_removed_set() {
        let repo = InMemoryTodoRepository::new();
        let a = add_todo(&repo, "a".to_string()).await.unwrap();
        let b = add_todo(&repo, "b".to_string()).await.unwrap();
        let c = add_todo(&repo, "c".to_string()).await.unwrap();
        let a = toggle_todo(&repo, a.id.as_str()).await.unwrap();
        let c = toggle_todo(&repo, c.id.as_str()).await.unwrap();

        let cleared = clear_completed(&repo).await.unwrap();

        assert_eq!(cleared, vec![a, c]);
        assert_eq!(list_todos(&repo).await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn test_clear_completed_with_nothing_completed() {
        let repo = InMemoryTodoRepository::new();
        let a = add_todo(&repo, "a".to_string()).await.unwrap();

        assert!(clear_completed(&repo).await.unwrap().is_empty());
        assert_eq!(list_todos(&repo).await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn test_save_changes_only_title() {
        let repo = InMemoryTodoRepository::new();
        let todo = add_todo(&repo, "old".to_string()).await.unwrap();
        let todo = toggle_todo(&repo, todo.id.as_str()).await.unwrap();

        let saved = save_todo(&repo, todo.id.as_str(), "Y".to_string())
            .await
            .unwrap();

        assert_eq!(saved.title, "Y");
        assert_eq!(saved.id, todo.id);
        assert_eq!(saved.completed, todo.completed);
        assert_eq!(list_todos(&repo).await.unwrap(), vec![saved]);
    }
}
