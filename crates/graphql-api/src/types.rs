use async_graphql::{ErrorExtensions, Object, ID};
use domain::TodoError;

/// Published as `todo`. Fields are nullable in the schema but always set.
pub struct TodoObject(domain::Todo);

impl From<domain::Todo> for TodoObject {
    fn from(todo: domain::Todo) -> Self {
        Self(todo)
    }
}

#[Object(name = "todo")]
impl TodoObject {
    /// Todo id
    async fn id(&self) -> Option<ID> {
        Some(ID(self.0.id.to_string()))
    }

    /// Task title
    async fn title(&self) -> Option<&str> {
        Some(&self.0.title)
    }

    /// Flag to mark if the task is completed
    async fn completed(&self) -> Option<bool> {
        Some(self.0.completed)
    }
}

/// `[todo]`
pub type TodoList = Option<Vec<Option<TodoObject>>>;

pub fn todo_list(todos: Vec<domain::Todo>) -> TodoList {
    Some(todos.into_iter().map(|t| Some(t.into())).collect())
}

/// Turns a store or lookup failure into a GraphQL error entry carrying
/// `extensions.code`.
pub fn into_graphql_error(error: TodoError) -> async_graphql::Error {
    let code = error.code();
    async_graphql::Error::new(error.to_string()).extend_with(|_, ext| ext.set("code", code))
}
