use async_graphql::extensions::Tracing;
use async_graphql::{Context, EmptySubscription, Object, Schema};
use infrastructure::{SharedTodoRepository, TodoRepository};

use crate::resolvers;
use crate::types::{into_graphql_error, todo_list, TodoList, TodoObject};

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Assembles the servable schema. `repository` is the process wide store
/// handle and must be connected before the schema is served.
pub fn build_schema(repository: SharedTodoRepository) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .extension(Tracing)
        .data(repository)
        .finish()
}

fn repository<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a dyn TodoRepository> {
    Ok(ctx.data::<SharedTodoRepository>()?.as_ref())
}

pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    async fn todos(&self, ctx: &Context<'_>) -> async_graphql::Result<TodoList> {
        let todos = resolvers::list_todos(repository(ctx)?)
            .await
            .map_err(into_graphql_error)?;
        Ok(todo_list(todos))
    }
}

pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    /// Add a Todo
    async fn add(
        &self,
        ctx: &Context<'_>,
        title: String,
    ) -> async_graphql::Result<Option<TodoObject>> {
        let todo = resolvers::add_todo(repository(ctx)?, title)
            .await
            .map_err(into_graphql_error)?;
        Ok(Some(todo.into()))
    }

    /// Toggle the todo
    async fn toggle(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<TodoObject>> {
        let todo = resolvers::toggle_todo(repository(ctx)?, &id)
            .await
            .map_err(into_graphql_error)?;
        Ok(Some(todo.into()))
    }

    /// Toggle all todos
    async fn toggle_all(&self, ctx: &Context<'_>, checked: bool) -> async_graphql::Result<TodoList> {
        let todos = resolvers::toggle_all(repository(ctx)?, checked)
            .await
            .map_err(into_graphql_error)?;
        Ok(todo_list(todos))
    }

    /// Destroy the todo
    async fn destroy(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<TodoObject>> {
        let todo = resolvers::destroy_todo(repository(ctx)?, &id)
            .await
            .map_err(into_graphql_error)?;
        Ok(Some(todo.into()))
    }

    /// Clear completed
    async fn clear_completed(&self, ctx: &Context<'_>) -> async_graphql::Result<TodoList> {
        let todos = resolvers::clear_completed(repository(ctx)?)
            .await
            .map_err(into_graphql_error)?;
        Ok(todo_list(todos))
    }

    /// Edit a todo
    async fn save(
        &self,
        ctx: &Context<'_>,
        id: String,
        title: String,
    ) -> async_graphql::Result<Option<TodoObject>> {
        let todo = resolvers::save_todo(repository(ctx)?, &id, title)
            .await
            .map_err(into_graphql_error)?;
        Ok(Some(todo.into()))
    }
}
