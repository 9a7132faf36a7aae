use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, WriteRequest};
use domain::{NewTodo, Todo, TodoError, TodoId, TodoResult};
use futures::{stream, StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use crate::models::{id_key, item_to_todo, todo_to_item, Item, ATTR_COMPLETED, ATTR_ID, ATTR_TITLE};
use crate::DynamoDbClient;

/// BatchWriteItem accepts at most 25 requests per call.
const BATCH_WRITE_LIMIT: usize = 25;

/// Upper bound on in-flight UpdateItem calls during a bulk update.
const BULK_UPDATE_CONCURRENCY: usize = 10;

/// Document store operations the API is built on.
///
/// Bulk calls are not transactional. If one fails part way, some records may
/// already have been written.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Every record, in the store's natural order.
    async fn find_all(&self) -> TodoResult<Vec<Todo>>;

    async fn find_by_completed(&self, completed: bool) -> TodoResult<Vec<Todo>>;

    async fn find_by_id(&self, id: &TodoId) -> TodoResult<Option<Todo>>;

    /// Persists a new record and returns it with its assigned id.
    async fn insert(&self, todo: NewTodo) -> TodoResult<Todo>;

    /// Overwrites title and completed of an existing record.
    /// `NotFound` if the record is gone.
    async fn update(&self, todo: &Todo) -> TodoResult<()>;

    /// Sets `completed` on every listed record that still exists.
    async fn set_completed(&self, ids: &[TodoId], completed: bool) -> TodoResult<()>;

    /// `NotFound` if the record is gone.
    async fn delete_by_id(&self, id: &TodoId) -> TodoResult<()>;

    async fn delete_many(&self, ids: &[TodoId]) -> TodoResult<()>;
}

pub type SharedTodoRepository = Arc<dyn TodoRepository>;

fn store_error<E>(operation: &'static str, e: E) -> TodoError
where
    E: std::error::Error + 'static,
{
    let message = DisplayErrorContext(&e).to_string();
    error!(operation, error = %message, "DynamoDB call failed");
    TodoError::Store(message)
}

pub struct DynamoTodoRepository {
    db: DynamoDbClient,
}

impl DynamoTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }

    async fn scan(&self, completed: Option<bool>) -> TodoResult<Vec<Todo>> {
        let mut todos = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .db
                .client()
                .scan()
                .table_name(self.db.table_name())
                // Reads must observe writes the same request just made (toggleAll re-fetch).
                .consistent_read(true)
                .set_exclusive_start_key(start_key.take());
            if let Some(completed) = completed {
                request = request
                    .filter_expression("#completed = :completed")
                    .expression_attribute_names("#completed", ATTR_COMPLETED)
                    .expression_attribute_values(":completed", AttributeValue::Bool(completed));
            }

            let output = request.send().await.map_err(|e| store_error("scan", e))?;

            for item in output.items() {
                todos.push(item_to_todo(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(count = todos.len(), filter = ?completed, "scanned todos");
        Ok(todos)
    }

    async fn update_completed(&self, id: &TodoId, completed: bool) -> TodoResult<()> {
        let result = self
            .db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .key(ATTR_ID, id_key(id))
            .update_expression("SET #completed = :completed")
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ATTR_ID)
            .expression_attribute_names("#completed", ATTR_COMPLETED)
            .expression_attribute_values(":completed", AttributeValue::Bool(completed))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            // Deleted since the caller listed it; nothing left to update.
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                debug!(todo_id = %id, "skipping vanished todo");
                Ok(())
            }
            Err(e) => Err(store_error("update_item", e)),
        }
    }
}

#[async_trait]
impl TodoRepository for DynamoTodoRepository {
    async fn find_all(&self) -> TodoResult<Vec<Todo>> {
        self.scan(None).await
    }

    async fn find_by_completed(&self, completed: bool) -> TodoResult<Vec<Todo>> {
        self.scan(Some(completed)).await
    }

    async fn find_by_id(&self, id: &TodoId) -> TodoResult<Option<Todo>> {
        let output = self
            .db
            .client()
            .get_item()
            .table_name(self.db.table_name())
            .key(ATTR_ID, id_key(id))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| store_error("get_item", e))?;

        output.item().map(item_to_todo).transpose()
    }

    async fn insert(&self, todo: NewTodo) -> TodoResult<Todo> {
        let todo = todo.with_id(TodoId::new());

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(todo_to_item(&todo)))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ATTR_ID)
            .send()
            .await
            .map_err(|e| store_error("put_item", e))?;

        debug!(todo_id = %todo.id, "inserted todo");
        Ok(todo)
    }

    async fn update(&self, todo: &Todo) -> TodoResult<()> {
        let result = self
            .db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .key(ATTR_ID, id_key(&todo.id))
            .update_expression("SET #title = :title, #completed = :completed")
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ATTR_ID)
            .expression_attribute_names("#title", ATTR_TITLE)
            .expression_attribute_names("#completed", ATTR_COMPLETED)
            .expression_attribute_values(":title", AttributeValue::S(todo.title.clone()))
            .expression_attribute_values(":completed", AttributeValue::Bool(todo.completed))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(TodoError::NotFound(todo.id.to_string()))
            }
            Err(e) => Err(store_error("update_item", e)),
        }
    }

    async fn set_completed(&self, ids: &[TodoId], completed: bool) -> TodoResult<()> {
        let updates: Vec<_> = ids
            .iter()
            .map(|id| self.update_completed(id, completed))
            .collect();
        stream::iter(updates)
            .buffer_unordered(BULK_UPDATE_CONCURRENCY)
            .try_collect::<Vec<()>>()
            .await?;
        debug!(count = ids.len(), completed, "bulk updated todos");
        Ok(())
    }

    async fn delete_by_id(&self, id: &TodoId) -> TodoResult<()> {
        let result = self
            .db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .key(ATTR_ID, id_key(id))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ATTR_ID)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(TodoError::NotFound(id.to_string()))
            }
            Err(e) => Err(store_error("delete_item", e)),
        }
    }

    async fn delete_many(&self, ids: &[TodoId]) -> TodoResult<()> {
        for chunk in ids.chunks(BATCH_WRITE_LIMIT) {
            let mut requests = Vec::with_capacity(chunk.len());
            for id in chunk {
                let delete = DeleteRequest::builder()
                    .key(ATTR_ID, id_key(id))
                    .build()
                    .map_err(|e| store_error("batch_write_item", e))?;
                requests.push(WriteRequest::builder().delete_request(delete).build());
            }

            let output = self
                .db
                .client()
                .batch_write_item()
                .set_request_items(Some(HashMap::from([(
                    self.db.table_name().to_string(),
                    requests,
                )])))
                .send()
                .await
                .map_err(|e| store_error("batch_write_item", e))?;

            let unprocessed: usize = output
                .unprocessed_items()
                .map(|items| items.values().map(Vec::len).sum())
                .unwrap_or(0);
            if unprocessed > 0 {
                error!(unprocessed, "batch delete left items unprocessed");
                return Err(TodoError::Store(format!(
                    "{unprocessed} delete requests were not processed"
                )));
            }
        }

        debug!(count = ids.len(), "bulk deleted todos");
        Ok(())
    }
}
