use crate::{
    db::dao::{NewTodo, TodoChanges, TodoDao},
    db::entities::todo,
    error::AppError,
};

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn list(&self) -> Result<Vec<todo::Model>, AppError> {
        let todos = self.todo_dao.list().await?;
        tracing::debug!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        Ok(self.todo_dao.count().await?)
    }

    pub async fn get(&self, id: i32) -> Result<todo::Model, AppError> {
        Ok(self.todo_dao.find(id).await?)
    }

    /// Validates and persists a new todo. Nothing reaches the store unless
    /// both fields are present and non-blank.
    pub async fn create(
        &self,
        status: Option<&str>,
        task: Option<&str>,
    ) -> Result<todo::Model, AppError> {
        let new = NewTodo {
            status: required("status", status)?,
            task: required("task", task)?,
        };
        let todo = self.todo_dao.add(new).await?;
        tracing::info!(id = todo.id, status = %todo.status, "todo created");
        Ok(todo)
    }

    pub async fn update(
        &self,
        id: i32,
        status: Option<&str>,
        task: Option<&str>,
    ) -> Result<todo::Model, AppError> {
        let changes = TodoChanges {
            status: optional("status", status)?,
            task: optional("task", task)?,
        };
        if changes.status.is_none() && changes.task.is_none() {
            return Err(AppError::bad_request("status or task required"));
        }
        let todo = self.todo_dao.update(id, changes).await?;
        tracing::info!(id = todo.id, "todo updated");
        Ok(todo)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.todo_dao.remove(id).await?;
        tracing::info!(id, "todo deleted");
        Ok(())
    }
}

fn required(field: &'static str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        Some(_) => Err(AppError::bad_request(format!("{field} must not be empty"))),
        None => Err(AppError::bad_request(format!("{field} is required"))),
    }
}

fn optional(field: &'static str, value: Option<&str>) -> Result<Option<String>, AppError> {
    value.map(|value| required(field, Some(value))).transpose()
}
