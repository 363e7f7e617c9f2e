use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{db::entities::todo, error::AppError, state::AppState};

const BASE_PATH: &str = "/api/todo";

/// Body of create and update requests. Keys are accepted in camelCase or
/// PascalCase; `id` and `createdTime` are ignored if sent.
#[derive(Debug, Deserialize)]
pub struct TodoPayload {
    #[serde(alias = "Status")]
    pub status: Option<String>,
    #[serde(alias = "Task")]
    pub task: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: i32,
    pub created_time: DateTimeWithTimeZone,
    pub status: String,
    pub task: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(BASE_PATH, get(list_todos).post(create_todo))
        .route(
            &format!("{BASE_PATH}/{{id}}"),
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .with_state(state)
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let todos = state.todo_service().list().await?;
    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = todo_id(id)?;
    let todo = state.todo_service().get(id).await?;
    Ok(Json(todo.into()))
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload.map_err(invalid_body)?;
    let todo = state
        .todo_service()
        .create(body.status.as_deref(), body.task.as_deref())
        .await?;
    let location = format!("{BASE_PATH}/{}", todo.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TodoResponse::from(todo)),
    ))
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = todo_id(id)?;
    let Json(body) = payload.map_err(invalid_body)?;
    let todo = state
        .todo_service()
        .update(id, body.status.as_deref(), body.task.as_deref())
        .await?;
    Ok(Json(todo.into()))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = todo_id(id)?;
    state.todo_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn todo_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::bad_request("id must be an integer"))
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
            AppError::bad_request(rejection.body_text())
        }
        other => AppError::rejected(other.status(), other.body_text()),
    }
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            created_time: model.created_time,
            status: model.status,
            task: model.task,
        }
    }
}
