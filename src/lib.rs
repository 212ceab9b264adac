//! In-memory multi-user todo API.
//!
//! # Overview
//! Clients register a user with a unique username (`POST /users`), then
//! manage that user's todos by sending the username in a `username` request
//! header. All state lives in one in-memory [`store::Store`] for the
//! lifetime of the process; nothing is persisted.
//!
//! # Design
//! - [`app`] builds the full router and [`run`] serves it, so the binary
//!   and the tests share one construction path.
//! - The store is shared as [`Db`]: mutating handlers hold the write lock
//!   for their whole read-modify-write, listing holds the read lock.
//! - Identity resolution (the `username` header naming a registered user)
//!   is an extractor that runs before any body is read; the store
//!   operations resolve the user again under the lock they mutate with.
//! - Every 4xx carries `{"error": true, "message": "..."}`; see
//!   [`error::ApiError`].

pub mod error;
pub mod extract;
pub mod store;
pub mod types;

pub use error::ApiError;
pub use store::Store;
pub use types::{Todo, User};

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::{get, patch, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::extract::{Json, Path, Username};
use crate::store::TodoPatch;
use crate::types::{parse_deadline, CreateTodo, RegisterUser, UpdateTodo};

/// Shared in-memory store: one lock guards all users for the whole of each
/// operation.
pub type Db = Arc<RwLock<Store>>;

/// Build the router with a fresh, empty store.
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::new()));
    Router::new()
        .route("/users", post(register_user))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/todos/{id}/done", patch(complete_todo))
        .with_state(db)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::PATCH,
                            Method::DELETE,
                        ])
                        .allow_headers(Any),
                ),
        )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

#[tracing::instrument(skip(db))]
async fn register_user(
    State(db): State<Db>,
    Json(input): Json<RegisterUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = db.write().await.register_user(input.name, input.username)?;
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[tracing::instrument(skip(db))]
async fn list_todos(
    State(db): State<Db>,
    Username(username): Username,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = db.read().await.list_todos(&username)?;
    Ok(Json(todos))
}

#[tracing::instrument(skip(db))]
async fn create_todo(
    State(db): State<Db>,
    Username(username): Username,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let deadline = parse_deadline(&input.deadline)?;
    let todo = db
        .write()
        .await
        .create_todo(&username, input.title, deadline)?;
    tracing::info!(todo_id = %todo.id, username, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[tracing::instrument(skip(db))]
async fn update_todo(
    State(db): State<Db>,
    Username(username): Username,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    let mut store = db.write().await;
    // Match the id before parsing the deadline: an unknown todo is a 404
    // even when the supplied deadline is garbage.
    store.resolve_todo(&username, id)?;
    let patch = TodoPatch {
        title: input.title,
        deadline: input.deadline.as_deref().map(parse_deadline).transpose()?,
    };
    let todo = store.update_todo(&username, id, patch)?;
    Ok(Json(todo))
}

#[tracing::instrument(skip(db))]
async fn complete_todo(
    State(db): State<Db>,
    Username(username): Username,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, ApiError> {
    let todo = db.write().await.complete_todo(&username, id)?;
    Ok(Json(todo))
}

#[tracing::instrument(skip(db))]
async fn delete_todo(
    State(db): State<Db>,
    Username(username): Username,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = db.write().await.delete_todo(&username, id)?;
    tracing::info!(todo_id = %removed.id, username, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
