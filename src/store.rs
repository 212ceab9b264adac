//! In-memory store of users and their todos.
//!
//! # Design
//! One `Store` holds every registered user, keyed by username — the unique,
//! immutable handle every todo operation resolves first. Todos live inside
//! their owning user as a `Vec`, so list order is creation order, updates
//! mutate records in place without disturbing positions, and removal keeps
//! the relative order of what remains. The store itself is synchronous; the
//! server wraps it in `Arc<RwLock<_>>` and holds the lock for the whole
//! read-modify-write of each operation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{Todo, User};

/// Fields applied by [`Store::update_todo`]. `None` leaves the stored value
/// unchanged.
#[derive(Debug, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Process-lifetime store of all registered users.
#[derive(Debug, Default)]
pub struct Store {
    users: HashMap<String, User>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity resolution: succeeds only when the username is registered.
    pub fn resolve(&self, username: &str) -> Result<(), ApiError> {
        self.user(username).map(|_| ())
    }

    /// Succeeds only when `id` names one of the user's todos.
    pub fn resolve_todo(&self, username: &str, id: Uuid) -> Result<(), ApiError> {
        self.user(username)?
            .todos
            .iter()
            .find(|todo| todo.id == id)
            .map(|_| ())
            .ok_or(ApiError::TodoNotFound)
    }

    /// Register a new user with an empty todo list. Usernames are unique
    /// and immutable once taken.
    pub fn register_user(&mut self, name: String, username: String) -> Result<User, ApiError> {
        if self.users.contains_key(&username) {
            return Err(ApiError::UsernameTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            name,
            username: username.clone(),
            todos: Vec::new(),
        };
        self.users.insert(username, user.clone());
        Ok(user)
    }

    /// All todos of the given user, in creation order.
    pub fn list_todos(&self, username: &str) -> Result<Vec<Todo>, ApiError> {
        self.user(username).map(|user| user.todos.clone())
    }

    /// Create a todo at the end of the user's list. New todos always start
    /// pending.
    pub fn create_todo(
        &mut self,
        username: &str,
        title: String,
        deadline: DateTime<Utc>,
    ) -> Result<Todo, ApiError> {
        let user = self.user_mut(username)?;
        let todo = Todo {
            id: Uuid::new_v4(),
            title,
            done: false,
            deadline,
            created_at: Utc::now(),
        };
        user.todos.push(todo.clone());
        Ok(todo)
    }

    /// Apply a partial update to one todo, in place. `id`, `done` and
    /// `created_at` are never touched here.
    pub fn update_todo(
        &mut self,
        username: &str,
        id: Uuid,
        patch: TodoPatch,
    ) -> Result<Todo, ApiError> {
        let todo = self.todo_mut(username, id)?;
        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(deadline) = patch.deadline {
            todo.deadline = deadline;
        }
        Ok(todo.clone())
    }

    /// Mark one todo as done. Idempotent: completing an already-done todo
    /// succeeds and changes nothing.
    pub fn complete_todo(&mut self, username: &str, id: Uuid) -> Result<Todo, ApiError> {
        let todo = self.todo_mut(username, id)?;
        todo.done = true;
        Ok(todo.clone())
    }

    /// Remove one todo and return it.
    pub fn delete_todo(&mut self, username: &str, id: Uuid) -> Result<Todo, ApiError> {
        let user = self.user_mut(username)?;
        let position = user
            .todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(ApiError::TodoNotFound)?;
        Ok(user.todos.remove(position))
    }

    fn user(&self, username: &str) -> Result<&User, ApiError> {
        self.users.get(username).ok_or(ApiError::UserNotFound)
    }

    fn user_mut(&mut self, username: &str) -> Result<&mut User, ApiError> {
        self.users.get_mut(username).ok_or(ApiError::UserNotFound)
    }

    fn todo_mut(&mut self, username: &str, id: Uuid) -> Result<&mut Todo, ApiError> {
        self.user_mut(username)?
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(ApiError::TodoNotFound)
    }
}
