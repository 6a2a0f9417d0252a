//! To-do list application core synchronized with a remote collection.
//!
//! This crate implements the state-management core of a to-do list UI:
//! the authoritative item list plus the optimistic bookkeeping shown while
//! remote calls are in flight (placeholder row, per-item processing set,
//! auto-clearing error banner). User intents and remote-call completions
//! are actions; the reducer is the coordinator that brackets every remote
//! call with the processing flags and reconciles the list with the
//! server's response.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todosync_app::{
//!     HttpRemoteCollection, NoopFocus, OwnerId, TodoAction, TodoEnvironment, TodoReducer,
//!     TodoState,
//! };
//! use todosync_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(HttpRemoteCollection::new("https://example.test/api")?);
//! let env = TodoEnvironment::new(api, Arc::new(NoopFocus), OwnerId::new(42));
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! // Populate from the remote collection
//! store.send(TodoAction::Load).await?;
//!
//! // Create an item
//! store
//!     .send(TodoAction::Add {
//!         title: "Buy milk".to_string(),
//!     })
//!     .await?;
//!
//! // Read state
//! let left = store.state(|s| s.items_left()).await;
//! println!("{left} items left");
//! # Ok(())
//! # }
//! ```
//!
//! Callers that need the outcome of a specific action (the add form keeps
//! the typed title when the create fails) observe completions through
//! [`todosync_runtime::Store::send_and_wait_for`].

pub mod api;
pub mod config;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use api::{ApiError, ApiFuture, HttpRemoteCollection, RemoteCollection};
pub use config::{Config, ConfigError};
pub use reducer::{FocusRequester, NoopFocus, TodoEnvironment, TodoReducer};
pub use types::{
    Filter, ItemId, ItemPatch, NewItem, OwnerId, RemoteFailure, TodoAction, TodoError, TodoItem,
    TodoState,
};

/// Convenience alias for a fully wired store
pub type TodoStore = todosync_runtime::Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;
