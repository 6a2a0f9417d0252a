//! Domain types for the to-do list core.
//!
//! The state here is what a view renders: the authoritative item list as of
//! the last completed remote call, plus the optimistic bookkeeping around
//! in-flight calls (placeholder row, per-item processing set, transient
//! error banner).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Unique identifier for a to-do item, assigned by the remote collection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Creates an `ItemId` from a raw server-assigned value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the collection owner
///
/// Constant for the lifetime of the app; every item in the collection
/// belongs to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(i64);

impl OwnerId {
    /// Creates an `OwnerId` from a raw value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single to-do item as known to the remote collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Server-assigned identifier, immutable once assigned
    pub id: ItemId,
    /// Owner of the collection this item belongs to
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    /// Title of the item, non-empty after trimming
    pub title: String,
    /// Whether the item is completed
    pub completed: bool,
}

/// Payload for creating a new item
///
/// Also serves as the placeholder rendered while the create call is in
/// flight: a placeholder has no id by construction, so it can never collide
/// with a real item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewItem {
    /// Owner of the collection
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    /// Title of the item to create
    pub title: String,
    /// Initial completion state (always false for user-created items)
    pub completed: bool,
}

impl NewItem {
    /// Creates a new-item payload with the given owner and title
    #[must_use]
    pub const fn new(owner: OwnerId, title: String) -> Self {
        Self {
            owner,
            title,
            completed: false,
        }
    }
}

/// Partial update payload for an existing item
///
/// `None` fields are omitted from the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ItemPatch {
    /// New title, if the title is being changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion state, if it is being changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl ItemPatch {
    /// Patch that changes only the title
    #[must_use]
    pub const fn title(title: String) -> Self {
        Self {
            title: Some(title),
            completed: None,
        }
    }

    /// Patch that changes only the completion state
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// User-visible errors, one per failed action kind
///
/// At most one is displayed at a time; the latest wins and re-arms the
/// auto-clear timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TodoError {
    /// The initial fetch failed
    #[error("Unable to load todos")]
    UnableToLoad,
    /// A create call failed
    #[error("Unable to add a todo")]
    UnableToAdd,
    /// A delete call failed
    #[error("Unable to delete a todo")]
    UnableToDelete,
    /// A patch call failed
    #[error("Unable to update a todo")]
    UnableToUpdate,
    /// The submitted title was empty after trimming
    #[error("Title should not be empty")]
    TitleShouldNotBeEmpty,
    /// A failure that was not reported by the remote collection client
    #[error("Something went wrong")]
    Unknown,
}

/// Outcome of a remote call that did not succeed
///
/// Completion actions carry this instead of the client error itself so that
/// actions stay cheap to clone across the broadcast channel. The
/// distinction matters for error conversion: a failure the client reported
/// maps to the action's designated [`TodoError`], anything that escaped the
/// client maps to [`TodoError::Unknown`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteFailure {
    /// A failure reported by the remote collection client
    Api {
        /// Human-readable description, for logging
        message: String,
    },
    /// Anything else that escaped the client (adapter bugs, panics)
    Unexpected {
        /// Human-readable description, for logging
        message: String,
    },
}

impl RemoteFailure {
    /// Returns the failure description
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Api { message } | Self::Unexpected { message } => message,
        }
    }
}

/// Visibility filter over the item list
///
/// Purely a read-side projection; never sent to the remote collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    /// Show every item
    #[default]
    All,
    /// Show items that are not completed
    Active,
    /// Show completed items
    Completed,
}

impl Filter {
    /// Whether an item is visible under this filter
    #[must_use]
    pub const fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }
}

/// State of the to-do list
///
/// `items` is the last-known-good list in server order. Everything else is
/// optimistic bookkeeping: it is displayed but never persisted.
#[derive(Clone, Debug, Default)]
pub struct TodoState {
    /// Authoritative ordered item list
    pub items: Vec<TodoItem>,
    /// Ghost row shown while a create call is in flight
    pub placeholder: Option<NewItem>,
    /// Ids currently blocked on an in-flight remote call
    pub processing: HashSet<ItemId>,
    /// Currently displayed error, if any
    pub error: Option<TodoError>,
    /// Generation counter for the error auto-clear timer; a pending timer
    /// only clears the error if its epoch still matches
    pub error_epoch: u64,
    /// Whether the initial fetch is in flight
    pub loading: bool,
}

impl TodoState {
    /// Creates a new empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an item by id
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Replaces the item with the same id as `updated`
    ///
    /// No-op if the id is not present.
    pub fn replace(&mut self, updated: TodoItem) {
        if let Some(slot) = self.items.iter_mut().find(|item| item.id == updated.id) {
            *slot = updated;
        }
    }

    /// Removes the item with the given id, keeping order
    pub fn remove(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
    }

    /// Appends an item at the end of the list
    pub fn push(&mut self, item: TodoItem) {
        self.items.push(item);
    }

    /// Installs or clears the creation placeholder
    pub fn set_placeholder(&mut self, placeholder: Option<NewItem>) {
        self.placeholder = placeholder;
    }

    /// Number of items not yet completed
    #[must_use]
    pub fn items_left(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    /// Whether every item is completed
    ///
    /// Vacuously true for an empty list.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.items.iter().all(|item| item.completed)
    }

    /// Whether at least one item is completed
    #[must_use]
    pub fn has_completed(&self) -> bool {
        self.items.iter().any(|item| item.completed)
    }

    /// Whether the item is blocked on an in-flight remote call
    #[must_use]
    pub fn is_processing(&self, id: ItemId) -> bool {
        self.processing.contains(&id)
    }

    /// Whether a create call is in flight (gates the input form)
    #[must_use]
    pub const fn is_adding(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Items visible under the given filter, in list order
    pub fn visible(&self, filter: Filter) -> impl Iterator<Item = &TodoItem> {
        self.items.iter().filter(move |item| filter.matches(item))
    }
}

/// Actions processed by the to-do reducer
///
/// Commands express user intent; the remaining variants are completions fed
/// back by effects once a remote call settles.
#[derive(Clone, Debug)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: fetch the full collection
    Load,

    /// Command: create a new item with the given title
    Add {
        /// Raw title as typed; trimmed before use
        title: String,
    },

    /// Command: delete an item
    Delete {
        /// Item to delete
        id: ItemId,
    },

    /// Command: flip an item's completion state
    Toggle {
        /// Item to toggle
        id: ItemId,
    },

    /// Command: change an item's title
    ///
    /// An empty trimmed title is reinterpreted as [`TodoAction::Delete`];
    /// an unchanged trimmed title is a no-op.
    Rename {
        /// Item to rename
        id: ItemId,
        /// Raw replacement title as typed; trimmed before use
        title: String,
    },

    /// Command: drive every item to the same completion state
    ToggleAll,

    /// Command: delete every completed item
    ClearCompleted,

    /// Command: dismiss the current error banner
    DismissError,

    // ========== Completions ==========
    /// The initial fetch succeeded
    Loaded {
        /// Full collection in server order
        items: Vec<TodoItem>,
    },

    /// The initial fetch failed
    LoadFailed {
        /// What went wrong
        failure: RemoteFailure,
    },

    /// A create call succeeded
    Added {
        /// Server-authoritative representation of the created item
        item: TodoItem,
    },

    /// A create call failed
    AddFailed {
        /// What went wrong
        failure: RemoteFailure,
    },

    /// A delete call succeeded
    Deleted {
        /// Item that was deleted
        id: ItemId,
    },

    /// A delete call failed
    DeleteFailed {
        /// Item whose delete failed
        id: ItemId,
        /// What went wrong
        failure: RemoteFailure,
    },

    /// A patch call succeeded (toggle or rename)
    Updated {
        /// Server-authoritative representation of the patched item
        item: TodoItem,
    },

    /// A patch call failed
    UpdateFailed {
        /// Item whose patch failed
        id: ItemId,
        /// What went wrong
        failure: RemoteFailure,
    },

    /// A clear-completed batch settled
    ///
    /// Carries the exact partition of the batch so the reducer can remove
    /// precisely the succeeded subset and release every processing flag.
    CompletedCleared {
        /// Ids whose delete succeeded
        removed: Vec<ItemId>,
        /// Ids whose delete failed
        failed: Vec<ItemId>,
    },

    /// The error auto-clear timer fired
    ErrorTimerElapsed {
        /// Epoch the timer was armed with; stale timers are ignored
        epoch: u64,
    },
}
