//! Reducer logic for the to-do list.
//!
//! Every user intent follows the same template: flag the affected items as
//! processing synchronously, issue the remote call as an effect, and
//! reconcile the list with the server-returned representation when the
//! completion action comes back. Completion actions are produced on the
//! success and failure paths alike, which is what releases the processing
//! flags unconditionally.

use crate::api::RemoteCollection;
use crate::types::{
    ItemId, ItemPatch, NewItem, OwnerId, RemoteFailure, TodoAction, TodoError, TodoState,
};
use std::sync::Arc;
use std::time::Duration;
use todosync_core::{
    SmallVec, async_effect, delay, effect::Effect, reducer::Reducer, smallvec,
};

/// Receiver of the "request focus" signal
///
/// Raised after delete and clear-completed settle so the view can return
/// the caret to the input field. Injected at construction; the coordinator
/// never reaches into view state directly.
pub trait FocusRequester: Send + Sync {
    /// Ask the view to focus the new-item input
    fn request_focus(&self);
}

/// Focus requester that ignores the signal (headless drivers, tests)
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopFocus;

impl FocusRequester for NoopFocus {
    fn request_focus(&self) {}
}

/// Environment dependencies for the to-do reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Remote collection the list is synchronized with
    pub api: Arc<dyn RemoteCollection>,
    /// Focus signal receiver
    pub focus: Arc<dyn FocusRequester>,
    /// Owner of the collection; stamped on every created item
    pub owner: OwnerId,
    /// How long an error banner stays up before auto-clearing
    pub error_ttl: Duration,
}

impl TodoEnvironment {
    /// Default error banner lifetime
    pub const DEFAULT_ERROR_TTL: Duration = Duration::from_secs(3);

    /// Creates a new environment with the default error lifetime
    #[must_use]
    pub fn new(
        api: Arc<dyn RemoteCollection>,
        focus: Arc<dyn FocusRequester>,
        owner: OwnerId,
    ) -> Self {
        Self {
            api,
            focus,
            owner,
            error_ttl: Self::DEFAULT_ERROR_TTL,
        }
    }

    /// Overrides the error banner lifetime
    #[must_use]
    pub const fn with_error_ttl(mut self, error_ttl: Duration) -> Self {
        self.error_ttl = error_ttl;
        self
    }
}

/// Reducer for the to-do list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Displays an error and arms the auto-clear timer
    ///
    /// Bumping the epoch supersedes any timer armed for an earlier error:
    /// the stale timer still fires but its epoch no longer matches.
    fn show_error(state: &mut TodoState, error_ttl: Duration, error: TodoError) -> Effect<TodoAction> {
        state.error = Some(error);
        state.error_epoch += 1;
        let epoch = state.error_epoch;

        delay! {
            duration: error_ttl,
            action: TodoAction::ErrorTimerElapsed { epoch }
        }
    }

    /// Maps a remote failure to the action's designated error kind
    ///
    /// Failures the client did not report itself are never misreported as
    /// an actionable error; they surface as `Unknown`.
    const fn error_for(failure: &RemoteFailure, fallback: TodoError) -> TodoError {
        match failure {
            RemoteFailure::Api { .. } => fallback,
            RemoteFailure::Unexpected { .. } => TodoError::Unknown,
        }
    }

    /// Records a failed remote call: logs it, displays the converted error,
    /// and arms the auto-clear timer
    fn fail(
        state: &mut TodoState,
        env: &TodoEnvironment,
        failure: &RemoteFailure,
        fallback: TodoError,
    ) -> Effect<TodoAction> {
        tracing::warn!(error = failure.message(), "remote call failed");
        Self::show_error(state, env.error_ttl, Self::error_for(failure, fallback))
    }

    /// Raises the focus signal once the current action has settled
    fn focus_effect(env: &TodoEnvironment) -> Effect<TodoAction> {
        let focus = Arc::clone(&env.focus);
        async_effect! {
            focus.request_focus();
            None::<TodoAction>
        }
    }

    /// Issues a patch for one item, feeding back `Updated`/`UpdateFailed`
    fn patch_effect(env: &TodoEnvironment, id: ItemId, change: ItemPatch) -> Effect<TodoAction> {
        let api = Arc::clone(&env.api);
        async_effect! {
            match api.patch(id, change).await {
                Ok(item) => Some(TodoAction::Updated { item }),
                Err(error) => Some(TodoAction::UpdateFailed {
                    id,
                    failure: error.into(),
                }),
            }
        }
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per user action and completion
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::Load => {
                state.loading = true;
                state.error = None;

                let api = Arc::clone(&env.api);
                let owner = env.owner;
                smallvec![async_effect! {
                    match api.fetch_all(owner).await {
                        Ok(items) => Some(TodoAction::Loaded { items }),
                        Err(error) => Some(TodoAction::LoadFailed {
                            failure: error.into(),
                        }),
                    }
                }]
            },

            TodoAction::Add { title } => {
                let title = title.trim();
                if title.is_empty() {
                    // Validated locally; no remote call is issued
                    return smallvec![Self::show_error(
                        state,
                        env.error_ttl,
                        TodoError::TitleShouldNotBeEmpty,
                    )];
                }

                // The placeholder doubles as the processing flag for
                // creation: it has no id, so it cannot collide with a real
                // item.
                let new_item = NewItem::new(env.owner, title.to_string());
                state.set_placeholder(Some(new_item.clone()));

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.create(new_item).await {
                        Ok(item) => Some(TodoAction::Added { item }),
                        Err(error) => Some(TodoAction::AddFailed {
                            failure: error.into(),
                        }),
                    }
                }]
            },

            TodoAction::Delete { id } => {
                state.processing.insert(id);

                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    match api.delete(id).await {
                        Ok(()) => Some(TodoAction::Deleted { id }),
                        Err(error) => Some(TodoAction::DeleteFailed {
                            id,
                            failure: error.into(),
                        }),
                    }
                }]
            },

            TodoAction::Toggle { id } => {
                let Some(completed) = state.get(id).map(|item| item.completed) else {
                    return SmallVec::new();
                };

                state.processing.insert(id);
                smallvec![Self::patch_effect(env, id, ItemPatch::completed(!completed))]
            },

            TodoAction::Rename { id, title } => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    // An empty rename is a delete request
                    return self.reduce(state, TodoAction::Delete { id }, env);
                }

                let Some(current) = state.get(id).map(|item| item.title.clone()) else {
                    return SmallVec::new();
                };
                if current == trimmed {
                    // Nothing changed; no call, no processing flag
                    return SmallVec::new();
                }

                state.processing.insert(id);
                smallvec![Self::patch_effect(
                    env,
                    id,
                    ItemPatch::title(trimmed.to_string()),
                )]
            },

            TodoAction::ToggleAll => {
                let target = !state.all_completed();
                let ids: Vec<ItemId> = state
                    .items
                    .iter()
                    .filter(|item| item.completed != target)
                    .map(|item| item.id)
                    .collect();
                if ids.is_empty() {
                    return SmallVec::new();
                }

                // Fan-out with independent completion: one branch per item,
                // a failure on one never rolls back the others
                let mut branches = Vec::with_capacity(ids.len());
                for id in ids {
                    state.processing.insert(id);
                    branches.push(Self::patch_effect(env, id, ItemPatch::completed(target)));
                }
                smallvec![Effect::merge(branches)]
            },

            TodoAction::ClearCompleted => {
                let ids: Vec<ItemId> = state
                    .items
                    .iter()
                    .filter(|item| item.completed)
                    .map(|item| item.id)
                    .collect();
                state.processing.extend(ids.iter().copied());

                // One future that waits for every delete to settle and
                // reports the batch outcome at once
                let api = Arc::clone(&env.api);
                smallvec![async_effect! {
                    let outcomes =
                        futures::future::join_all(ids.iter().map(|id| api.delete(*id))).await;

                    let mut removed = Vec::new();
                    let mut failed = Vec::new();
                    for (id, outcome) in ids.iter().zip(outcomes) {
                        match outcome {
                            Ok(()) => removed.push(*id),
                            Err(error) => {
                                tracing::warn!(item = %id, error = %error, "delete failed");
                                failed.push(*id);
                            },
                        }
                    }

                    Some(TodoAction::CompletedCleared { removed, failed })
                }]
            },

            TodoAction::DismissError => {
                state.error = None;
                SmallVec::new()
            },

            // ========== Completions ==========
            TodoAction::Loaded { items } => {
                state.loading = false;
                state.items = items;
                SmallVec::new()
            },

            TodoAction::LoadFailed { failure } => {
                state.loading = false;
                smallvec![Self::fail(state, env, &failure, TodoError::UnableToLoad)]
            },

            TodoAction::Added { item } => {
                state.set_placeholder(None);
                state.push(item);
                SmallVec::new()
            },

            TodoAction::AddFailed { failure } => {
                state.set_placeholder(None);
                smallvec![Self::fail(state, env, &failure, TodoError::UnableToAdd)]
            },

            TodoAction::Deleted { id } => {
                state.remove(id);
                state.processing.remove(&id);
                smallvec![Self::focus_effect(env)]
            },

            TodoAction::DeleteFailed { id, failure } => {
                state.processing.remove(&id);
                smallvec![
                    Self::fail(state, env, &failure, TodoError::UnableToDelete),
                    Self::focus_effect(env),
                ]
            },

            TodoAction::Updated { item } => {
                state.processing.remove(&item.id);
                state.replace(item);
                SmallVec::new()
            },

            TodoAction::UpdateFailed { id, failure } => {
                state.processing.remove(&id);
                smallvec![Self::fail(state, env, &failure, TodoError::UnableToUpdate)]
            },

            TodoAction::CompletedCleared { removed, failed } => {
                for id in &removed {
                    state.remove(*id);
                    state.processing.remove(id);
                }
                for id in &failed {
                    state.processing.remove(id);
                }

                let mut effects = SmallVec::new();
                if !failed.is_empty() {
                    // One aggregate error per batch, however many failed
                    effects.push(Self::show_error(
                        state,
                        env.error_ttl,
                        TodoError::UnableToDelete,
                    ));
                }
                effects.push(Self::focus_effect(env));
                effects
            },

            TodoAction::ErrorTimerElapsed { epoch } => {
                // A timer armed for an earlier error is stale; ignore it
                if state.error_epoch == epoch {
                    state.error = None;
                }
                SmallVec::new()
            },
        }
    }
}
