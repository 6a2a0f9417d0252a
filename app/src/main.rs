//! CLI demo for the todosync core.
//!
//! Drives the store against the configured remote collection: loads the
//! list, adds an item, toggles it, clears completed items, and prints the
//! filter projections along the way.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use todosync_app::{
    Config, Filter, HttpRemoteCollection, NoopFocus, TodoAction, TodoEnvironment, TodoReducer,
    TodoState, TodoStore,
};
use todosync_runtime::Store;

const ACTION_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let api = Arc::new(
        HttpRemoteCollection::new(config.base_url.clone()).context("building HTTP client")?,
    );
    let env = TodoEnvironment::new(api, Arc::new(NoopFocus), config.owner)
        .with_error_ttl(config.error_ttl);
    let store = Store::new(TodoState::new(), TodoReducer::new(), env);

    println!("=== todosync demo ===\n");

    // Populate from the remote collection
    let outcome = store
        .send_and_wait_for(
            TodoAction::Load,
            |a| matches!(a, TodoAction::Loaded { .. } | TodoAction::LoadFailed { .. }),
            ACTION_TIMEOUT,
        )
        .await?;
    if let TodoAction::LoadFailed { failure } = outcome {
        anyhow::bail!("unable to load todos: {}", failure.message());
    }
    print_list(&store, Filter::All).await;

    // Add an item, keeping the typed title if the create fails
    let title = "Try todosync".to_string();
    println!("\nAdding {title:?}...");
    let outcome = store
        .send_and_wait_for(
            TodoAction::Add {
                title: title.clone(),
            },
            |a| matches!(a, TodoAction::Added { .. } | TodoAction::AddFailed { .. }),
            ACTION_TIMEOUT,
        )
        .await?;
    let added = match outcome {
        TodoAction::Added { item } => item,
        TodoAction::AddFailed { failure } => {
            anyhow::bail!("unable to add {title:?} (kept for retry): {}", failure.message());
        },
        _ => anyhow::bail!("unexpected completion"),
    };
    print_list(&store, Filter::All).await;

    // Complete it
    println!("\nCompleting {:?}...", added.title);
    store
        .send_and_wait_for(
            TodoAction::Toggle { id: added.id },
            |a| matches!(a, TodoAction::Updated { .. } | TodoAction::UpdateFailed { .. }),
            ACTION_TIMEOUT,
        )
        .await?;
    print_list(&store, Filter::Active).await;
    print_list(&store, Filter::Completed).await;

    // Clear completed items
    println!("\nClearing completed items...");
    store
        .send_and_wait_for(
            TodoAction::ClearCompleted,
            |a| matches!(a, TodoAction::CompletedCleared { .. }),
            ACTION_TIMEOUT,
        )
        .await?;
    print_list(&store, Filter::All).await;

    if let Some(error) = store.state(|s| s.error).await {
        println!("\nlast error: {error}");
    }

    store
        .shutdown(Duration::from_secs(5))
        .await
        .context("draining pending effects")?;

    println!("\n=== demo complete ===");
    Ok(())
}

async fn print_list(store: &TodoStore, filter: Filter) {
    let (lines, left) = store
        .state(|s| {
            let lines: Vec<String> = s
                .visible(filter)
                .map(|item| {
                    let status = if item.completed { "✓" } else { " " };
                    format!("  [{status}] {}", item.title)
                })
                .collect();
            (lines, s.items_left())
        })
        .await;

    println!("{filter:?} ({left} items left):");
    for line in lines {
        println!("{line}");
    }
}
