//! Remote collection client.
//!
//! The coordinator talks to a generic CRUD collection of items keyed by an
//! owner id. The trait keeps the reducer independent of the transport; the
//! shipped implementation speaks JSON over HTTP.

use crate::types::{ItemId, ItemPatch, NewItem, OwnerId, RemoteFailure, TodoItem};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur talking to the remote collection.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure: connection, TLS, timeout, body decode
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("unexpected status {status} from {endpoint}")]
    Status {
        /// HTTP status returned
        status: reqwest::StatusCode,
        /// Endpoint path that produced it
        endpoint: String,
    },

    /// A failure that did not come from the collection protocol itself
    ///
    /// Implementations wrap adapter-level surprises here; the coordinator
    /// reports these as "something went wrong" rather than as the action's
    /// designated error.
    #[error("{0}")]
    Other(String),
}

impl From<ApiError> for RemoteFailure {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Other(message) => Self::Unexpected { message },
            recognized => Self::Api {
                message: recognized.to_string(),
            },
        }
    }
}

/// Boxed future returned by [`RemoteCollection`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Remote CRUD collection of to-do items.
///
/// # Design
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
/// `async fn` to enable trait object usage (`Arc<dyn RemoteCollection>`),
/// which is how the reducer environment holds it.
///
/// Calls are never cancelled or retried by the coordinator: once issued,
/// a call runs to completion or failure.
pub trait RemoteCollection: Send + Sync {
    /// Fetch every item owned by `owner`, in server order.
    fn fetch_all(&self, owner: OwnerId) -> ApiFuture<'_, Vec<TodoItem>>;

    /// Create an item. Returns the server representation, including the
    /// server-assigned id.
    fn create(&self, item: NewItem) -> ApiFuture<'_, TodoItem>;

    /// Patch the given fields of an item. Returns the server
    /// representation after the update.
    fn patch(&self, id: ItemId, change: ItemPatch) -> ApiFuture<'_, TodoItem>;

    /// Delete an item.
    fn delete(&self, id: ItemId) -> ApiFuture<'_, ()>;
}

/// HTTP implementation of [`RemoteCollection`].
///
/// Binds the trait to a conventional REST surface under a base URL:
/// `GET /todos?userId=`, `POST /todos`, `PATCH /todos/:id`,
/// `DELETE /todos/:id`.
#[derive(Clone, Debug)]
pub struct HttpRemoteCollection {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRemoteCollection {
    /// Creates a client for the collection served under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("todosync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                status,
                endpoint: response.url().path().to_string(),
            })
        }
    }
}

impl RemoteCollection for HttpRemoteCollection {
    fn fetch_all(&self, owner: OwnerId) -> ApiFuture<'_, Vec<TodoItem>> {
        Box::pin(async move {
            tracing::debug!(%owner, "fetching collection");
            let response = self
                .http
                .get(self.endpoint("todos"))
                .query(&[("userId", owner.get())])
                .send()
                .await?;
            let response = Self::expect_success(response).await?;
            Ok(response.json().await?)
        })
    }

    fn create(&self, item: NewItem) -> ApiFuture<'_, TodoItem> {
        Box::pin(async move {
            tracing::debug!(title = %item.title, "creating item");
            let response = self
                .http
                .post(self.endpoint("todos"))
                .json(&item)
                .send()
                .await?;
            let response = Self::expect_success(response).await?;
            Ok(response.json().await?)
        })
    }

    fn patch(&self, id: ItemId, change: ItemPatch) -> ApiFuture<'_, TodoItem> {
        Box::pin(async move {
            tracing::debug!(item = %id, "patching item");
            let response = self
                .http
                .patch(self.endpoint(&format!("todos/{id}")))
                .json(&change)
                .send()
                .await?;
            let response = Self::expect_success(response).await?;
            Ok(response.json().await?)
        })
    }

    fn delete(&self, id: ItemId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            tracing::debug!(item = %id, "deleting item");
            let response = self
                .http
                .delete(self.endpoint(&format!("todos/{id}")))
                .send()
                .await?;
            Self::expect_success(response).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        #[allow(clippy::unwrap_used)]
        let client = HttpRemoteCollection::new("https://example.test/api///").unwrap();
        assert_eq!(
            client.endpoint("todos"),
            "https://example.test/api/todos"
        );
        assert_eq!(
            client.endpoint("todos/7"),
            "https://example.test/api/todos/7"
        );
    }

    #[test]
    fn recognized_failures_keep_their_designation() {
        let failure: RemoteFailure = ApiError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            endpoint: "/todos/1".to_string(),
        }
        .into();
        assert!(matches!(failure, RemoteFailure::Api { .. }));

        let failure: RemoteFailure = ApiError::Other("adapter bug".to_string()).into();
        assert!(matches!(failure, RemoteFailure::Unexpected { .. }));
    }
}
