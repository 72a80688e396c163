//! Client session scope
//!
//! Binds one active client to the current task for the duration of a
//! logical call, so resource entry points can find it implicitly instead
//! of threading a handle everywhere. The binding is a `task_local`: scope
//! entry shadows any outer binding, and every exit path (return, error,
//! cancellation) restores it. Tasks never observe each other's binding.
//!
//! When no client is bound, a per-thread default client is built lazily
//! from the process-global configuration snapshot.

use std::cell::RefCell;
use std::future::Future;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::ApiResponse;

tokio::task_local! {
    static ACTIVE_CLIENT: Client;
}

thread_local! {
    static DEFAULT_CLIENT: RefCell<Option<Client>> = const { RefCell::new(None) };
}

/// Access to the task's active-client binding.
pub struct Scope;

impl Scope {
    /// The client bound by the innermost enclosing [`run_scoped`], if any.
    pub fn current() -> Option<Client> {
        ACTIVE_CLIENT.try_with(Client::clone).ok()
    }

    /// The active client, or this thread's lazily-created default client
    /// configured from the process-global snapshot.
    pub fn active_or_default() -> Result<Client> {
        match Self::current() {
            Some(client) => Ok(client),
            None => default_client(),
        }
    }
}

fn default_client() -> Result<Client> {
    DEFAULT_CLIENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let config = ClientConfig::global().cloned().unwrap_or_default();
        let client = Client::from_config(config)?;
        *slot = Some(client.clone());
        Ok(client)
    })
}

/// Run `block` with `client` as the task's active client, restoring the
/// previous binding on every exit path, and return the block's result
/// together with the last response the client recorded during the scope.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> showdeck::Result<()> {
/// use showdeck::{Client, Episode, scope::run_scoped};
///
/// let client = Client::new("sk_live_...");
/// let (episode, last) = run_scoped(&client, || async {
///     Episode::retrieve("ep_123").await
/// })
/// .await;
/// let episode = episode?;
/// println!("{} (HTTP {})", episode.title, last.unwrap().status());
/// # Ok(())
/// # }
/// ```
pub async fn run_scoped<T, F, Fut>(client: &Client, block: F) -> (T, Option<ApiResponse>)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let result = ACTIVE_CLIENT.scope(client.clone(), block()).await;
    (result, client.last_response())
}
