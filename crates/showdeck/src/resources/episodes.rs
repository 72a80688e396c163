//! Episodes API endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Deleted, List, Resource};
use crate::{client::Client, error::Result, scope::Scope};

/// An episode of a show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Unique identifier
    pub id: String,
    /// Always `"episode"`
    pub object: String,
    /// Episode title
    pub title: String,
    /// Owning show's identifier
    #[serde(default)]
    pub show: Option<String>,
    /// Position within the show
    #[serde(default)]
    pub number: Option<u32>,
    /// Publication timestamp
    #[serde(default)]
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Hosted audio URL
    #[serde(default)]
    pub audio_url: Option<String>,
    /// Audio duration in seconds
    #[serde(default)]
    pub duration_secs: Option<u32>,
    /// Marked explicit
    #[serde(default)]
    pub explicit: Option<bool>,
}

impl Episode {
    /// Fetch an episode through the task's active client (or the default
    /// client when none is bound).
    pub async fn retrieve(id: &str) -> Result<Episode> {
        let client = Scope::active_or_default()?;
        let episode = client.episodes().get(id).await?;
        Ok(episode)
    }

    /// Create an episode through the task's active client.
    pub async fn create(params: Value) -> Result<Episode> {
        let client = Scope::active_or_default()?;
        let episode = client.episodes().create(params).await?;
        Ok(episode)
    }

    /// List episodes through the task's active client.
    pub async fn list(params: Option<Value>) -> Result<List<Episode>> {
        let client = Scope::active_or_default()?;
        let page = client.episodes().list(params).await?;
        Ok(page)
    }
}

/// Episodes API resource.
#[derive(Clone)]
pub struct Episodes {
    client: Client,
}

impl Episodes {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch a single episode.
    pub async fn get(&self, id: &str) -> Result<Episode> {
        self.client
            .get(&format!("/v1/episodes/{id}"), None)
            .await?
            .parse()
    }

    /// List episodes, optionally filtered.
    pub async fn list(&self, params: Option<Value>) -> Result<List<Episode>> {
        self.client.get("/v1/episodes", params).await?.parse()
    }

    /// Create an episode.
    pub async fn create(&self, params: Value) -> Result<Episode> {
        self.client.post("/v1/episodes", params).await?.parse()
    }

    /// Update an episode.
    pub async fn update(&self, id: &str, params: Value) -> Result<Episode> {
        self.client
            .post(&format!("/v1/episodes/{id}"), params)
            .await?
            .parse()
    }

    /// Delete an episode.
    pub async fn delete(&self, id: &str) -> Result<Deleted> {
        self.client
            .delete(&format!("/v1/episodes/{id}"), None)
            .await?
            .parse()
    }
}

impl Resource for Episodes {
    fn client(&self) -> &Client {
        &self.client
    }
}
