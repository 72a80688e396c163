//! Shows API endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{List, Resource};
use crate::{client::Client, error::Result};

/// A show (podcast) hosting episodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    /// Unique identifier
    pub id: String,
    /// Always `"show"`
    pub object: String,
    /// Show title
    pub title: String,
    /// Show description
    #[serde(default)]
    pub description: Option<String>,
    /// Author displayed in directories
    #[serde(default)]
    pub author: Option<String>,
}

/// Shows API resource.
#[derive(Clone)]
pub struct Shows {
    client: Client,
}

impl Shows {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch a single show.
    pub async fn get(&self, id: &str) -> Result<Show> {
        self.client
            .get(&format!("/v1/shows/{id}"), None)
            .await?
            .parse()
    }

    /// List shows.
    pub async fn list(&self, params: Option<Value>) -> Result<List<Show>> {
        self.client.get("/v1/shows", params).await?.parse()
    }

    /// Update a show.
    pub async fn update(&self, id: &str, params: Value) -> Result<Show> {
        self.client
            .post(&format!("/v1/shows/{id}"), params)
            .await?
            .parse()
    }
}

impl Resource for Shows {
    fn client(&self) -> &Client {
        &self.client
    }
}
