//! The caller's own identity

use serde::Deserialize;

use super::{ApiError, Client};

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub id: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

pub struct ActorsApi<'a> {
    client: &'a Client,
}

impl<'a> ActorsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /actor
    pub async fn get(&self) -> Result<Actor, ApiError> {
        self.client.get("/actor").await
    }
}
