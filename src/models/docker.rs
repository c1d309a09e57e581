use serde::{Deserialize, Serialize};

/// Containers known to the server, offered as completions for the
/// docker-restart and NPM container fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerInventory {
    pub docker_available: bool,
    #[serde(default)]
    pub containers: Vec<DockerContainer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerContainer {
    pub id: String,
    pub short_id: String,
    pub name: String,
    pub status: String,
}
