use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_songs: u64,
    #[serde(default)]
    pub total_albums: u64,
    #[serde(default)]
    pub total_artists: u64,
    #[serde(default)]
    pub total_users: u64,
}
