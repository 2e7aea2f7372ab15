use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    artist::Artist,
    reference::{Entity, EntityRef, Named},
    taxonomy::{Genre, Mood},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Vec<EntityRef<Artist>>,
    #[serde(default)]
    pub album_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub genres: Vec<EntityRef<Genre>>,
    #[serde(default)]
    pub moods: Vec<EntityRef<Mood>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_title: Option<String>,
}

impl Song {
    pub fn is_single(&self) -> bool {
        self.album_id.is_none()
    }

    pub fn has_artist(&self, artist_id: &str) -> bool {
        self.artist.iter().any(|a| a.refers_to(artist_id))
    }
}

impl Entity for Song {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Named for Song {
    fn name(&self) -> &str {
        &self.title
    }
}
