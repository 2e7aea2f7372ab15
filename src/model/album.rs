use serde::{Deserialize, Serialize};

use super::{
    artist::Artist,
    reference::{Entity, EntityRef, Named},
    song::Song,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Vec<EntityRef<Artist>>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub songs: Vec<EntityRef<Song>>,
}

impl Album {
    pub fn has_artist(&self, artist_id: &str) -> bool {
        self.artist.iter().any(|a| a.refers_to(artist_id))
    }

    pub fn annotate_songs(&mut self) {
        for song in self.songs.iter_mut() {
            if let EntityRef::Inline(song) = song {
                song.album_title = Some(self.title.clone());
            }
        }
    }
}

impl Entity for Album {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Named for Album {
    fn name(&self) -> &str {
        &self.title
    }
}
