use chrono::{DateTime, Duration, Utc};
use im::Vector;

use crate::model::{Album, Artist, Genre, Mood, PageWindow, Song, Stats};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub songs: Vector<Song>,
    pub albums: Vector<Album>,
    pub artists: Vector<Artist>,
    pub genres: Vector<Genre>,
    pub moods: Vector<Mood>,

    pub featured_songs: Vector<Song>,
    pub made_for_you_songs: Vector<Song>,
    pub trending_songs: Vector<Song>,
    pub recently_listened_songs: Vector<Song>,
    pub favorite_artists: Vector<Artist>,
    pub new_releases: Vector<Album>,

    pub current_album: Option<Album>,
    pub artist_appears_on: Vector<Album>,
    pub is_appears_on_loading: bool,

    pub stats: Stats,

    pub paginated_songs: PageWindow<Song>,
    pub paginated_albums: PageWindow<Album>,
    pub paginated_artists: PageWindow<Artist>,

    pub is_loading: bool,
    pub error: Option<String>,

    pub home_page_data_last_fetched: Option<DateTime<Utc>>,
}

impl CatalogState {
    pub fn home_page_is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.home_page_data_last_fetched
            .is_some_and(|fetched| now - fetched < ttl)
    }

    pub fn song(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn find_song(&self, id: &str) -> Option<&Song> {
        self.song(id)
            .or_else(|| self.paginated_songs.items.iter().find(|s| s.id == id))
    }

    pub fn album(&self, id: &str) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn artist(&self, id: &str) -> Option<&Artist> {
        self.artists.iter().find(|a| a.id == id)
    }
}
