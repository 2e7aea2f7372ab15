use super::state::CatalogState;
use crate::model::{Album, Artist, Song};

pub fn remove_song(state: &mut CatalogState, song_id: &str) {
    state.songs.retain(|s| s.id != song_id);
}

pub fn remove_album(state: &mut CatalogState, album_id: &str) {
    state.albums.retain(|a| a.id != album_id);
    for song in state.songs.iter_mut() {
        if song.album_id.as_deref() == Some(album_id) {
            song.album_id = None;
        }
    }
}

pub fn remove_artist(state: &mut CatalogState, artist_id: &str) {
    state.artists.retain(|a| a.id != artist_id);

    for song in state.songs.iter_mut() {
        if song.has_artist(artist_id) {
            song.artist.retain(|a| !a.refers_to(artist_id));
        }
    }
    state.songs.retain(|s| !s.artist.is_empty());

    for album in state.albums.iter_mut() {
        if album.has_artist(artist_id) {
            album.artist.retain(|a| !a.refers_to(artist_id));
        }
    }
    state.albums.retain(|a| !a.artist.is_empty());
}

pub fn replace_song(state: &mut CatalogState, song: Song) {
    if let Some(slot) = state.songs.iter_mut().find(|s| s.id == song.id) {
        *slot = song;
    }
}

pub fn replace_artist(state: &mut CatalogState, artist: Artist) {
    if let Some(slot) = state.artists.iter_mut().find(|a| a.id == artist.id) {
        *slot = artist;
    }
}

pub fn insert_song(state: &mut CatalogState, song: Song) {
    state.songs.push_back(song);
}

pub fn annotate_album(mut album: Album) -> Album {
    album.annotate_songs();
    album
}
