pub mod cascade;
pub mod state;
#[cfg(test)]
pub mod testing;

use std::{
    future::Future,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use arc_swap::ArcSwap;
use chrono::Utc;
use flume::{Receiver, Sender};
use im::Vector;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, error, info, warn};

use crate::{
    error::{ApiError, StoreError},
    event::{Notification, StoreEvent},
    http::{ArtistForm, CatalogApi, SongForm},
    model::{Album, Artist, Genre, Mood, Page, PageWindow, Song, Stats},
};
use state::CatalogState;

#[derive(Clone, Deserialize)]
struct SongsEnvelope {
    #[serde(default)]
    songs: Vector<Song>,
}

#[derive(Clone, Deserialize)]
struct AlbumEnvelope {
    album: Album,
}

struct LoadingGuard<'a> {
    store: &'a CatalogStore,
    flag: fn(&mut CatalogState) -> &mut bool,
}

impl<'a> LoadingGuard<'a> {
    fn begin(store: &'a CatalogStore) -> Self {
        Self::on(store, |s| &mut s.is_loading)
    }

    fn on(store: &'a CatalogStore, flag: fn(&mut CatalogState) -> &mut bool) -> Self {
        store.update(|s| {
            *flag(s) = true;
            s.error = None;
        });
        Self { store, flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let flag = self.flag;
        self.store.update(|s| *flag(s) = false);
    }
}

#[derive(Default)]
struct PageGenerations {
    songs: AtomicU64,
    albums: AtomicU64,
    artists: AtomicU64,
}

/// Actions share one `is_loading`/`error` slot, so with several actions in
/// flight the last one to settle decides what is shown.
pub struct CatalogStore {
    api: Arc<dyn CatalogApi>,
    state: ArcSwap<CatalogState>,
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
    page_generations: PageGenerations,
}

impl CatalogStore {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            state: ArcSwap::from_pointee(CatalogState::default()),
            subscribers: Mutex::new(Vec::new()),
            page_generations: PageGenerations::default(),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogState> {
        self.state.load_full()
    }

    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = flume::unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn emit(&self, event: StoreEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn update<F>(&self, f: F)
    where
        F: Fn(&mut CatalogState),
    {
        self.state.rcu(|current| {
            let mut next = CatalogState::clone(current);
            f(&mut next);
            next
        });
        self.emit(StoreEvent::StateChanged(self.snapshot()));
    }

    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            warn!("{}", notification.message);
        } else {
            info!("{}", notification.message);
        }
        self.emit(StoreEvent::Notification(notification));
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let body = self.api.get(path, query).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn load<T, F>(&self, path: &str, failure: &'static str, apply: F) -> Result<(), StoreError>
    where
        T: DeserializeOwned + Clone,
        F: Fn(&mut CatalogState, T),
    {
        let _loading = LoadingGuard::begin(self);
        debug!(path, "Loading catalog data");

        match self.fetch::<T>(path, &[]).await {
            Ok(payload) => {
                self.update(|s| apply(s, payload.clone()));
                Ok(())
            }
            Err(e) => {
                self.record_failure(path, failure, &e);
                Err(e.into())
            }
        }
    }

    fn record_failure(&self, path: &str, failure: &'static str, e: &ApiError) {
        warn!(path, kind = e.kind(), "{}: {}", failure, e);
        let message = e.server_message().unwrap_or(failure).to_string();
        self.update(|s| s.error = Some(message.clone()));
    }

    async fn load_best_effort<T, F>(&self, path: &str, failure: &'static str, apply: F) -> bool
    where
        T: DeserializeOwned + Clone,
        F: Fn(&mut CatalogState, T),
    {
        match self.fetch::<T>(path, &[]).await {
            Ok(payload) => {
                self.update(|s| apply(s, payload.clone()));
                true
            }
            Err(e) => {
                error!(path, kind = e.kind(), "{}: {}", failure, e);
                false
            }
        }
    }

    async fn load_page<T>(
        &self,
        path: &str,
        generation: &AtomicU64,
        page: u32,
        limit: u32,
        window: fn(&mut CatalogState) -> &mut PageWindow<T>,
    ) -> Result<(), StoreError>
    where
        T: DeserializeOwned + Clone,
    {
        let issued = generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = LoadingGuard::begin(self);
        debug!(path, page, limit, "Loading page");

        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        let result = self.fetch::<Page<T>>(path, &query).await;

        if generation.load(Ordering::SeqCst) != issued {
            debug!(path, page, "Discarding response for a superseded page request");
            return Ok(());
        }

        match result {
            Ok(response) => {
                let fresh = PageWindow::from(response);
                self.update(|s| *window(s) = fresh.clone());
                Ok(())
            }
            Err(e) => {
                self.record_failure(path, "Failed to fetch page", &e);
                Err(e.into())
            }
        }
    }

    async fn mutate<T, Fut, F>(
        &self,
        request: Fut,
        apply: F,
        success: &str,
        failure: &str,
    ) -> Result<(), StoreError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
        T: Clone,
        F: Fn(&mut CatalogState, T),
    {
        let _loading = LoadingGuard::begin(self);

        match request.await {
            Ok(payload) => {
                self.update(|s| apply(s, payload.clone()));
                self.notify(Notification::success(success));
                Ok(())
            }
            Err(e) => {
                warn!(kind = e.kind(), "{}: {}", failure, e);
                self.notify(Notification::error(format!(
                    "{}: {}",
                    failure,
                    e.user_message()
                )));
                Err(e.into())
            }
        }
    }

    fn reject(&self, e: crate::error::ValidationError) -> StoreError {
        self.notify(Notification::error(e.to_string()));
        e.into()
    }

    // Reads

    pub async fn fetch_albums(&self) -> Result<(), StoreError> {
        self.load("/albums", "Failed to fetch albums", |s, albums: Vector<Album>| {
            s.albums = albums
        })
        .await
    }

    pub async fn fetch_album_by_id(&self, id: &str) -> Result<(), StoreError> {
        let path = format!("/albums/{id}");
        self.load(
            &path,
            "Failed to fetch album",
            |s, body: AlbumEnvelope| s.current_album = Some(cascade::annotate_album(body.album)),
        )
        .await
    }

    pub async fn fetch_songs(&self) -> Result<(), StoreError> {
        self.load("/songs", "Failed to fetch songs", |s, body: SongsEnvelope| {
            s.songs = body.songs
        })
        .await
    }

    pub async fn fetch_featured_songs(&self) -> Result<(), StoreError> {
        self.load(
            "/songs/featured",
            "Failed to fetch featured songs",
            |s, songs: Vector<Song>| {
                s.featured_songs = songs;
                s.home_page_data_last_fetched = Some(Utc::now());
            },
        )
        .await
    }

    pub async fn fetch_made_for_you_songs(&self) -> Result<(), StoreError> {
        self.load(
            "/songs/made-for-you",
            "Failed to fetch made for you songs",
            |s, songs: Vector<Song>| {
                s.made_for_you_songs = songs;
                s.home_page_data_last_fetched = Some(Utc::now());
            },
        )
        .await
    }

    pub async fn fetch_trending_songs(&self) -> Result<(), StoreError> {
        self.load(
            "/songs/trending",
            "Failed to fetch trending songs",
            |s, songs: Vector<Song>| {
                s.trending_songs = songs;
                s.home_page_data_last_fetched = Some(Utc::now());
            },
        )
        .await
    }

    pub async fn refresh_home_page(&self) -> Result<(), StoreError> {
        let (featured, made_for_you, trending) = futures::join!(
            self.fetch_featured_songs(),
            self.fetch_made_for_you_songs(),
            self.fetch_trending_songs()
        );
        featured.and(made_for_you).and(trending)
    }

    pub async fn fetch_artists(&self) -> Result<(), StoreError> {
        self.load("/artists", "Failed to fetch artists", |s, artists: Vector<Artist>| {
            s.artists = artists
        })
        .await
    }

    pub async fn fetch_stats(&self) -> Result<(), StoreError> {
        self.load("/stats", "Failed to fetch stats", |s, stats: Stats| s.stats = stats)
            .await
    }

    pub async fn fetch_paginated_songs(&self, page: u32, limit: u32) -> Result<(), StoreError> {
        self.load_page(
            "/admin/songs/paginated",
            &self.page_generations.songs,
            page,
            limit,
            |s| &mut s.paginated_songs,
        )
        .await
    }

    pub async fn fetch_paginated_albums(&self, page: u32, limit: u32) -> Result<(), StoreError> {
        self.load_page(
            "/admin/albums/paginated",
            &self.page_generations.albums,
            page,
            limit,
            |s| &mut s.paginated_albums,
        )
        .await
    }

    pub async fn fetch_paginated_artists(&self, page: u32, limit: u32) -> Result<(), StoreError> {
        self.load_page(
            "/admin/artists/paginated",
            &self.page_generations.artists,
            page,
            limit,
            |s| &mut s.paginated_artists,
        )
        .await
    }

    pub async fn fetch_artist_appears_on(&self, artist_id: &str) -> Result<(), StoreError> {
        let _loading = LoadingGuard::on(self, |s| &mut s.is_appears_on_loading);

        let path = format!("/artists/{artist_id}/appears-on");
        match self.fetch::<Vector<Album>>(&path, &[]).await {
            Ok(albums) => {
                self.update(|s| s.artist_appears_on = albums.clone());
                Ok(())
            }
            Err(e) => {
                error!(path = %path, kind = e.kind(), "Failed to fetch 'Appears On' albums: {}", e);
                let message = e
                    .server_message()
                    .unwrap_or("Failed to fetch 'Appears On' section")
                    .to_string();
                self.update(|s| s.error = Some(message.clone()));
                Err(e.into())
            }
        }
    }

    pub async fn fetch_genres(&self) {
        self.load_best_effort("/admin/genres", "Failed to fetch genres", |s, genres: Vector<Genre>| {
            s.genres = genres
        })
        .await;
    }

    pub async fn fetch_moods(&self) {
        self.load_best_effort("/admin/moods", "Failed to fetch moods", |s, moods: Vector<Mood>| {
            s.moods = moods
        })
        .await;
    }

    pub async fn fetch_favorite_artists(&self) {
        self.load_best_effort(
            "/users/me/favorite-artists",
            "Failed to fetch favorite artists",
            |s, artists: Vector<Artist>| s.favorite_artists = artists,
        )
        .await;
    }

    pub async fn fetch_new_releases(&self) {
        self.load_best_effort(
            "/users/me/recommendations/new-releases",
            "Failed to fetch new releases",
            |s, albums: Vector<Album>| s.new_releases = albums,
        )
        .await;
    }

    /// Listening history belongs to the signed-in account; a failed fetch
    /// empties it rather than keeping a stale list.
    pub async fn fetch_recently_listened_songs(&self) {
        let loaded = self
            .load_best_effort(
                "/songs/history",
                "Could not fetch listen history",
                |s, body: SongsEnvelope| s.recently_listened_songs = body.songs,
            )
            .await;
        if loaded {
            debug!("Recently listened songs updated");
        } else {
            self.update(|s| s.recently_listened_songs = Vector::new());
        }
    }

    pub fn clear_home_page_cache(&self) {
        self.update(|s| s.home_page_data_last_fetched = None);
        info!("Homepage cache cleared.");
    }

    // Writes

    pub async fn create_song(&self, form: SongForm) -> Result<(), StoreError> {
        form.validate_create().map_err(|e| self.reject(e))?;

        let api = self.api.clone();
        let request = async move {
            let body = api.post_form("/admin/songs", form.into_create_form()).await?;
            Ok::<Song, ApiError>(serde_json::from_value(body)?)
        };
        self.mutate(
            request,
            cascade::insert_song,
            "Song added successfully",
            "Failed to add song",
        )
        .await
    }

    pub async fn update_song(&self, song_id: &str, form: SongForm) -> Result<(), StoreError> {
        let has_artwork = self
            .snapshot()
            .find_song(song_id)
            .is_some_and(|s| s.image_url.is_some());
        form.validate_update(has_artwork)
            .map_err(|e| self.reject(e))?;

        let path = format!("/admin/songs/{song_id}");
        let request = async {
            let body = self.api.put_form(&path, form.into_update_form()).await?;
            Ok::<Song, ApiError>(serde_json::from_value(body)?)
        };
        self.mutate(
            request,
            cascade::replace_song,
            "Song updated successfully!",
            "Failed to update song",
        )
        .await
    }

    pub async fn update_artist(&self, artist_id: &str, form: ArtistForm) -> Result<(), StoreError> {
        form.validate().map_err(|e| self.reject(e))?;

        let path = format!("/admin/artists/{artist_id}");
        let request = async {
            let body = self.api.put_form(&path, form.into_form()).await?;
            Ok::<Artist, ApiError>(serde_json::from_value(body)?)
        };
        self.mutate(
            request,
            cascade::replace_artist,
            "Artist updated successfully!",
            "Failed to update artist",
        )
        .await
    }

    pub async fn delete_song(&self, id: &str) -> Result<(), StoreError> {
        let path = format!("/admin/songs/{id}");
        self.mutate(
            self.api.delete(&path),
            |s, ()| cascade::remove_song(s, id),
            "Song deleted successfully",
            "Error deleting song",
        )
        .await
    }

    pub async fn delete_album(&self, id: &str) -> Result<(), StoreError> {
        let path = format!("/admin/albums/{id}");
        self.mutate(
            self.api.delete(&path),
            |s, ()| cascade::remove_album(s, id),
            "Album deleted successfully",
            "Failed to delete album",
        )
        .await
    }

    pub async fn delete_artist(&self, id: &str) -> Result<(), StoreError> {
        let path = format!("/admin/artists/{id}");
        self.mutate(
            self.api.delete(&path),
            |s, ()| cascade::remove_artist(s, id),
            "Artist and associated content relationships updated/deleted successfully",
            "Failed to delete artist",
        )
        .await
    }
}
