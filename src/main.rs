use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, bail};
use flume::Receiver;
use moodify_admin::{
    config::Config,
    event::{NotificationLevel, StoreEvent},
    health::{self, Service},
    http::{ApiService, ArtistForm, SongForm, UploadFile},
    model::{PageWindow, reference::display_names},
    store::CatalogStore,
    util::{hook::set_panic_hook, log::initialize_logging},
};
use tracing::info;

#[derive(Parser)]
#[command(name = "moodify-admin", version, about = "Moodify catalog administration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Catalog totals
    Stats,
    /// Probe the backend and the analysis service
    Health,
    Songs {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    Albums {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    Artists {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Album details with its tracklist
    Album { id: String },
    /// Albums an artist is credited on
    AppearsOn { artist_id: String },
    AddSong {
        title: String,
        #[arg(long = "artist")]
        artists: Vec<String>,
        #[arg(long = "genre")]
        genres: Vec<String>,
        #[arg(long = "mood")]
        moods: Vec<String>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        lyrics: Option<String>,
        #[arg(long)]
        audio: Option<PathBuf>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit a song; unset options keep their current values
    UpdateSong {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "artist")]
        artists: Vec<String>,
        #[arg(long = "genre")]
        genres: Vec<String>,
        #[arg(long = "mood")]
        moods: Vec<String>,
        /// Album id, or "none" to make the song a single
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        lyrics: Option<String>,
        #[arg(long)]
        audio: Option<PathBuf>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    UpdateArtist {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    DeleteSong { id: String },
    DeleteAlbum { id: String },
    DeleteArtist { id: String },
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> color_eyre::Result<()> {
    setup()?;

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let api = Arc::new(ApiService::new(&config)?);

    // Health is reachable without signing in, the rest is admin only.
    if !matches!(cli.command, Command::Health) {
        let user = api
            .current_user()
            .await
            .wrap_err("Could not verify the signed-in account")?;
        let who = user.email.as_deref().unwrap_or(&user.id);
        if !user.is_admin {
            bail!("{who} is not an administrator");
        }
        info!("Signed in as {who}");
    }

    let store = CatalogStore::new(api.clone());
    let printer = tokio::spawn(print_notifications(store.subscribe()));

    let result = run(cli.command, &store, api.as_ref(), &config).await;

    drop(store);
    printer.await?;
    result
}

fn setup() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    set_panic_hook();
    initialize_logging()
}

async fn print_notifications(events: Receiver<StoreEvent>) {
    while let Ok(event) = events.recv_async().await {
        if let StoreEvent::Notification(notification) = event {
            match notification.level {
                NotificationLevel::Success => println!("{}", notification.message),
                NotificationLevel::Error => eprintln!("{}", notification.message),
            }
        }
    }
}

async fn run(
    command: Command,
    store: &CatalogStore,
    api: &ApiService,
    config: &Config,
) -> color_eyre::Result<()> {
    match command {
        Command::Health => {
            for service in Service::ALL {
                let status = health::check(api, service).await;
                println!("{service}: {status}");
            }
        }
        Command::Stats => {
            store.fetch_stats().await?;
            let stats = store.snapshot().stats.clone();
            println!("songs:   {}", stats.total_songs);
            println!("albums:  {}", stats.total_albums);
            println!("artists: {}", stats.total_artists);
            println!("users:   {}", stats.total_users);
        }
        Command::Songs { page, limit } => {
            tokio::join!(store.fetch_genres(), store.fetch_moods());
            store.fetch_artists().await?;
            store
                .fetch_paginated_songs(page, limit.unwrap_or(config.page_size))
                .await?;
            let state = store.snapshot();
            for song in state.paginated_songs.items.iter() {
                let year = song
                    .release_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{}  {}  [{}]  {}  {}",
                    song.id,
                    song.title,
                    display_names(&song.artist, &state.artists),
                    year,
                    display_names(&song.genres, &state.genres),
                );
            }
            print_footer(&state.paginated_songs);
        }
        Command::Albums { page, limit } => {
            store.fetch_artists().await?;
            store
                .fetch_paginated_albums(page, limit.unwrap_or(config.page_size))
                .await?;
            let state = store.snapshot();
            for album in state.paginated_albums.items.iter() {
                println!(
                    "{}  {}  [{}]  {} tracks",
                    album.id,
                    album.title,
                    display_names(&album.artist, &state.artists),
                    album.songs.len(),
                );
            }
            print_footer(&state.paginated_albums);
        }
        Command::Artists { page, limit } => {
            store
                .fetch_paginated_artists(page, limit.unwrap_or(config.page_size))
                .await?;
            let state = store.snapshot();
            for artist in state.paginated_artists.items.iter() {
                println!(
                    "{}  {}  {} songs, {} albums",
                    artist.id,
                    artist.name,
                    artist.songs.len(),
                    artist.albums.len()
                );
            }
            print_footer(&state.paginated_artists);
        }
        Command::Album { id } => {
            store.fetch_artists().await?;
            store.fetch_album_by_id(&id).await?;
            let state = store.snapshot();
            let Some(album) = state.current_album.as_ref() else {
                bail!("Album {id} was not returned");
            };
            println!(
                "{} by {}",
                album.title,
                display_names(&album.artist, &state.artists)
            );
            for (index, song) in album.songs.iter().enumerate() {
                match song.inline() {
                    Some(song) => println!("{:>3}. {}", index + 1, song.title),
                    None => println!("{:>3}. {}", index + 1, song.id()),
                }
            }
        }
        Command::AppearsOn { artist_id } => {
            store.fetch_artist_appears_on(&artist_id).await?;
            for album in store.snapshot().artist_appears_on.iter() {
                println!("{}  {}", album.id, album.title);
            }
        }
        Command::AddSong {
            title,
            artists,
            genres,
            moods,
            album,
            year,
            lyrics,
            audio,
            image,
        } => {
            let mut form = SongForm::new(title);
            form.artist_ids = artists;
            form.genre_ids = genres;
            form.mood_ids = moods;
            form.album_id = album;
            if let Some(year) = year {
                form.release_year = year;
            }
            form.lyrics = lyrics;
            form.audio_file = load_file(audio).await?;
            form.image_file = load_file(image).await?;
            store.create_song(form).await?;
        }
        Command::UpdateSong {
            id,
            title,
            artists,
            genres,
            moods,
            album,
            year,
            lyrics,
            audio,
            image,
        } => {
            store.fetch_songs().await?;
            let state = store.snapshot();
            let Some(song) = state.find_song(&id) else {
                bail!("Unknown song {id}");
            };
            let mut form = SongForm::from_song(song);
            if let Some(title) = title {
                form.title = title;
            }
            if !artists.is_empty() {
                form.artist_ids = artists;
            }
            if !genres.is_empty() {
                form.genre_ids = genres;
            }
            if !moods.is_empty() {
                form.mood_ids = moods;
            }
            if album.is_some() {
                form.album_id = album;
            }
            if let Some(year) = year {
                form.release_year = year;
            }
            if lyrics.is_some() {
                form.lyrics = lyrics;
            }
            form.audio_file = load_file(audio).await?;
            form.image_file = load_file(image).await?;
            store.update_song(&id, form).await?;
        }
        Command::UpdateArtist { id, name, image } => {
            store.fetch_artists().await?;
            let state = store.snapshot();
            let Some(artist) = state.artist(&id) else {
                bail!("Unknown artist {id}");
            };
            let mut form = ArtistForm::from_artist(artist);
            if let Some(name) = name {
                form.name = name;
            }
            form.image_file = load_file(image).await?;
            store.update_artist(&id, form).await?;
        }
        Command::DeleteSong { id } => store.delete_song(&id).await?,
        Command::DeleteAlbum { id } => store.delete_album(&id).await?,
        Command::DeleteArtist { id } => store.delete_artist(&id).await?,
    }
    Ok(())
}

async fn load_file(path: Option<PathBuf>) -> color_eyre::Result<Option<UploadFile>> {
    match path {
        Some(path) => {
            let file = UploadFile::from_path(&path)
                .await
                .wrap_err_with(|| format!("Could not read {}", path.display()))?;
            Ok(Some(file))
        }
        None => Ok(None),
    }
}

fn print_footer<T: Clone>(window: &PageWindow<T>) {
    if window.needs_controls() {
        let prev = if window.has_previous() { "<" } else { " " };
        let next = if window.has_next() { ">" } else { " " };
        println!("{prev} page {} of {} {next}", window.page, window.total_pages);
    }
}
