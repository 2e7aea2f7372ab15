use std::path::Path;

use chrono::Datelike;

use crate::{
    error::ValidationError,
    model::{Artist, Song, reference::ref_ids},
};

#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first()
            .map(|m| m.essence_str().to_string());
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File(UploadFile),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<(String, FormPart)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts
            .push((name.to_string(), FormPart::Text(value.into())));
        self
    }

    pub fn file(mut self, name: &str, file: UploadFile) -> Self {
        self.parts.push((name.to_string(), FormPart::File(file)));
        self
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, part)| match part {
            FormPart::Text(value) if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn get_file(&self, name: &str) -> Option<&UploadFile> {
        self.parts.iter().find_map(|(n, part)| match part {
            FormPart::File(file) if n == name => Some(file),
            _ => None,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }

    pub fn into_parts(self) -> Vec<(String, FormPart)> {
        self.parts
    }
}

fn json_ids(ids: &[String]) -> String {
    serde_json::Value::from(ids.to_vec()).to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongForm {
    pub title: String,
    pub artist_ids: Vec<String>,
    pub genre_ids: Vec<String>,
    pub mood_ids: Vec<String>,
    pub album_id: Option<String>,
    pub release_year: i32,
    pub lyrics: Option<String>,
    pub audio_file: Option<UploadFile>,
    pub image_file: Option<UploadFile>,
}

impl SongForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist_ids: Vec::new(),
            genre_ids: Vec::new(),
            mood_ids: Vec::new(),
            album_id: None,
            release_year: chrono::Utc::now().year(),
            lyrics: None,
            audio_file: None,
            image_file: None,
        }
    }

    pub fn from_song(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            artist_ids: ref_ids(&song.artist),
            genre_ids: ref_ids(&song.genres),
            mood_ids: ref_ids(&song.moods),
            album_id: song.album_id.clone(),
            release_year: song
                .release_year
                .unwrap_or_else(|| chrono::Utc::now().year()),
            lyrics: song.lyrics.clone(),
            audio_file: None,
            image_file: None,
        }
    }

    /// "none" is what the album picker submits for a single.
    pub fn album_selected(&self) -> Option<&str> {
        self.album_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != "none")
    }

    pub fn validate_create(&self) -> Result<(), ValidationError> {
        if self.audio_file.is_none() {
            return Err(ValidationError::MissingAudio);
        }
        if self.album_selected().is_none() && self.image_file.is_none() {
            return Err(ValidationError::MissingArtwork);
        }
        if self.artist_ids.is_empty() {
            return Err(ValidationError::MissingArtist);
        }
        Ok(())
    }

    pub fn validate_update(&self, has_artwork: bool) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.artist_ids.is_empty() {
            return Err(ValidationError::MissingArtist);
        }
        if self.album_selected().is_none() && !has_artwork && self.image_file.is_none() {
            return Err(ValidationError::MissingArtwork);
        }
        Ok(())
    }

    pub fn into_create_form(self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("title", self.title.as_str())
            .text("artistIds", json_ids(&self.artist_ids))
            .text("genreIds", json_ids(&self.genre_ids))
            .text("moodIds", json_ids(&self.mood_ids));
        if let Some(album_id) = self.album_selected() {
            form = form.text("albumId", album_id);
        }
        form = form.text("releaseYear", self.release_year.to_string());
        if let Some(lyrics) = self.lyrics.as_deref().filter(|l| !l.is_empty()) {
            form = form.text("lyrics", lyrics);
        }
        if let Some(audio) = self.audio_file {
            form = form.file("audioFile", audio);
        }
        if let Some(image) = self.image_file {
            form = form.file("imageFile", image);
        }
        form
    }

    /// Update always sends `lyrics` and `albumId`; empty values clear them.
    pub fn into_update_form(self) -> MultipartForm {
        let album_id = self.album_selected().unwrap_or_default().to_string();
        let mut form = MultipartForm::new()
            .text("title", self.title.as_str())
            .text("artistIds", json_ids(&self.artist_ids))
            .text("lyrics", self.lyrics.clone().unwrap_or_default())
            .text("genreIds", json_ids(&self.genre_ids))
            .text("moodIds", json_ids(&self.mood_ids))
            .text("albumId", album_id)
            .text("releaseYear", self.release_year.to_string());
        if let Some(audio) = self.audio_file {
            form = form.file("audioFile", audio);
        }
        if let Some(image) = self.image_file {
            form = form.file("imageFile", image);
        }
        form
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistForm {
    pub name: String,
    pub image_file: Option<UploadFile>,
}

impl ArtistForm {
    pub fn from_artist(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            image_file: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }

    pub fn into_form(self) -> MultipartForm {
        let form = MultipartForm::new().text("name", self.name.trim());
        match self.image_file {
            Some(image) => form.file("imageFile", image),
            None => form,
        }
    }
}
