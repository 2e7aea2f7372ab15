use serde::{Deserialize, Serialize};

use super::reference::{Entity, Named};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub songs: Vec<String>,
    #[serde(default)]
    pub albums: Vec<String>,
}

impl Entity for Artist {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Named for Artist {
    fn name(&self) -> &str {
        &self.name
    }
}
