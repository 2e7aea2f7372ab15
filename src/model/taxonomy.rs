use serde::{Deserialize, Serialize};

use super::reference::{Entity, Named};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mood {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

macro_rules! named_entity {
    ($($ty:ty),*) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }

            impl Named for $ty {
                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

named_entity!(Genre, Mood);
