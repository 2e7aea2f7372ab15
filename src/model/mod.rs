pub mod album;
pub mod artist;
pub mod page;
pub mod reference;
pub mod song;
pub mod stats;
pub mod taxonomy;
pub mod user;

pub use album::Album;
pub use artist::Artist;
pub use page::{Page, PageWindow};
pub use reference::{Entity, EntityRef, Named};
pub use song::Song;
pub use stats::Stats;
pub use taxonomy::{Genre, Mood};
pub use user::CurrentUser;
