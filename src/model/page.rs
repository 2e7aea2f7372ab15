use im::Vector;
use serde::Deserialize;

/// One page as returned by the `/admin/*/paginated` endpoints. The item list
/// is keyed by the entity kind (`songs`, `albums` or `artists`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "songs", alias = "albums", alias = "artists")]
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow<T: Clone> {
    pub items: Vector<T>,
    pub page: u32,
    pub total_pages: u32,
}

impl<T: Clone> Default for PageWindow<T> {
    fn default() -> Self {
        Self {
            items: Vector::new(),
            page: 1,
            total_pages: 1,
        }
    }
}

impl<T: Clone> From<Page<T>> for PageWindow<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items.into_iter().collect(),
            page: page.current_page,
            total_pages: page.total_pages,
        }
    }
}

impl<T: Clone> PageWindow<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn needs_controls(&self) -> bool {
        self.total_pages > 1
    }
}
