use serde::{Deserialize, Serialize};

pub trait Entity {
    fn id(&self) -> &str;
}

pub trait Named: Entity {
    fn name(&self) -> &str;
}

/// A relational field entry. The API returns either the bare identifier or the
/// populated record in the same list, depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef<T> {
    Reference(String),
    Inline(Box<T>),
}

impl<T: Entity> EntityRef<T> {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Reference(id) => id,
            EntityRef::Inline(entity) => entity.id(),
        }
    }

    pub fn refers_to(&self, id: &str) -> bool {
        self.id() == id
    }

    pub fn inline(&self) -> Option<&T> {
        match self {
            EntityRef::Reference(_) => None,
            EntityRef::Inline(entity) => Some(entity),
        }
    }
}

impl<T> From<T> for EntityRef<T> {
    fn from(entity: T) -> Self {
        EntityRef::Inline(Box::new(entity))
    }
}

pub fn resolve_names<'a, T, I>(refs: &'a [EntityRef<T>], known: I) -> Vec<String>
where
    T: Named + 'a,
    I: IntoIterator<Item = &'a T> + Clone,
{
    refs.iter()
        .filter_map(|r| match r {
            EntityRef::Inline(entity) => Some(entity.name().to_string()),
            EntityRef::Reference(id) => known
                .clone()
                .into_iter()
                .find(|k| k.id() == id)
                .map(|k| k.name().to_string()),
        })
        .collect()
}

pub fn display_names<'a, T, I>(refs: &'a [EntityRef<T>], known: I) -> String
where
    T: Named + 'a,
    I: IntoIterator<Item = &'a T> + Clone,
{
    let names = resolve_names(refs, known);
    if names.is_empty() {
        "N/A".to_string()
    } else {
        names.join(", ")
    }
}

pub fn ref_ids<T: Entity>(refs: &[EntityRef<T>]) -> Vec<String> {
    refs.iter().map(|r| r.id().to_string()).collect()
}
