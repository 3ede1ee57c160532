//! Normalization of related records returned by joined queries

use serde::{Deserialize, Serialize};

/// A related record as a data source may return it
///
/// JSON-aggregating queries hand back an array, a single object or null
/// depending on the join. Consumers call [`RelatedRecord::first`] and never
/// branch on the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelatedRecord<T> {
    Many(Vec<T>),
    One(T),
    None,
}

impl<T> Default for RelatedRecord<T> {
    fn default() -> Self {
        Self::None
    }
}

impl<T> RelatedRecord<T> {
    /// The single element, the first array element, or nothing
    pub fn first(&self) -> Option<&T> {
        match self {
            Self::Many(items) => items.first(),
            Self::One(item) => Some(item),
            Self::None => None,
        }
    }

    pub fn into_first(self) -> Option<T> {
        match self {
            Self::Many(items) => items.into_iter().next(),
            Self::One(item) => Some(item),
            Self::None => None,
        }
    }
}

impl<T> From<Option<T>> for RelatedRecord<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Self::One)
    }
}
