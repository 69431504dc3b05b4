//! Resolve a single entity by ID and/or name
//!
//! Data sources accept an `id`, a name, or both. Lookups are a linear scan
//! over a listed collection:
//!
//! - neither given: invalid input
//! - id given: the entity must exist, and a name given alongside must match
//! - name only: exactly one entity must carry it

use crate::error::{Error, Result};

/// Names of an entity kind as used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityKind {
    pub singular: &'static str,
    pub plural: &'static str,
}

impl EntityKind {
    pub const fn new(singular: &'static str, plural: &'static str) -> Self {
        Self { singular, plural }
    }
}

/// Find exactly one item matching `id` and/or `name`
pub fn find_unique<T>(
    kind: EntityKind,
    items: Vec<T>,
    id: Option<i64>,
    name: Option<&str>,
    id_of: impl Fn(&T) -> Option<i64>,
    name_of: impl Fn(&T) -> &str,
) -> Result<T> {
    match (id, name) {
        (None, None) => Err(Error::invalid_input(format!(
            "either id or name must be specified to look up a {}",
            kind.singular
        ))),

        (Some(id), name) => {
            let item = items
                .into_iter()
                .find(|item| id_of(item) == Some(id))
                .ok_or_else(|| Error::not_found(format!("no {} found with id {id}", kind.singular)))?;

            if let Some(name) = name
                && name_of(&item) != name
            {
                return Err(Error::invalid_input(format!(
                    "{} {id} is named {:?}, not {name:?}",
                    kind.singular,
                    name_of(&item)
                )));
            }
            Ok(item)
        }

        (None, Some(name)) => {
            let mut matches: Vec<T> = items.into_iter().filter(|item| name_of(item) == name).collect();
            match matches.len() {
                0 => Err(Error::not_found(format!(
                    "no {} found with name {name:?}",
                    kind.singular
                ))),
                1 => Ok(matches.remove(0)),
                n => Err(Error::ambiguous(format!(
                    "multiple {} found with name {name:?} ({n} matches); use id to select one",
                    kind.plural
                ))),
            }
        }
    }
}
