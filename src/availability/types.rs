use crate::model::{GroupId, PersonId};
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

/// Marqueur préfixé aux noms affectés à un service.
pub const ASSIGNED_MARKER: char = '*';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("invalid absence for person {person}: {start} is after {end}")]
    InvalidAbsence {
        person: PersonId,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Accès en lecture aux membres et tags (une implémentation HTTP, une en mémoire pour les tests).
pub trait Directory {
    type Error: std::error::Error + 'static;

    /// Membres du groupe, dans l'ordre de la source. Un échec interrompt l'export.
    fn group_members(&mut self, group: GroupId) -> Result<Vec<PersonId>, Self::Error>;

    /// Tags d'une personne ; un échec se dégrade en liste vide.
    fn person_tags(&mut self, person: PersonId) -> Vec<String>;
}

/// Résolution de nom d'affichage ; un échec se dégrade en `Person {id}`.
pub trait NameLookup {
    fn person_name(&mut self, person: PersonId) -> String;
}

pub fn placeholder_name(person: PersonId) -> String {
    format!("Person {person}")
}

impl NameLookup for HashMap<PersonId, String> {
    fn person_name(&mut self, person: PersonId) -> String {
        self.get(&person)
            .cloned()
            .unwrap_or_else(|| placeholder_name(person))
    }
}
