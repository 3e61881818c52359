//! Cœur du calcul de disponibilités : absences, colonnes de tags,
//! affectations de services et résolution par colonne.

mod absence;
mod resolve;
mod services;
mod tags;
mod types;

pub use absence::AbsenceIndex;
pub use resolve::resolve;
pub use services::{mark, ServiceSlots};
pub use tags::{TagColumn, TagTable};
pub use types::{placeholder_name, AvailabilityError, Directory, NameLookup, ASSIGNED_MARKER};

use crate::config::TagServiceMap;
use chrono::NaiveDate;

/// Resolver : données figées d'un export (absences, colonnes, précédences).
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    absences: AbsenceIndex,
    tags: TagTable,
    tag_services: TagServiceMap,
}

impl Resolver {
    pub fn new(absences: AbsenceIndex, tags: TagTable, tag_services: TagServiceMap) -> Self {
        Self {
            absences,
            tags,
            tag_services,
        }
    }

    pub fn absences(&self) -> &AbsenceIndex {
        &self.absences
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    pub fn resolve<N: NameLookup>(
        &self,
        column: &TagColumn,
        date: NaiveDate,
        slots: &ServiceSlots,
        names: &mut N,
    ) -> String {
        resolve::resolve(column, &self.absences, date, slots, &self.tag_services, names)
    }

    /// Une valeur par colonne de tag, dans l'ordre de la table.
    pub fn resolve_all<N: NameLookup>(
        &self,
        date: NaiveDate,
        slots: &ServiceSlots,
        names: &mut N,
    ) -> Vec<String> {
        self.tags
            .columns()
            .iter()
            .map(|column| self.resolve(column, date, slots, names))
            .collect()
    }
}
