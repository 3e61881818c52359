use super::types::{NameLookup, ASSIGNED_MARKER};
use crate::model::{Event, PersonId, ServiceId};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Affectations d'un événement : noms par service reconnu + personnes déjà affectées.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSlots {
    names: BTreeMap<ServiceId, Vec<String>>,
    assigned: HashSet<PersonId>,
}

impl ServiceSlots {
    /// Seuls les services de `recognized` sont retenus. Un créneau sans personne
    /// crée quand même une entrée (liste vide) : non pourvu ≠ non applicable.
    pub fn extract<N: NameLookup>(
        event: &Event,
        recognized: &BTreeSet<ServiceId>,
        names: &mut N,
    ) -> Self {
        let mut slots = Self::default();
        for entry in &event.services {
            if !recognized.contains(&entry.service) {
                continue;
            }
            let list = slots.names.entry(entry.service).or_default();
            let Some(person) = &entry.person else {
                continue;
            };
            let name = match person.name.as_deref().map(str::trim) {
                Some(embedded) if !embedded.is_empty() => embedded.to_string(),
                _ => names.person_name(person.id),
            };
            list.push(name);
            slots.assigned.insert(person.id);
        }
        slots
    }

    /// Le service figure-t-il dans les entrées de l'événement (pourvu ou non) ?
    pub fn contains(&self, service: ServiceId) -> bool {
        self.names.contains_key(&service)
    }

    pub fn is_filled(&self, service: ServiceId) -> bool {
        self.names.get(&service).is_some_and(|n| !n.is_empty())
    }

    pub fn names(&self, service: ServiceId) -> Option<&[String]> {
        self.names.get(&service).map(Vec::as_slice)
    }

    /// Noms préfixés du marqueur d'affectation.
    pub fn marked_names(&self, service: ServiceId) -> Option<Vec<String>> {
        self.names
            .get(&service)
            .map(|names| names.iter().map(|n| mark(n)).collect())
    }

    pub fn is_assigned(&self, person: PersonId) -> bool {
        self.assigned.contains(&person)
    }

    pub fn assigned(&self) -> &HashSet<PersonId> {
        &self.assigned
    }
}

pub fn mark(name: &str) -> String {
    format!("{ASSIGNED_MARKER}{name}")
}
