use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiant fort pour Person (identifiant numérique ChurchTools)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(u64);

impl PersonId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifiant fort pour Group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(u64);

impl GroupId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifiant fort pour un type de service (Predigt, Moderation, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(u64);

impl ServiceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type TagName = String;

/// Groupe configuré : ses tags définissent les colonnes de disponibilité, dans l'ordre déclaré.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<TagName>,
}

impl Group {
    pub fn new<N: Into<String>>(id: u64, name: N, tags: &[&str]) -> Self {
        Self {
            id: GroupId::new(id),
            name: name.into(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

/// Service exporté comme colonne propre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDef {
    pub id: ServiceId,
    pub name: String,
}

impl ServiceDef {
    pub fn new<N: Into<String>>(id: u64, name: N) -> Self {
        Self {
            id: ServiceId::new(id),
            name: name.into(),
        }
    }
}

/// Période d'absence d'une personne (intervalle de jours [start, end], bornes incluses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceInterval {
    pub person: PersonId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AbsenceInterval {
    pub fn new(person: PersonId, start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err(format!("absence of person {person} ends ({end}) before it starts ({start})"));
        }
        Ok(Self { person, start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Personne affectée à un service d'un événement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedPerson {
    pub id: PersonId,
    /// Nom embarqué dans la réponse API ; `None` si absent ou vide.
    pub name: Option<String>,
}

/// Entrée de service d'un événement ; `person == None` : créneau non pourvu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAssignment {
    pub service: ServiceId,
    pub person: Option<AssignedPerson>,
}

/// Événement du calendrier (jour calendaire, heure ignorée)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceAssignment>,
}

impl Event {
    /// `titre` ou `titre (note)` si la note n'est pas vide.
    pub fn label(&self) -> String {
        match self.note.as_deref().map(str::trim) {
            Some(note) if !note.is_empty() => format!("{} ({})", self.title, note),
            _ => self.title.clone(),
        }
    }
}
