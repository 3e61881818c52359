use super::{ApiError, DataSource};
use crate::availability::{placeholder_name, Directory, NameLookup};
use crate::model::{AbsenceInterval, Event, GroupId, PersonId, TagName};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Résultat d'une recherche dégradable : valeur trouvée, ou valeur de repli.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Fallback(T),
}

impl<T> Lookup<T> {
    pub fn value(&self) -> &T {
        match self {
            Lookup::Found(v) | Lookup::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Lookup::Found(v) | Lookup::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Lookup::Fallback(_))
    }
}

/// Mémo à durée de vie limitée, clé = arguments de l'appel.
#[derive(Debug)]
struct Memo<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.entries
            .get(key)
            .filter(|(stored, _)| stored.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    fn get_or_try_insert_with<E, F>(&mut self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let value = fetch()?;
        self.entries.insert(key, (Instant::now(), value.clone()));
        Ok(value)
    }

    fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, fetch: F) -> V {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = fetch();
        self.entries.insert(key, (Instant::now(), value.clone()));
        value
    }
}

/// Session d'export : cache explicite, propre à un seul export.
///
/// Les appels fatals (événements, membres, absences) renvoient l'erreur ;
/// les appels dégradables (tags, noms) renvoient un [`Lookup`] et mémorisent aussi le repli.
#[derive(Debug)]
pub struct Session<S> {
    source: S,
    events: Memo<(NaiveDate, NaiveDate), Vec<Event>>,
    members: Memo<GroupId, Vec<PersonId>>,
    absences: Memo<(GroupId, NaiveDate, NaiveDate), Vec<AbsenceInterval>>,
    tags: Memo<PersonId, Lookup<Vec<TagName>>>,
    names: Memo<PersonId, Lookup<String>>,
}

impl<S: DataSource> Session<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            events: Memo::new(ttl),
            members: Memo::new(ttl),
            absences: Memo::new(ttl),
            tags: Memo::new(ttl),
            names: Memo::new(ttl),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn events(&mut self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Event>, ApiError> {
        let source = &self.source;
        self.events
            .get_or_try_insert_with((from, to), || source.fetch_events(from, to))
    }

    pub fn members(&mut self, group: GroupId) -> Result<Vec<PersonId>, ApiError> {
        let source = &self.source;
        self.members
            .get_or_try_insert_with(group, || source.fetch_group_members(group))
    }

    pub fn absences(
        &mut self,
        group: GroupId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceInterval>, ApiError> {
        let source = &self.source;
        self.absences
            .get_or_try_insert_with((group, from, to), || {
                source.fetch_group_absences(group, from, to)
            })
    }

    pub fn tags(&mut self, person: PersonId) -> Lookup<Vec<TagName>> {
        let source = &self.source;
        self.tags.get_or_insert_with(person, || {
            soften(source.fetch_person_tags(person), "tags", person, Vec::new)
        })
    }

    pub fn name(&mut self, person: PersonId) -> Lookup<String> {
        let source = &self.source;
        self.names.get_or_insert_with(person, || {
            soften(source.fetch_person_name(person), "name", person, || {
                placeholder_name(person)
            })
        })
    }
}

fn soften<T>(
    result: Result<T, ApiError>,
    what: &str,
    person: PersonId,
    fallback: impl FnOnce() -> T,
) -> Lookup<T> {
    match result {
        Ok(value) => Lookup::Found(value),
        Err(err) => {
            tracing::debug!(%person, error = %err, "{what} lookup failed, using fallback");
            Lookup::Fallback(fallback())
        }
    }
}

impl<S: DataSource> Directory for Session<S> {
    type Error = ApiError;

    fn group_members(&mut self, group: GroupId) -> Result<Vec<PersonId>, ApiError> {
        self.members(group)
    }

    fn person_tags(&mut self, person: PersonId) -> Vec<TagName> {
        self.tags(person).into_value()
    }
}

impl<S: DataSource> NameLookup for Session<S> {
    fn person_name(&mut self, person: PersonId) -> String {
        self.name(person).into_value()
    }
}
