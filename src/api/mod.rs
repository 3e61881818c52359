//! Collaborateur externe : l'API REST ChurchTools, derrière le trait [`DataSource`].

mod http;
mod session;
mod wire;

pub use http::ChurchToolsClient;
pub use session::{Lookup, Session};

use crate::model::{AbsenceInterval, Event, GroupId, PersonId, TagName};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("malformed payload from {endpoint}: {reason}")]
    Payload { endpoint: String, reason: String },
    #[error("credential cannot be sent as an Authorization header")]
    InvalidCredential,
}

impl ApiError {
    pub(crate) fn payload<E: Into<String>, R: ToString>(endpoint: E, reason: R) -> Self {
        Self::Payload {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

/// Source de données d'un export. Appels en lecture seule, sans retry.
pub trait DataSource {
    /// Événements du calendrier configuré, bornes incluses, avec leurs services.
    fn fetch_events(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Event>, ApiError>;

    fn fetch_group_members(&self, group: GroupId) -> Result<Vec<PersonId>, ApiError>;

    fn fetch_person_tags(&self, person: PersonId) -> Result<Vec<TagName>, ApiError>;

    fn fetch_group_absences(
        &self,
        group: GroupId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceInterval>, ApiError>;

    fn fetch_person_name(&self, person: PersonId) -> Result<String, ApiError>;
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn fetch_events(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Event>, ApiError> {
        (**self).fetch_events(from, to)
    }
    fn fetch_group_members(&self, group: GroupId) -> Result<Vec<PersonId>, ApiError> {
        (**self).fetch_group_members(group)
    }
    fn fetch_person_tags(&self, person: PersonId) -> Result<Vec<TagName>, ApiError> {
        (**self).fetch_person_tags(person)
    }
    fn fetch_group_absences(
        &self,
        group: GroupId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceInterval>, ApiError> {
        (**self).fetch_group_absences(group, from, to)
    }
    fn fetch_person_name(&self, person: PersonId) -> Result<String, ApiError> {
        (**self).fetch_person_name(person)
    }
}
