use super::wire::{Envelope, PersonAttributes, WireAbsence, WireEvent, WireMember, WireTag};
use super::{ApiError, DataSource};
use crate::model::{AbsenceInterval, Event, GroupId, PersonId, TagName};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;

/// Client bloquant de l'API REST ChurchTools (`{base_url}/api/...`).
#[derive(Debug, Clone)]
pub struct ChurchToolsClient {
    base_url: String,
    calendar_id: String,
    http: Client,
}

impl ChurchToolsClient {
    /// `credential` est le jeton de login ; il part en `Authorization: Login <jeton>`.
    pub fn new(base_url: &str, credential: &str, calendar_id: &str) -> Result<Self, ApiError> {
        let mut auth = HeaderValue::from_str(&format!("Login {}", credential.trim()))
            .map_err(|_| ApiError::InvalidCredential)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(concat!("anwesenheiten/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: "client".to_string(),
                source,
            })?;

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        tracing::trace!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .map_err(|err| ApiError::payload(endpoint, err))?;
        Ok(envelope.data)
    }
}

impl DataSource for ChurchToolsClient {
    fn fetch_events(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Event>, ApiError> {
        let endpoint = "events";
        let events: Vec<WireEvent> = self.get_data(
            endpoint,
            &[
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("canceled", "false".to_string()),
                ("include", "eventServices".to_string()),
            ],
        )?;
        events
            .into_iter()
            .filter(|e| e.in_calendar(&self.calendar_id))
            .map(|e| e.into_event(endpoint))
            .collect()
    }

    fn fetch_group_members(&self, group: GroupId) -> Result<Vec<PersonId>, ApiError> {
        let members: Vec<WireMember> = self.get_data(
            "groups/members",
            &[
                ("ids[]", group.to_string()),
                ("with_deleted", "false".to_string()),
            ],
        )?;
        Ok(members.into_iter().map(|m| PersonId::new(m.person_id)).collect())
    }

    fn fetch_person_tags(&self, person: PersonId) -> Result<Vec<TagName>, ApiError> {
        let tags: Vec<WireTag> = self.get_data(&format!("tags/person/{person}"), &[])?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    fn fetch_group_absences(
        &self,
        group: GroupId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceInterval>, ApiError> {
        let endpoint = format!("groups/{group}/absences");
        let absences: Vec<WireAbsence> = self.get_data(
            &endpoint,
            &[("from_date", from.to_string()), ("to_date", to.to_string())],
        )?;
        absences
            .into_iter()
            .map(|a| a.into_interval(&endpoint))
            .collect()
    }

    fn fetch_person_name(&self, person: PersonId) -> Result<String, ApiError> {
        let endpoint = format!("persons/{person}");
        let attrs: PersonAttributes = self.get_data(&endpoint, &[])?;
        attrs
            .full_name()
            .ok_or_else(|| ApiError::payload(endpoint, "person has no name"))
    }
}
