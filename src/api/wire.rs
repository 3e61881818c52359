//! Structures typées des réponses JSON ChurchTools (`{ "data": ... }`).
//! Les conversions valident tout de suite et échouent sur un payload incomplet.

use super::ApiError;
use crate::model::{AbsenceInterval, AssignedPerson, Event, PersonId, ServiceAssignment, ServiceId};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Les identifiants de domaine arrivent en texte (`"12"`), parfois en nombre.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    fn as_u64(&self, endpoint: &str) -> Result<u64, ApiError> {
        match self {
            WireId::Number(n) => Ok(*n),
            WireId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ApiError::payload(endpoint, format!("invalid identifier {s:?}"))),
        }
    }

    fn matches(&self, expected: &str) -> bool {
        match self {
            WireId::Number(n) => n.to_string() == expected,
            WireId::Text(s) => s == expected,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersonAttributes {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl PersonAttributes {
    /// `"prénom nom"`, `None` si les deux sont vides.
    pub fn full_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        let full = format!("{first} {last}").trim().to_string();
        (!full.is_empty()).then_some(full)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DomainRef {
    pub domain_identifier: WireId,
    #[serde(default)]
    pub domain_attributes: Option<PersonAttributes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireEventService {
    pub service_id: u64,
    #[serde(default)]
    pub person: Option<DomainRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireEvent {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub calendar: Option<DomainRef>,
    #[serde(default)]
    pub event_services: Vec<WireEventService>,
}

impl WireEvent {
    pub fn in_calendar(&self, calendar_id: &str) -> bool {
        self.calendar
            .as_ref()
            .is_some_and(|c| c.domain_identifier.matches(calendar_id))
    }

    pub fn into_event(self, endpoint: &str) -> Result<Event, ApiError> {
        // jour calendaire : les dix premiers caractères, heure ignorée
        let day = self.start_date.get(..10).unwrap_or(self.start_date.as_str());
        let date = parse_day(day, endpoint)?;
        let services = self
            .event_services
            .into_iter()
            .map(|svc| -> Result<ServiceAssignment, ApiError> {
                let person = match svc.person {
                    Some(person) => Some(AssignedPerson {
                        id: PersonId::new(person.domain_identifier.as_u64(endpoint)?),
                        name: person.domain_attributes.as_ref().and_then(PersonAttributes::full_name),
                    }),
                    None => None,
                };
                Ok(ServiceAssignment {
                    service: ServiceId::new(svc.service_id),
                    person,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Event {
            id: self.id,
            date,
            title: self.name,
            note: self.note,
            services,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireMember {
    pub person_id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTag {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireAbsence {
    pub person: DomainRef,
    pub start_date: String,
    pub end_date: String,
}

impl WireAbsence {
    pub fn into_interval(self, endpoint: &str) -> Result<AbsenceInterval, ApiError> {
        let person = PersonId::new(self.person.domain_identifier.as_u64(endpoint)?);
        let start = parse_day(&self.start_date, endpoint)?;
        let end = parse_day(&self.end_date, endpoint)?;
        AbsenceInterval::new(person, start, end).map_err(|reason| ApiError::payload(endpoint, reason))
    }
}

fn parse_day(raw: &str, endpoint: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::payload(endpoint, format!("invalid date {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_payload_converts() {
        let raw = r#"{ "data": [ {
            "id": 4711, "name": "Gottesdienst", "note": "Abendmahl",
            "startDate": "2025-11-09T08:30:00Z",
            "calendar": { "domainIdentifier": "2" },
            "eventServices": [
                { "serviceId": 1, "person": { "domainIdentifier": "12",
                  "domainAttributes": { "firstName": "Anna", "lastName": "Muster" } } },
                { "serviceId": 3, "person": null },
                { "serviceId": 8, "person": { "domainIdentifier": 5 } }
            ] } ] }"#;
        let envelope: Envelope<Vec<WireEvent>> = serde_json::from_str(raw).unwrap();
        let wire = envelope.data.into_iter().next().unwrap();
        assert!(wire.in_calendar("2"));
        assert!(!wire.in_calendar("3"));

        let event = wire.into_event("events").unwrap();
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 11, 9).unwrap());
        assert_eq!(event.label(), "Gottesdienst (Abendmahl)");
        assert_eq!(event.services.len(), 3);
        let first = event.services[0].person.as_ref().unwrap();
        assert_eq!(first.id, PersonId::new(12));
        assert_eq!(first.name.as_deref(), Some("Anna Muster"));
        assert!(event.services[1].person.is_none());
        assert_eq!(event.services[2].person.as_ref().unwrap().name, None);
    }

    #[test]
    fn bad_identifier_fails_fast() {
        let raw = r#"{ "person": { "domainIdentifier": "abc" },
                       "startDate": "2025-11-05", "endDate": "2025-11-12" }"#;
        let wire: WireAbsence = serde_json::from_str(raw).unwrap();
        let err = wire.into_interval("absences").unwrap_err();
        assert!(matches!(err, ApiError::Payload { .. }));
    }

    #[test]
    fn inverted_absence_is_rejected() {
        let raw = r#"{ "person": { "domainIdentifier": "3" },
                       "startDate": "2025-11-12", "endDate": "2025-11-05" }"#;
        let wire: WireAbsence = serde_json::from_str(raw).unwrap();
        assert!(wire.into_interval("absences").is_err());
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let raw = r#"{ "id": 1, "startDate": "2025-11-09" }"#;
        assert!(serde_json::from_str::<WireEvent>(raw).is_err());
    }

    #[test]
    fn blank_names_are_dropped() {
        let attrs = PersonAttributes {
            first_name: Some("  ".into()),
            last_name: None,
        };
        assert_eq!(attrs.full_name(), None);
    }
}
