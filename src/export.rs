//! Pipeline d'export : une passe sur les groupes, puis une passe sur les événements.
//! Un échec de chargement (événements, membres, absences) interrompt tout ;
//! les tags et noms introuvables sont remplacés sans bruit.

use crate::api::{ApiError, ChurchToolsClient, DataSource, Session};
use crate::availability::{AbsenceIndex, AvailabilityError, Resolver, ServiceSlots, TagTable};
use crate::config::ReportConfig;
use crate::table::{ExportTable, RowBuilder};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

/// Paramètres fournis à chaque export.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub credential: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ExportRequest {
    pub fn new<C: Into<String>>(credential: C, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            credential: credential.into(),
            from,
            to,
        }
    }

    /// Vérifié avant tout appel réseau.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.credential.trim().is_empty() {
            return Err(ExportError::MissingCredential);
        }
        if self.from > self.to {
            return Err(ExportError::InvalidRange {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("missing credential: an API login token is required")]
    MissingCredential,
    #[error("invalid date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
    #[error("cannot set up API client")]
    Client(#[source] ApiError),
    #[error("fetching {what} failed")]
    Fetch {
        what: String,
        #[source]
        source: ApiError,
    },
    #[error(transparent)]
    Availability(#[from] AvailabilityError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn fetch_error<W: Into<String>>(what: W) -> impl FnOnce(ApiError) -> ExportError {
    let what = what.into();
    move |source| ExportError::Fetch { what, source }
}

/// Construit le tableau complet à partir d'une session (cache propre à cet export).
pub fn build_table<S: DataSource>(
    config: &ReportConfig,
    request: &ExportRequest,
    session: &mut Session<S>,
) -> Result<ExportTable, ExportError> {
    request.validate()?;

    let events = session
        .events(request.from, request.to)
        .map_err(fetch_error("events"))?;
    info!(count = events.len(), from = %request.from, to = %request.to, "events loaded");

    let tags = TagTable::build(&config.groups, session).map_err(fetch_error("group members"))?;

    let mut intervals = Vec::new();
    for group in &config.groups {
        let absences = session
            .absences(group.id, request.from, request.to)
            .map_err(fetch_error(format!("absences of group {}", group.name)))?;
        info!(group = %group.name, absences = absences.len(), "group loaded");
        intervals.extend(absences);
    }
    let absences = AbsenceIndex::build(&intervals)?;

    let resolver = Resolver::new(absences, tags, config.tag_services.clone());
    let recognized = config.recognized_services();
    let mut rows = RowBuilder::new(&config.services, resolver.tags());
    for event in &events {
        let slots = ServiceSlots::extract(event, &recognized, session);
        let values = resolver.resolve_all(event.date, &slots, session);
        rows.push(event, &slots, values);
    }

    let table = rows.finish();
    info!(rows = table.len(), columns = table.columns().len(), "export table built");
    Ok(table)
}

/// Export complet contre l'API HTTP, avec une session neuve.
pub fn run(config: &ReportConfig, request: &ExportRequest) -> Result<ExportTable, ExportError> {
    request.validate()?;
    config.validate()?;
    let client = ChurchToolsClient::new(&config.base_url, &request.credential, &config.calendar_id)
        .map_err(ExportError::Client)?;
    let mut session = Session::new(client, config.cache_ttl());
    build_table(config, request, &mut session)
}
