#![forbid(unsafe_code)]
//! Anwesenheiten — export des disponibilités d'une instance ChurchTools.
//!
//! - Une ligne par événement : date, titre, services exportés, colonnes `groupe: tag`.
//! - Absences (intervalles de jours inclusifs), précédence tag → service pourvu.
//! - Export CSV (UTF-8 avec BOM) et XLSX (feature `xlsx`).
//! - Pas de persistance ; chaque export a son propre cache de requêtes.

pub mod api;
pub mod availability;
pub mod config;
pub mod export;
pub mod io;
pub mod model;
pub mod table;

pub use api::{ApiError, ChurchToolsClient, DataSource, Lookup, Session};
pub use availability::{AbsenceIndex, Resolver, ServiceSlots, TagColumn, TagTable};
pub use config::{ReportConfig, TagServiceMap};
pub use export::{build_table, run, ExportError, ExportRequest};
pub use model::{
    AbsenceInterval, AssignedPerson, Event, Group, GroupId, PersonId, ServiceAssignment,
    ServiceDef, ServiceId, TagName,
};
pub use table::{Column, ExportTable, RowBuilder};
