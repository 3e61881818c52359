use crate::availability::{ServiceSlots, TagTable};
use crate::config::{column_key, ReportConfig};
use crate::model::{Event, ServiceDef};
use chrono::NaiveDate;

pub const DATE_HEADER: &str = "Date";
pub const EVENT_HEADER: &str = "Event";
pub const DATE_FORMAT: &str = "%a, %d.%m.%Y";

/// Descripteur de colonne ; l'ordre est fixé une fois et partagé par les lignes et les sérialiseurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Date,
    Event,
    Service(ServiceDef),
    Tag(String),
}

impl Column {
    pub fn header(&self) -> &str {
        match self {
            Column::Date => DATE_HEADER,
            Column::Event => EVENT_HEADER,
            Column::Service(service) => &service.name,
            Column::Tag(key) => key,
        }
    }
}

/// Tableau exporté : chaque ligne a exactement une cellule par colonne.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(Column::header).collect()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c.header() == header)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }
}

/// Colonnes d'un export : date, événement, services dans l'ordre déclaré, puis tags.
pub fn layout<I>(services: &[ServiceDef], tag_keys: I) -> Vec<Column>
where
    I: IntoIterator<Item = String>,
{
    [Column::Date, Column::Event]
        .into_iter()
        .chain(services.iter().cloned().map(Column::Service))
        .chain(tag_keys.into_iter().map(Column::Tag))
        .collect()
}

/// En-têtes prévus par une configuration, sans appel réseau.
pub fn planned_columns(config: &ReportConfig) -> Vec<Column> {
    let keys = config
        .groups
        .iter()
        .flat_map(|g| g.tags.iter().map(move |t| column_key(&g.name, t)));
    layout(&config.services, keys)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Construit les lignes dans l'ordre des événements fournis (pas de tri).
#[derive(Debug, Clone)]
pub struct RowBuilder {
    table: ExportTable,
}

impl RowBuilder {
    pub fn new(services: &[ServiceDef], tags: &TagTable) -> Self {
        let columns = layout(services, tags.columns().iter().map(|c| c.key()));
        Self {
            table: ExportTable::new(columns),
        }
    }

    pub fn columns(&self) -> &[Column] {
        self.table.columns()
    }

    /// `tag_values` : une valeur par colonne de tag, dans l'ordre ; les manquantes restent vides.
    pub fn build_row(&self, event: &Event, slots: &ServiceSlots, tag_values: Vec<String>) -> Vec<String> {
        let mut tag_values = tag_values.into_iter();
        self.table
            .columns
            .iter()
            .map(|column| match column {
                Column::Date => format_date(event.date),
                Column::Event => event.label(),
                Column::Service(service) => slots
                    .names(service.id)
                    .map(|names| names.join(", "))
                    .unwrap_or_default(),
                Column::Tag(_) => tag_values.next().unwrap_or_default(),
            })
            .collect()
    }

    pub fn push(&mut self, event: &Event, slots: &ServiceSlots, tag_values: Vec<String>) {
        let row = self.build_row(event, slots, tag_values);
        self.table.rows.push(row);
    }

    pub fn finish(self) -> ExportTable {
        self.table
    }
}
