use crate::model::{Group, GroupId, ServiceDef, ServiceId, TagName};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://feg-thayngen.church.tools";
pub const DEFAULT_CALENDAR_ID: &str = "2";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Précédence tag → service : un tag lié à un service pourvu n'affiche que l'affectation.
pub type TagServiceMap = BTreeMap<TagName, ServiceId>;

/// Configuration statique d'un export (groupes, services, précédences).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seuls les événements de ce calendrier sont exportés.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    pub groups: Vec<Group>,
    /// Colonnes de services, dans l'ordre d'export.
    #[serde(default)]
    pub services: Vec<ServiceDef>,
    #[serde(default)]
    pub tag_services: TagServiceMap,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            calendar_id: default_calendar_id(),
            groups: vec![
                Group::new(
                    69,
                    "Programm",
                    &[
                        "Gebet",
                        "Begrüssung",
                        "Deko",
                        "Abendmahl vorbereiten",
                        "Abendmahl abwaschen",
                    ],
                ),
                Group::new(7, "Technik", &["Video", "Audio", "Beamer", "Licht"]),
            ],
            services: vec![
                ServiceDef::new(1, "Predigt"),
                ServiceDef::new(2, "Lobpreisleitung"),
                ServiceDef::new(3, "Moderation"),
            ],
            tag_services: TagServiceMap::new(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl ReportConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        let config: ReportConfig = serde_json::from_slice(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url cannot be empty");
        }
        if self.groups.is_empty() {
            bail!("config must contain at least one group");
        }

        let mut group_ids: HashSet<GroupId> = HashSet::new();
        let mut column_keys: HashSet<String> = HashSet::new();
        for group in &self.groups {
            if group.name.trim().is_empty() {
                bail!("group {} has an empty name", group.id);
            }
            if !group_ids.insert(group.id) {
                bail!("group id {} declared twice", group.id);
            }
            for tag in &group.tags {
                if tag.trim().is_empty() {
                    bail!("group {} declares an empty tag", group.name);
                }
                let key = column_key(&group.name, tag);
                if !column_keys.insert(key.clone()) {
                    bail!("duplicate availability column {key:?}");
                }
            }
        }

        let mut service_ids: HashSet<ServiceId> = HashSet::new();
        for service in &self.services {
            if service.name.trim().is_empty() {
                bail!("service {} has an empty name", service.id);
            }
            if !service_ids.insert(service.id) {
                bail!("service id {} declared twice", service.id);
            }
        }
        Ok(())
    }

    /// Services dont les affectations comptent : colonnes exportées + services liés à un tag.
    pub fn recognized_services(&self) -> BTreeSet<ServiceId> {
        self.services
            .iter()
            .map(|s| s.id)
            .chain(self.tag_services.values().copied())
            .collect()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Clé de colonne de disponibilité : `"{groupe}: {tag}"`.
pub fn column_key(group: &str, tag: &str) -> String {
    format!("{group}: {tag}")
}
