use super::types::Directory;
use crate::config::column_key;
use crate::model::{Group, PersonId, TagName};

/// Colonne de disponibilité `"{groupe}: {tag}"` et ses membres, dans l'ordre du groupe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagColumn {
    pub group: String,
    pub tag: TagName,
    pub members: Vec<PersonId>,
}

impl TagColumn {
    pub fn key(&self) -> String {
        column_key(&self.group, &self.tag)
    }
}

/// Table des colonnes de tags, construite une fois par export puis immuable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    columns: Vec<TagColumn>,
}

impl TagTable {
    /// Pour chaque groupe puis chaque tag déclaré : les membres portant ce tag
    /// (comparaison exacte, sensible à la casse). Pas de dédoublonnage entre groupes.
    pub fn build<D: Directory>(groups: &[Group], directory: &mut D) -> Result<Self, D::Error> {
        let mut columns = Vec::new();
        for group in groups {
            let members = directory.group_members(group.id)?;
            let member_tags: Vec<(PersonId, Vec<TagName>)> = members
                .into_iter()
                .map(|person| (person, directory.person_tags(person)))
                .collect();

            for tag in &group.tags {
                let holders = member_tags
                    .iter()
                    .filter(|(_, tags)| tags.iter().any(|t| t == tag))
                    .map(|(person, _)| *person)
                    .collect();
                columns.push(TagColumn {
                    group: group.name.clone(),
                    tag: tag.clone(),
                    members: holders,
                });
            }
            tracing::debug!(group = %group.name, members = member_tags.len(), "tag columns built");
        }
        Ok(Self { columns })
    }

    pub fn from_columns(columns: Vec<TagColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[TagColumn] {
        &self.columns
    }

    pub fn get(&self, key: &str) -> Option<&TagColumn> {
        self.columns.iter().find(|c| c.key() == key)
    }
}
