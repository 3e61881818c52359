use super::absence::AbsenceIndex;
use super::services::ServiceSlots;
use super::tags::TagColumn;
use super::types::NameLookup;
use crate::config::TagServiceMap;
use chrono::NaiveDate;

/// Valeur affichée d'une colonne de tag pour un événement.
///
/// Tag lié à un service pourvu : uniquement les noms affectés (marqués), séparés par `", "`.
/// Sinon : les membres présents ce jour-là, un par ligne ; d'abord les libres,
/// puis ceux déjà affectés ailleurs entre parenthèses, chaque groupe dans l'ordre de la colonne.
pub fn resolve<N: NameLookup>(
    column: &TagColumn,
    absences: &AbsenceIndex,
    date: NaiveDate,
    slots: &ServiceSlots,
    tag_services: &TagServiceMap,
    names: &mut N,
) -> String {
    if let Some(&service) = tag_services.get(&column.tag) {
        if slots.is_filled(service) {
            if let Some(marked) = slots.marked_names(service) {
                return marked.join(", ");
            }
        }
    }

    let mut available = Vec::new();
    let mut elsewhere = Vec::new();
    for &person in &column.members {
        if absences.is_absent(person, date) {
            continue;
        }
        let name = names.person_name(person);
        if slots.is_assigned(person) {
            elsewhere.push(format!("({name})"));
        } else {
            available.push(name);
        }
    }
    available.extend(elsewhere);
    available.join("\n")
}
