use super::types::AvailabilityError;
use crate::model::{AbsenceInterval, PersonId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Index des absences : par personne, intervalles triés et fusionnés (disjoints).
#[derive(Debug, Clone, Default)]
pub struct AbsenceIndex {
    by_person: HashMap<PersonId, Vec<(NaiveDate, NaiveDate)>>,
}

impl AbsenceIndex {
    /// Construit l'index ; un intervalle inversé (start > end) est refusé.
    pub fn build<'a, I>(intervals: I) -> Result<Self, AvailabilityError>
    where
        I: IntoIterator<Item = &'a AbsenceInterval>,
    {
        let mut by_person: HashMap<PersonId, Vec<(NaiveDate, NaiveDate)>> = HashMap::new();
        for interval in intervals {
            if interval.start > interval.end {
                return Err(AvailabilityError::InvalidAbsence {
                    person: interval.person,
                    start: interval.start,
                    end: interval.end,
                });
            }
            by_person
                .entry(interval.person)
                .or_default()
                .push((interval.start, interval.end));
        }
        for ranges in by_person.values_mut() {
            *ranges = merge(std::mem::take(ranges));
        }
        Ok(Self { by_person })
    }

    pub fn is_absent(&self, person: PersonId, date: NaiveDate) -> bool {
        let Some(ranges) = self.by_person.get(&person) else {
            return false;
        };
        let idx = ranges.partition_point(|(start, _)| *start <= date);
        idx > 0 && date <= ranges[idx - 1].1
    }

    /// Intervalles fusionnés d'une personne (vide si aucune absence).
    pub fn ranges(&self, person: PersonId) -> &[(NaiveDate, NaiveDate)] {
        self.by_person.get(&person).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_person.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_person.is_empty()
    }
}

fn merge(mut ranges: Vec<(NaiveDate, NaiveDate)>) -> Vec<(NaiveDate, NaiveDate)> {
    ranges.sort_unstable();
    let mut out: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match out.last_mut() {
            // chevauchants ou contigus (jour suivant)
            Some(last) if last.1 >= start || last.1.succ_opt() == Some(start) => {
                last.1 = last.1.max(end);
            }
            _ => out.push((start, end)),
        }
    }
    out
}
