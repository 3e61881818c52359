#![forbid(unsafe_code)]
use anwesenheiten::availability::{
    resolve, AbsenceIndex, AvailabilityError, Directory, ServiceSlots, TagColumn, TagTable,
};
use anwesenheiten::model::{
    AbsenceInterval, AssignedPerson, Event, Group, GroupId, PersonId, ServiceAssignment, ServiceId,
};
use anwesenheiten::TagServiceMap;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn pid(id: u64) -> PersonId {
    PersonId::new(id)
}

fn names() -> HashMap<PersonId, String> {
    HashMap::from([
        (pid(1), "Alice".to_string()),
        (pid(2), "Bob".to_string()),
        (pid(3), "Carla".to_string()),
    ])
}

fn assigned(service: u64, person: u64, name: &str) -> ServiceAssignment {
    ServiceAssignment {
        service: ServiceId::new(service),
        person: Some(AssignedPerson {
            id: pid(person),
            name: Some(name.to_string()),
        }),
    }
}

fn unfilled(service: u64) -> ServiceAssignment {
    ServiceAssignment {
        service: ServiceId::new(service),
        person: None,
    }
}

fn event_on(date: NaiveDate, services: Vec<ServiceAssignment>) -> Event {
    Event {
        id: 1,
        date,
        title: "Gottesdienst".into(),
        note: None,
        services,
    }
}

fn video_column(members: &[u64]) -> TagColumn {
    TagColumn {
        group: "Technik".into(),
        tag: "Video".into(),
        members: members.iter().copied().map(pid).collect(),
    }
}

fn recognized(ids: &[u64]) -> BTreeSet<ServiceId> {
    ids.iter().copied().map(ServiceId::new).collect()
}

#[test]
fn absence_bounds_are_inclusive() {
    let alice = AbsenceInterval::new(pid(1), day(2025, 11, 5), day(2025, 11, 12)).unwrap();
    let index = AbsenceIndex::build(&[alice]).unwrap();

    assert!(!index.is_absent(pid(1), day(2025, 11, 4)));
    assert!(index.is_absent(pid(1), day(2025, 11, 5)));
    assert!(index.is_absent(pid(1), day(2025, 11, 9)));
    assert!(index.is_absent(pid(1), day(2025, 11, 12)));
    assert!(!index.is_absent(pid(1), day(2025, 11, 13)));
    // personne sans absence : jamais absente
    assert!(!index.is_absent(pid(2), day(2025, 11, 9)));
}

#[test]
fn overlapping_and_adjacent_absences_merge() {
    let intervals = [
        AbsenceInterval::new(pid(1), day(2025, 12, 20), day(2025, 12, 31)).unwrap(),
        AbsenceInterval::new(pid(1), day(2025, 11, 1), day(2025, 11, 3)).unwrap(),
        AbsenceInterval::new(pid(1), day(2025, 11, 4), day(2025, 11, 6)).unwrap(),
        AbsenceInterval::new(pid(1), day(2025, 11, 2), day(2025, 11, 5)).unwrap(),
    ];
    let index = AbsenceIndex::build(&intervals).unwrap();
    assert_eq!(
        index.ranges(pid(1)),
        &[
            (day(2025, 11, 1), day(2025, 11, 6)),
            (day(2025, 12, 20), day(2025, 12, 31))
        ]
    );
    assert!(!index.is_absent(pid(1), day(2025, 11, 7)));
    assert!(index.is_absent(pid(1), day(2025, 12, 24)));
}

#[test]
fn inverted_absence_is_rejected() {
    let bad = AbsenceInterval {
        person: pid(1),
        start: day(2025, 11, 12),
        end: day(2025, 11, 5),
    };
    let err = AbsenceIndex::build(&[bad]).unwrap_err();
    assert!(matches!(err, AvailabilityError::InvalidAbsence { .. }));
    assert!(AbsenceInterval::new(pid(1), day(2025, 11, 12), day(2025, 11, 5)).is_err());
}

struct FixedDirectory {
    members: HashMap<GroupId, Vec<PersonId>>,
    tags: HashMap<PersonId, Vec<String>>,
}

impl Directory for FixedDirectory {
    type Error = Infallible;

    fn group_members(&mut self, group: GroupId) -> Result<Vec<PersonId>, Infallible> {
        Ok(self.members.get(&group).cloned().unwrap_or_default())
    }

    fn person_tags(&mut self, person: PersonId) -> Vec<String> {
        self.tags.get(&person).cloned().unwrap_or_default()
    }
}

#[test]
fn tag_columns_follow_group_then_tag_order() {
    let groups = vec![
        Group::new(69, "Programm", &["Gebet", "Deko"]),
        Group::new(7, "Technik", &["Video", "Audio"]),
    ];
    let mut directory = FixedDirectory {
        members: HashMap::from([
            (GroupId::new(69), vec![pid(3), pid(1)]),
            (GroupId::new(7), vec![pid(2), pid(1), pid(3)]),
        ]),
        tags: HashMap::from([
            (pid(1), vec!["Video".into(), "Gebet".into()]),
            (pid(2), vec!["Video".into(), "audio".into()]),
            (pid(3), vec!["Deko".into(), "Audio".into(), "Gebet".into()]),
        ]),
    };

    let table = TagTable::build(&groups, &mut directory).unwrap();
    let keys: Vec<String> = table.columns().iter().map(TagColumn::key).collect();
    assert_eq!(
        keys,
        ["Programm: Gebet", "Programm: Deko", "Technik: Video", "Technik: Audio"]
    );

    let members = |key: &str| table.get(key).unwrap().members.clone();
    assert_eq!(members("Programm: Gebet"), vec![pid(3), pid(1)]);
    assert_eq!(members("Programm: Deko"), vec![pid(3)]);
    assert_eq!(members("Technik: Video"), vec![pid(2), pid(1)]);
    // correspondance exacte, sensible à la casse
    assert_eq!(members("Technik: Audio"), vec![pid(3)]);
}

#[test]
fn member_of_two_groups_appears_in_both() {
    let groups = vec![
        Group::new(1, "Morgen", &["Video"]),
        Group::new(2, "Abend", &["Video"]),
    ];
    let mut directory = FixedDirectory {
        members: HashMap::from([
            (GroupId::new(1), vec![pid(1)]),
            (GroupId::new(2), vec![pid(1)]),
        ]),
        tags: HashMap::from([(pid(1), vec!["Video".into()])]),
    };
    let table = TagTable::build(&groups, &mut directory).unwrap();
    assert_eq!(table.get("Morgen: Video").unwrap().members, vec![pid(1)]);
    assert_eq!(table.get("Abend: Video").unwrap().members, vec![pid(1)]);
}

#[test]
fn extractor_keeps_unfilled_slots_and_marks_names() {
    let event = event_on(
        day(2025, 11, 9),
        vec![
            assigned(1, 2, "Bob"),
            unfilled(3),
            assigned(99, 1, "Alice"),
            ServiceAssignment {
                service: ServiceId::new(8),
                person: Some(AssignedPerson {
                    id: pid(3),
                    name: Some("   ".into()),
                }),
            },
        ],
    );
    let slots = ServiceSlots::extract(&event, &recognized(&[1, 2, 3, 8]), &mut names());

    assert_eq!(slots.names(ServiceId::new(1)), Some(&["Bob".to_string()][..]));
    assert!(slots.contains(ServiceId::new(3)));
    assert!(!slots.is_filled(ServiceId::new(3)));
    assert_eq!(slots.names(ServiceId::new(3)), Some(&[] as &[String]));
    // service absent des entrées : pas de liste du tout
    assert!(!slots.contains(ServiceId::new(2)));
    // service non reconnu : ignoré, la personne n'est pas comptée
    assert!(!slots.contains(ServiceId::new(99)));
    assert!(!slots.is_assigned(pid(1)));
    // nom embarqué vide : résolution par la recherche de noms
    assert_eq!(
        slots.marked_names(ServiceId::new(8)),
        Some(vec!["*Carla".to_string()])
    );
    assert!(slots.is_assigned(pid(2)));
    assert!(slots.is_assigned(pid(3)));
}

#[test]
fn unfilled_mapped_service_lists_available_members() {
    let date = day(2025, 11, 9);
    let column = video_column(&[1, 2]);
    let map = TagServiceMap::from([("Video".to_string(), ServiceId::new(8))]);
    let event = event_on(date, vec![unfilled(8)]);
    let slots = ServiceSlots::extract(&event, &recognized(&[8]), &mut names());

    let value = resolve(&column, &AbsenceIndex::default(), date, &slots, &map, &mut names());
    assert_eq!(value, "Alice\nBob");
}

#[test]
fn filled_mapped_service_shows_only_assignees() {
    let date = day(2025, 11, 9);
    let column = video_column(&[1, 2]);
    let map = TagServiceMap::from([("Video".to_string(), ServiceId::new(8))]);
    let event = event_on(date, vec![assigned(8, 2, "Bob")]);
    let slots = ServiceSlots::extract(&event, &recognized(&[8]), &mut names());

    let value = resolve(&column, &AbsenceIndex::default(), date, &slots, &map, &mut names());
    assert_eq!(value, "*Bob");
}

#[test]
fn several_assignees_are_comma_joined() {
    let date = day(2025, 11, 9);
    let column = video_column(&[1, 2, 3]);
    let map = TagServiceMap::from([("Video".to_string(), ServiceId::new(8))]);
    let event = event_on(date, vec![assigned(8, 2, "Bob"), unfilled(8), assigned(8, 1, "Alice")]);
    let slots = ServiceSlots::extract(&event, &recognized(&[8]), &mut names());

    let value = resolve(&column, &AbsenceIndex::default(), date, &slots, &map, &mut names());
    assert_eq!(value, "*Bob, *Alice");
}

#[test]
fn assigned_elsewhere_goes_last_in_parentheses() {
    let date = day(2025, 11, 9);
    let column = video_column(&[2, 3, 1]);
    let event = event_on(date, vec![assigned(1, 2, "Bob")]);
    let slots = ServiceSlots::extract(&event, &recognized(&[1]), &mut names());

    let value = resolve(
        &column,
        &AbsenceIndex::default(),
        date,
        &slots,
        &TagServiceMap::new(),
        &mut names(),
    );
    assert_eq!(value, "Carla\nAlice\n(Bob)");
}

#[test]
fn absence_excludes_only_on_covered_days() {
    let column = video_column(&[1, 2]);
    let absences = AbsenceIndex::build(&[AbsenceInterval::new(
        pid(1),
        day(2025, 11, 5),
        day(2025, 11, 12),
    )
    .unwrap()])
    .unwrap();
    let map = TagServiceMap::new();

    let on_last_day = day(2025, 11, 12);
    let slots = ServiceSlots::default();
    assert_eq!(resolve(&column, &absences, on_last_day, &slots, &map, &mut names()), "Bob");

    let day_after = day(2025, 11, 13);
    assert_eq!(resolve(&column, &absences, day_after, &slots, &map, &mut names()), "Alice\nBob");
}

#[test]
fn unknown_names_fall_back_to_placeholder() {
    let date = day(2025, 11, 9);
    let column = video_column(&[42]);
    let value = resolve(
        &column,
        &AbsenceIndex::default(),
        date,
        &ServiceSlots::default(),
        &TagServiceMap::new(),
        &mut names(),
    );
    assert_eq!(value, "Person 42");
}
