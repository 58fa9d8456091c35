//! End-to-end tests for normalize → select → build → aggregate

use rstest::rstest;

use skyrim_atlas::application::Census;
use skyrim_atlas::domain::{
    aggregate, build_hierarchy, normalize, GroupingAttribute, HierarchyNode, Level,
    LocationCanonicalizer, RawRecord, SelectionFilter, StatAttribute, CLOUD_DISTRICT,
};
use skyrim_atlas::infrastructure::traits::parse_records;
use skyrim_atlas::util::testing::{init_test_setup, SAMPLE_DATASET};

fn census_of(json: &str) -> Census {
    init_test_setup();
    let records = parse_records(json).expect("valid json array");
    Census::from_records(&records, &SelectionFilter::default())
}

#[test]
fn given_nazeem_in_whiterun_when_selecting_then_lives_in_cloud_district() {
    // Arrange
    let census = census_of(
        r#"[{"Name": "Nazeem", "Home City": "Whiterun", "Gender": "Male", "Race": "Redguard",
            "Health": "100"}]"#,
    );

    // Act
    let selected = census.selected_characters();

    // Assert
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].location, CLOUD_DISTRICT);
    assert_eq!(selected[0].health, Some(100));
}

#[test]
fn given_mine_cell_location_when_selecting_then_maps_to_markarth() {
    let census = census_of(
        r#"[{"Name": "Calcelmo", "Location": "Left Hand Mine, Cell 3", "Gender": "Male"}]"#,
    );

    let selected = census.selected_characters();

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].location, "Markarth");
}

#[test]
fn given_unknown_location_when_selecting_then_excluded() {
    let census = census_of(r#"[{"Name": "Wanderer", "Location": "Atmora", "Gender": "Male"}]"#);

    assert!(census.selected_characters().is_empty());
    assert_eq!(census.stats().unmatched_locations, 1);
}

#[test]
fn given_leaves_with_missing_stat_when_aggregating_then_missing_counts_as_one() {
    let census = census_of(
        r#"[
            {"Name": "A", "Home City": "Whiterun", "Race": "Nord", "Gender": "Male", "Health": 10},
            {"Name": "B", "Home City": "Whiterun", "Race": "Nord", "Gender": "Male"},
            {"Name": "C", "Home City": "Whiterun", "Race": "Nord", "Gender": "Male", "Health": 30}
        ]"#,
    );

    let tree = census.build_hierarchy(GroupingAttribute::Race, StatAttribute::Health);
    let nords = tree.node_at(&[0, 0]).expect("Whiterun/Nord");

    assert_eq!(nords.level, Level::Group);
    assert_eq!(aggregate(nords), 41);
    assert_eq!(tree.aggregate(), 41);
}

#[test]
fn given_nbsp_in_key_when_normalizing_then_resolves_like_plain_space() {
    let with_nbsp = RawRecord::new().with("Home\u{00A0}Town", "Riverwood, Sleeping Giant Inn");
    let plain = RawRecord::new().with("Home Town", "Riverwood, Sleeping Giant Inn");

    assert_eq!(normalize(&with_nbsp).location, "Riverwood");
    assert_eq!(normalize(&with_nbsp), normalize(&plain));
}

#[test]
fn given_same_name_twice_when_selecting_then_only_first_survives() {
    let census = census_of(
        r#"[
            {"Name": "Lydia", "Home City": "Whiterun", "Gender": "Female", "Health": 304},
            {"Name": "Lydia", "Home City": "Solitude", "Gender": "Female", "Health": 1}
        ]"#,
    );

    let selected = census.selected_characters();

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].location, "Whiterun");
    assert_eq!(selected[0].health, Some(304));
}

#[rstest]
#[case("Radiant")]
#[case("")]
fn given_invalid_gender_when_selecting_then_never_selected(#[case] gender: &str) {
    let records = vec![RawRecord::new()
        .with("Name", "Spirit")
        .with("Home City", "Riften")
        .with("Gender", gender)];

    let census = Census::from_records(&records, &SelectionFilter::default());

    assert!(census.selected_characters().is_empty());
    assert_eq!(census.stats().invalid_gender, 1);
}

#[rstest]
#[case(GroupingAttribute::Race, StatAttribute::Health)]
#[case(GroupingAttribute::Class, StatAttribute::Magicka)]
#[case(GroupingAttribute::Skill, StatAttribute::Stamina)]
#[case(GroupingAttribute::Aggression, StatAttribute::Health)]
#[case(GroupingAttribute::Morality, StatAttribute::Stamina)]
fn given_same_dimensions_when_building_twice_then_trees_are_equal(
    #[case] grouping: GroupingAttribute,
    #[case] stat: StatAttribute,
) {
    let census = census_of(SAMPLE_DATASET);

    let first = census.build_hierarchy(grouping, stat);
    let second = build_hierarchy(census.selected_characters(), grouping, stat);

    assert_eq!(first, second);
    assert_eq!(first.leaf_count(), census.selected_characters().len());
}

#[test]
fn given_sample_dataset_when_selecting_then_counts_every_exclusion() {
    let census = census_of(SAMPLE_DATASET);

    let names: Vec<&str> = census
        .selected_characters()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Nazeem", "Calcelmo", "Lydia", "Mjoll", "Brynjolf"]);

    let stats = census.stats();
    assert_eq!(stats.input, 8);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.unmatched_locations, 1);
    assert_eq!(stats.invalid_gender, 1);
    assert_eq!(stats.selected, 5);
}

#[test]
fn given_sample_dataset_when_building_then_locations_follow_first_appearance() {
    let census = census_of(SAMPLE_DATASET);

    let tree = census.build_hierarchy(GroupingAttribute::Race, StatAttribute::Health);

    let locations: Vec<&str> = tree.children().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(
        locations,
        vec![CLOUD_DISTRICT, "Markarth", "Whiterun", "Riften"]
    );
    // 90 + 10 + 304 + 30 + (missing → 1)
    assert_eq!(tree.aggregate(), 435);
}

#[test]
fn given_malformed_records_when_running_pipeline_then_never_panics() {
    let census = census_of(
        r#"[
            {},
            42,
            null,
            {"Name": ["not", "text"], "Health": {"nested": 1}},
            {"Name": "Ghost", "Home City": "Whiterun", "Gender": "Male",
             "Health": "lots", "Magicka": 1e300, "Stamina": "12.9 points"}
        ]"#,
    );

    let tree = census.build_hierarchy(GroupingAttribute::Class, StatAttribute::Health);

    // Nameless records all share the name "none", so only the first one
    // reaches the location step, where it is excluded.
    let stats = census.stats();
    assert_eq!(stats.input, 5);
    assert_eq!(stats.duplicates, 3);
    assert_eq!(stats.unmatched_locations, 1);

    let ghost = &census.selected_characters()[0];
    assert_eq!(census.selected_characters().len(), 1);
    assert_eq!(ghost.health, None);
    assert_eq!(ghost.magicka, None);
    assert_eq!(ghost.stamina, Some(12));
    assert_eq!(tree.node_at(&[0, 0]).map(|n| n.name.as_str()), Some("none"));
    assert_eq!(tree.aggregate(), 1);
}

#[test]
fn given_extreme_stat_magnitudes_when_charting_then_sums_saturate() {
    let census = census_of(
        r#"[
            {"Name": "Titan", "Home City": "Whiterun", "Gender": "Male", "Race": "Nord",
             "Health": "9223372036854775807"},
            {"Name": "Colossus", "Home City": "Whiterun", "Gender": "Male", "Race": "Nord",
             "Health": "9223372036854775807"},
            {"Name": "Abyss", "Home City": "Riften", "Gender": "Male", "Race": "Nord",
             "Health": "-9223372036854775808"},
            {"Name": "Debtor", "Home City": "Riften", "Gender": "Female", "Race": "Nord",
             "Health": -40},
            {"Name": "Giant", "Home City": "Markarth", "Gender": "Male", "Race": "Nord",
             "Health": "99999999999999999999"}
        ]"#,
    );
    assert_eq!(census.selected_characters().len(), 5);

    let view = census.view(GroupingAttribute::Race, StatAttribute::Health);
    let bars: Vec<(String, i64)> = view
        .bars()
        .into_iter()
        .map(|b| (b.name, b.value))
        .collect();

    // Out-of-range text is missing, so it weighs 1.
    assert_eq!(
        bars,
        vec![
            ("Whiterun".to_string(), i64::MAX),
            ("Markarth".to_string(), 1),
            ("Riften".to_string(), i64::MIN),
        ]
    );
    assert_eq!(view.bar_domain_max(), i64::MAX);
    // Whiterun, Riften, Markarth in order: MAX, then MAX + MIN = -1, then +1.
    assert_eq!(view.tree().aggregate(), 0);
    assert_eq!(view.tree().sorted_by_aggregate().children()[0].name, "Whiterun");
}

#[test]
fn given_unconfirmed_settlements_enabled_when_selecting_then_they_are_kept() {
    let records = parse_records(
        r#"[
            {"Name": "Sorli", "Home City": "Stonehills", "Gender": "Female"},
            {"Name": "Grogmar", "Home City": "Shor's Stone", "Gender": "Male"}
        ]"#,
    )
    .unwrap();

    let excluded = Census::from_records(&records, &SelectionFilter::default());
    let kept = Census::from_records(
        &records,
        &SelectionFilter::new(LocationCanonicalizer::with_unconfirmed(true)),
    );

    assert!(excluded.is_empty());
    let locations: Vec<&str> = kept
        .selected_characters()
        .iter()
        .map(|c| c.location.as_str())
        .collect();
    assert_eq!(locations, vec!["Stonehills", "Shor's Stone"]);
}

#[test]
fn given_empty_selection_when_building_then_root_aggregates_to_zero() {
    let census = census_of("[]");

    let tree: HierarchyNode = census.build_hierarchy(GroupingAttribute::Race, StatAttribute::Health);

    assert!(tree.children().is_empty());
    assert_eq!(tree.aggregate(), 0);
}
