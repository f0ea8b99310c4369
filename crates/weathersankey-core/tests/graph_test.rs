use serde_json::{Value, json};
use std::path::PathBuf;
use weathersankey_core::{
    ColumnMapping, ConditionCategory, ConditionRegistry, Error, NodeRef, SortMode, build_graph,
    build_weather_graph, normalize_records,
};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn seattle_january() -> Vec<Value> {
    let path = workspace_root()
        .join("fixtures")
        .join("weather")
        .join("seattle_2020_01.json");
    let text = std::fs::read_to_string(&path).expect("fixture");
    serde_json::from_str(&text).expect("fixture json")
}

fn visual_crossing_columns() -> ColumnMapping {
    ColumnMapping {
        date: "datetime".to_string(),
        high: "tempmax".to_string(),
        low: "tempmin".to_string(),
        condition: "conditions".to_string(),
    }
}

fn two_day_series() -> Vec<Value> {
    vec![
        json!({"date": "2020-01-01", "high": 50, "low": 30, "condition": "Clear"}),
        json!({"date": "2020-01-02", "high": 45, "low": 28, "condition": "Rain showers"}),
    ]
}

fn clear_and_rain() -> ConditionRegistry {
    ConditionRegistry::new([
        ConditionCategory::new("Clear", 0, "#fff3b0"),
        ConditionCategory::new("Rain", 3, "#98c1d9"),
    ])
    .expect("registry")
}

#[test]
fn two_day_series_builds_two_conditions_two_dates_two_links() {
    let (records, graph) = build_weather_graph(
        &two_day_series(),
        &ColumnMapping::default(),
        &clear_and_rain(),
        SortMode::None,
    )
    .expect("graph ok");

    assert_eq!(records[1].condition, "Rain");
    let ids: Vec<(&str, usize)> = graph
        .conditions
        .iter()
        .map(|n| (n.id.as_str(), n.count))
        .collect();
    assert_eq!(ids, [("Clear", 1), ("Rain", 1)]);
    assert_eq!(graph.dates.len(), 2);
    assert_eq!(graph.links.len(), 2);
    assert_eq!(graph.links[1].source, 1);
    assert_eq!(graph.links[1].target, 1);
    assert_eq!(graph.links[1].weight, 1.0);
    assert_eq!(graph.dates[1].color, "#98c1d9");
}

#[test]
fn sort_mode_orders_conditions_by_registry_index() {
    let records = vec![
        json!({"date": "2020-01-01", "high": 45, "low": 28, "condition": "Rain"}),
        json!({"date": "2020-01-02", "high": 50, "low": 30, "condition": "Clear"}),
        json!({"date": "2020-01-03", "high": 44, "low": 27, "condition": "Rain, Overcast"}),
    ];
    let reg = clear_and_rain();
    let cols = ColumnMapping::default();
    let ids = |sort| {
        let (_, g) = build_weather_graph(&records, &cols, &reg, sort).expect("graph ok");
        g.conditions.iter().map(|n| n.id.clone()).collect::<Vec<_>>()
    };

    assert_eq!(ids(SortMode::None), ["Rain", "Clear"]);
    assert_eq!(ids(SortMode::Ascending), ["Clear", "Rain"]);
    assert_eq!(ids(SortMode::Descending), ["Rain", "Clear"]);
}

#[test]
fn sorting_conditions_keeps_links_pointing_at_the_right_node() {
    let records = vec![
        json!({"date": "2020-01-01", "high": 45, "low": 28, "condition": "Rain"}),
        json!({"date": "2020-01-02", "high": 50, "low": 30, "condition": "Clear"}),
    ];
    let (_, g) = build_weather_graph(
        &records,
        &ColumnMapping::default(),
        &clear_and_rain(),
        SortMode::Ascending,
    )
    .expect("graph ok");
    for link in &g.links {
        assert_eq!(g.conditions[link.source].id, g.dates[link.target].condition);
    }
}

#[test]
fn counts_match_record_totals_on_a_month_of_data() {
    let raw = seattle_january();
    let (records, graph) = build_weather_graph(
        &raw,
        &visual_crossing_columns(),
        &ConditionRegistry::reference(),
        SortMode::None,
    )
    .expect("graph ok");

    assert_eq!(records.len(), 31);
    assert_eq!(graph.dates.len(), records.len());
    assert_eq!(graph.links.len(), records.len());
    assert_eq!(
        graph.conditions.iter().map(|n| n.count).sum::<usize>(),
        records.len()
    );
    for node in &graph.conditions {
        let expected = records.iter().filter(|r| r.condition == node.id).count();
        assert_eq!(node.count, expected, "count for {}", node.id);
    }

    let order: Vec<&str> = graph.conditions.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        order,
        ["Partially cloudy", "Rain", "Overcast", "Clear", "Snow"]
    );
    for (i, d) in graph.dates.iter().enumerate() {
        assert_eq!(d.date, records[i].date);
    }
}

#[test]
fn every_date_has_exactly_one_incoming_link() {
    let (_, graph) = build_weather_graph(
        &seattle_january(),
        &visual_crossing_columns(),
        &ConditionRegistry::reference(),
        SortMode::Descending,
    )
    .expect("graph ok");
    for i in 0..graph.dates.len() {
        let incoming = graph.links.iter().filter(|l| l.target == i).count();
        assert_eq!(incoming, 1, "date {i}");
    }
}

#[test]
fn absent_conditions_produce_no_nodes() {
    let (_, graph) = build_weather_graph(
        &two_day_series(),
        &ColumnMapping::default(),
        &ConditionRegistry::reference(),
        SortMode::Ascending,
    )
    .expect("graph ok");
    assert_eq!(graph.conditions.len(), 2);
    assert!(graph.condition_position("Snow").is_none());
}

#[test]
fn empty_input_builds_an_empty_graph() {
    let (records, graph) = build_weather_graph(
        &[],
        &ColumnMapping::default(),
        &ConditionRegistry::reference(),
        SortMode::Ascending,
    )
    .expect("empty is valid");
    assert!(records.is_empty());
    assert!(graph.is_empty());
    assert!(graph.links.is_empty());
    assert_eq!(graph.node_ref(0), None);
}

#[test]
fn graph_built_against_a_smaller_registry_fails() {
    let records = normalize_records(
        &two_day_series(),
        &ColumnMapping::default(),
        &ConditionRegistry::reference(),
    )
    .expect("normalize ok");
    let only_clear =
        ConditionRegistry::new([ConditionCategory::new("Clear", 0, "#fff3b0")]).expect("registry");
    let err = build_graph(&records, &only_clear, SortMode::None).unwrap_err();
    assert!(matches!(err, Error::UnknownCondition { ref condition, .. } if condition == "Rain"));
}

#[test]
fn flat_indices_put_conditions_before_dates() {
    let (_, graph) = build_weather_graph(
        &two_day_series(),
        &ColumnMapping::default(),
        &clear_and_rain(),
        SortMode::None,
    )
    .expect("graph ok");
    assert_eq!(graph.flat_index(NodeRef::Condition(1)), 1);
    assert_eq!(graph.flat_index(NodeRef::Date(0)), 2);
    assert_eq!(graph.node_ref(3), Some(NodeRef::Date(1)));
    assert_eq!(graph.node_ref(4), None);
    assert_eq!(graph.node_id(NodeRef::Date(1)), Some("2020-01-02"));
}

#[test]
fn sort_mode_codes_and_serde_names() {
    assert_eq!(SortMode::from_code(1), Some(SortMode::Ascending));
    assert_eq!(SortMode::from_code(7), None);
    let parsed: SortMode = serde_json::from_value(json!("descending")).expect("sort json");
    assert_eq!(parsed, SortMode::Descending);
}
