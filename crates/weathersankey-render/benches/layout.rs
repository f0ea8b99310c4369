use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;
use std::time::Duration;
use weathersankey_core::{ColumnMapping, ConditionRegistry, SortMode, build_weather_graph};
use weathersankey_render::model::LayoutCanvas;
use weathersankey_render::{ChartConfig, LayoutStrategy, TwoLayerSankey, render};

fn synthetic_series(days: usize) -> Vec<Value> {
    let conditions = [
        "Clear",
        "Partially cloudy",
        "Rain, Overcast",
        "Overcast",
        "Snow, Partially cloudy",
    ];
    (0..days)
        .map(|i| {
            // A spread of runs so condition nodes see uneven link counts.
            let c = conditions[(i / 3 + i * i) % conditions.len()];
            json!({
                "date": format!("{}-{:02}-{:02}", 2000 + i / 336, (i / 28) % 12 + 1, i % 28 + 1),
                "high": 40.0 + (i % 17) as f64 * 1.5,
                "low": 25.0 + (i % 11) as f64,
                "condition": c,
            })
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_layer_sankey");
    group.measurement_time(Duration::from_secs(5));

    for days in [31usize, 120, 365] {
        let raw = synthetic_series(days);
        let (_, graph) = build_weather_graph(
            &raw,
            &ColumnMapping::default(),
            &ConditionRegistry::reference(),
            SortMode::Ascending,
        )
        .expect("graph");
        let canvas = LayoutCanvas {
            width: 480.0,
            height: 1004.0,
            node_thickness: 10.0,
            node_gap: 10.0,
        };
        let strategy = TwoLayerSankey::default();
        group.bench_with_input(BenchmarkId::new("layout", days), &graph, |b, g| {
            b.iter(|| strategy.layout(black_box(g), black_box(&canvas)))
        });

        let config = ChartConfig::default();
        group.bench_with_input(BenchmarkId::new("render", days), &raw, |b, r| {
            b.iter(|| render(black_box(r), black_box(&config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
