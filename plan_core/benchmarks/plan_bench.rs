use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use plan_core::{PlanCompiler, PlanInputOverrides};
use plan_schema::{ResourceNode, ResourceType, ScenarioCode};

fn bench_generate_plan(c: &mut Criterion) {
    let compiler = PlanCompiler::builtin();
    let mut group = c.benchmark_group("generate_plan");

    for city in ["BCN", "LIS"] {
        for nodes in [0usize, 8, 64] {
            let resource_nodes: Vec<ResourceNode> = (0..nodes)
                .map(|idx| ResourceNode {
                    id: format!("N{idx}"),
                    label: format!("Node {idx}"),
                    lat: 41.39 + idx as f64 * 0.001,
                    lng: 2.16,
                    types: vec![ResourceType::ALL[idx % ResourceType::ALL.len()]],
                })
                .collect();
            let input = compiler.templates().preset_input(
                city,
                PlanInputOverrides {
                    scenarios: Some(ScenarioCode::ALL.to_vec()),
                    resource_nodes: Some(resource_nodes),
                    ..PlanInputOverrides::default()
                },
            );

            group.bench_with_input(
                BenchmarkId::new(city, nodes),
                &input,
                |b, input| b.iter(|| compiler.generate_plan(input)),
            );
        }
    }

    group.finish();
}

criterion_group!(plan_benches, bench_generate_plan);
criterion_main!(plan_benches);
