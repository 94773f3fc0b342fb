use battlesnake_conformance::agent::RandomReasonableAgent;
use battlesnake_conformance::conformance::{run_variations, Fixture, RunConfig};
use battlesnake_conformance::fixture_from_json;
use battlesnake_conformance::types::RunInstruments;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const FIXTURE: &str = r#"{
    "key": "corridor",
    "board": "_ _ _ _ _ _\n_ _ _ _ _ _\n0 < < < _ _\n_ _ _ _ _ a",
    "acceptableSequences": [
        [{"0": "up"}, {"0": "up"}, {"0": "right"}, {"0": "right"}],
        [{"0": "down"}, {"0": "right"}, {"0": "right"}, {"0": "up"}],
        [{"0": "up"}, {"0": "right"}, {"0": "right"}, {"0": "right"}]
    ]
}"#;

#[derive(Debug, Default)]
struct Instruments {
    total_nanos: AtomicU64,
}

impl RunInstruments for Instruments {
    fn observe_agent_call(&self, duration: Duration) {
        self.total_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let fixture: Fixture = fixture_from_json(FIXTURE).unwrap();
    let tc = fixture.test_case().unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    c.bench_function("eight variations vs random agent", |b| {
        let agent = RandomReasonableAgent::seeded(11);
        b.iter(|| {
            let results = runtime.block_on(run_variations(&tc, &agent, RunConfig::default()));
            black_box(results)
        })
    });

    let instruments = Instruments::default();
    runtime.block_on(async {
        let agent = RandomReasonableAgent::seeded(11);
        for case in fixture.test_cases().unwrap().iter() {
            let ctx = battlesnake_conformance::conformance::TestContext::new(
                case,
                &agent,
                RunConfig::default(),
            )
            .unwrap()
            .with_instruments(&instruments);
            let _ = ctx.run().await;
        }
    });
    eprintln!(
        "agent time over one pass: {:?}",
        Duration::from_nanos(instruments.total_nanos.load(Ordering::Relaxed))
    );
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
