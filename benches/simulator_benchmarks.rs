use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tomasulo_rust::simulator::config::SimulatorConfig;
use tomasulo_rust::simulator::simulator::Simulator;
use tomasulo_rust::utils::{parser, trace_generator};

fn trace_parsing_benchmark(c: &mut Criterion) {
    let trace = trace_generator::generate(500, Some(11));

    c.bench_function("trace_parsing_500", |b| {
        b.iter(|| {
            let instructions = parser::parse_str(black_box(&trace));
            black_box(instructions)
        })
    });
}

fn simulation_benchmark(c: &mut Criterion) {
    let trace = trace_generator::generate(200, Some(11));
    let instructions = parser::parse_str(&trace);

    c.bench_function("simulation_200_instructions", |b| {
        b.iter(|| {
            let mut simulator = Simulator::with_seed(SimulatorConfig::default(), 42);
            simulator.load_program(instructions.clone());
            let report = simulator.run().expect("benchmark trace must run");
            black_box(report)
        })
    });
}

fn dependent_chain_benchmark(c: &mut Criterion) {
    // Worst case for the forwarding path: every instruction reads the
    // previous one's destination.
    let trace = "ADD R1, R1, R2\n".repeat(100);
    let instructions = parser::parse_str(&trace);

    c.bench_function("dependent_chain_100", |b| {
        b.iter(|| {
            let mut simulator = Simulator::with_seed(SimulatorConfig::default(), 42);
            simulator.load_program(instructions.clone());
            let report = simulator.run().expect("benchmark trace must run");
            black_box(report)
        })
    });
}

criterion_group!(
    benches,
    trace_parsing_benchmark,
    simulation_benchmark,
    dependent_chain_benchmark
);
criterion_main!(benches);
