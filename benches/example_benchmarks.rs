use codspeed_criterion_compat::{criterion_group, criterion_main, BenchmarkId, Criterion};
use propstep::{Problem, Prover};

fn run_example(prover: &Prover, problems: &[Problem]) {
    for problem in problems {
        prover.prove_problem(problem);
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let prover = Prover::default();
    for entry in glob::glob("tests/problems/**/*.prop").unwrap() {
        let path = entry.unwrap().clone();
        let name = path.file_stem().unwrap().to_string_lossy().to_string();
        let program = std::fs::read_to_string(&path).unwrap();
        let problems = Problem::parse_many(&program).unwrap();
        c.bench_with_input(BenchmarkId::new("example", &name), &problems, |b, problems| {
            b.iter(|| run_example(&prover, problems))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
