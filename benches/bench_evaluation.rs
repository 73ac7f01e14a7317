use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use genforge::{
    concurrency::Executor,
    evaluation::{ConcurrentEvaluator, Evaluator, SerialEvaluator},
    fitness::{IdentityScaler, Optimize},
    genetics::{DoubleChromosome, Genotype},
    phenotype::Phenotype,
    population::Population,
    rng::RandomNumberGenerator,
    statistics::StatisticsCalculator,
};

// Rastrigin function, made artificially expensive by repeating it.
fn rastrigin(genotype: &Genotype<DoubleChromosome>) -> f64 {
    let values = genotype.chromosome(0).values();
    let mut total = 0.0;
    for _ in 0..50 {
        total = values.iter().fold(10.0 * values.len() as f64, |acc, x| {
            acc + x * x - 10.0 * (2.0 * std::f64::consts::PI * x).cos()
        });
    }
    -total
}

fn population(size: usize, rng: &mut RandomNumberGenerator) -> Population<DoubleChromosome, f64> {
    (0..size)
        .map(|_| {
            Phenotype::<DoubleChromosome, f64>::new(
                Genotype::single(DoubleChromosome::new(30, -5.12, 5.12, rng).unwrap()),
                Arc::new(rastrigin),
                Arc::new(IdentityScaler),
                0,
            )
        })
        .collect()
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fitness Evaluation");
    let mut rng = RandomNumberGenerator::from_seed(42);
    let executor = Executor::with_threads(4).unwrap();

    for size in [100, 1000, 5000].iter() {
        let template = population(*size, &mut rng);

        group.bench_with_input(BenchmarkId::new("Serial", size), size, |b, _| {
            b.iter_batched(
                || template.iter().map(|p| p.new_instance(p.genotype().clone(), 0)).collect(),
                |fresh: Population<DoubleChromosome, f64>| {
                    SerialEvaluator.evaluate(black_box(&fresh)).unwrap()
                },
                criterion::BatchSize::LargeInput,
            )
        });

        let evaluator = ConcurrentEvaluator::with_executor(executor.clone());
        group.bench_with_input(BenchmarkId::new("Concurrent", size), size, |b, _| {
            b.iter_batched(
                || template.iter().map(|p| p.new_instance(p.genotype().clone(), 0)).collect(),
                |fresh: Population<DoubleChromosome, f64>| {
                    evaluator.evaluate(black_box(&fresh)).unwrap()
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("Statistics");
    let mut rng = RandomNumberGenerator::from_seed(7);
    let population = population(5000, &mut rng);
    SerialEvaluator.evaluate(&population).unwrap();

    let serial = StatisticsCalculator::serial();
    let concurrent = StatisticsCalculator::concurrent(Executor::Global, 8).unwrap();

    group.bench_function("Serial", |b| {
        b.iter(|| serial.evaluate(black_box(&population), 10, Optimize::Maximum).unwrap())
    });
    group.bench_function("Concurrent", |b| {
        b.iter(|| concurrent.evaluate(black_box(&population), 10, Optimize::Maximum).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_evaluation, bench_statistics);
criterion_main!(benches);
