use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    BatchSize,
    BenchmarkId,
    Criterion,
    Throughput,
};
use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};
use skipsort::{
    Config,
    Error,
    SkipSort,
    Sorter,
};

static SIZES: [usize; 3] = [1_000, 10_000, 100_000];
// values are drawn from [0, domain), so small domains mean lots of repeats
static DOMAINS: [i64; 3] = [16, 1_000, i64::MAX];

/// The standard library's unstable sort, as a baseline.
struct StdSort;

impl<T: Ord> Sorter<T> for StdSort {
    fn name(&self) -> &'static str {
        "sort_unstable"
    }

    fn sort(&mut self, data: &mut [T]) -> Result<(), Error> {
        data.sort_unstable();
        Ok(())
    }
}

fn dataset(size: usize, domain: i64) -> Vec<i64> {
    let mut rng = SmallRng::seed_from_u64(size as u64);
    (0..size).map(|_| rng.gen_range(0..domain)).collect()
}

fn run<S: Sorter<i64>>(c: &mut Criterion, group: &str, mut sorter: S) {
    let mut group = c.benchmark_group(format!("{group}/{}", sorter.name()));
    for size in SIZES.iter() {
        for domain in DOMAINS.iter() {
            group.throughput(Throughput::Elements(*size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("domain_{domain}"), size),
                size,
                |b, &size| {
                    b.iter_batched(
                        || dataset(size, *domain),
                        |mut data| {
                            sorter.sort(&mut data).unwrap();
                            black_box(data);
                        },
                        BatchSize::LargeInput,
                    )
                },
            );
        }
    }
    group.finish();
}

pub fn compare_sorts(c: &mut Criterion) {
    run(c, "compare", StdSort);
    run(
        c,
        "compare",
        SkipSort::with_rng(Config::default(), SmallRng::seed_from_u64(0)),
    );
}

/// Sweep the probability base to see where tower height stops paying off.
pub fn probability_bases(c: &mut Criterion) {
    let mut group = c.benchmark_group("probability_base");
    let data = dataset(50_000, 1 << 20);
    group.throughput(Throughput::Elements(data.len() as u64));

    for base in 2..=8 {
        let config = Config::new(base as f64).unwrap();
        let mut sorter = SkipSort::with_rng(config, SmallRng::seed_from_u64(base));
        group.bench_with_input(BenchmarkId::from_parameter(base), &data, |b, data| {
            b.iter_batched(
                || data.clone(),
                |mut data| {
                    sorter.sort(&mut data).unwrap();
                    black_box(data);
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, compare_sorts, probability_bases);
criterion_main!(benches);
