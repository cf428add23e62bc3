use code2block::models::TokenPolicy;
use code2block::services::BlockSplitter;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn generate_source(size_kb: usize) -> String {
    let base = r#"export function debounce(fn, wait = 100) {
    let timer = null;
    return (...args) => {
        clearTimeout(timer);
        timer = setTimeout(() => fn.apply(this, args), wait);
    };
}

"#;

    let target_bytes = size_kb * 1024;
    let mut content = String::with_capacity(target_bytes + base.len());
    while content.len() < target_bytes {
        content.push_str(base);
    }
    content
}

fn bench_split_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_sizes");
    let splitter = BlockSplitter::default();

    for size_kb in [1, 16, 256, 1024] {
        let input = generate_source(size_kb);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_kb), &input, |b, input| {
            b.iter(|| splitter.split(black_box(input)))
        });
    }

    group.finish();
}

fn bench_split_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_policies");
    let input = generate_source(256);

    for policy in [TokenPolicy::Collapse, TokenPolicy::Preserve] {
        let splitter = BlockSplitter::new(6000).with_policy(policy);
        group.bench_with_input(
            BenchmarkId::from_parameter(policy),
            &input,
            |b, input| b.iter(|| splitter.split(black_box(input))),
        );
    }

    group.finish();
}

fn bench_small_blocks(c: &mut Criterion) {
    let input = generate_source(64);
    let splitter = BlockSplitter::new(80);

    c.bench_function("split_max_len_80", |b| {
        b.iter(|| splitter.split(black_box(&input)))
    });
}

criterion_group!(
    benches,
    bench_split_sizes,
    bench_split_policies,
    bench_small_blocks
);
criterion_main!(benches);
