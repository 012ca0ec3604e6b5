use std::error::Error;

use criterion::{
    criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode,
    Throughput,
};
use prefix_gaptree::{InsertOptions, Tree};

// Allocate every block of `len` inside `start` through find_gap_from,
// until there is none left.
fn drain(
    start: &str,
    start_len: u8,
    len: u8,
) -> Result<Tree<u32>, Box<dyn Error>> {
    let mut tree = Tree::new();
    let pool = InsertOptions::default().with_mark_used(false);
    tree.insert(start, None::<u32>, pool)?;

    let mut count = 0_u32;
    while let Some(gap) = tree.find_gap_from(start, len)? {
        tree.insert_cidr(gap, count, InsertOptions::default());
        count += 1;
    }
    assert_eq!(count as u64, 1 << (len - start_len));

    Ok(tree)
}

// Look for a free /len in a tree that is full except for its very last
// block, which is the worst case for the search.
fn search_almost_full(tree: &Tree<u32>, len: u8) -> Result<(), Box<dyn Error>> {
    let gap = tree.find_gap(len)?;
    assert!(gap.is_some());
    Ok(())
}

fn bench(c: &mut Criterion) {
    let sizes: [(&str, u8, u8); 3] = [
        ("10.0.0.0/8", 8, 16),
        ("10.0.0.0/8", 8, 20),
        ("10.0.0.0/16", 16, 28),
    ];

    let mut group = c.benchmark_group("drain");
    for (start, start_len, len) in sizes {
        let name = format!("{} by /{}", start, len);
        group.sampling_mode(SamplingMode::Flat);
        group.throughput(Throughput::Elements(1 << (len - start_len)));
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(start, start_len, len),
            |b, (start, start_len, len)| {
                b.iter(|| {
                    drain(start, *start_len, *len).expect("Failed to drain")
                })
            },
        );
    }
    group.finish();

    let mut group = c.benchmark_group("search almost full");
    for len in [8_u8, 12, 16] {
        let mut tree = Tree::new();
        let blocks: Vec<_> = tree
            .generate_for_prefix(len)
            .expect("Failed to generate blocks")
            .collect();
        if let Some((_last, rest)) = blocks.split_last() {
            for (i, block) in rest.iter().enumerate() {
                tree.insert_cidr(*block, i as u32, InsertOptions::default());
            }
        }
        group.sampling_mode(SamplingMode::Auto);
        group.bench_with_input(
            BenchmarkId::from_parameter(len),
            &tree,
            |b, tree| {
                b.iter(|| {
                    search_almost_full(tree, len)
                        .expect("Failed to find the last gap")
                })
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench
}
criterion_main!(benches);
