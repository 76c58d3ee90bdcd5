use bounded_collections::{
    BoundedBitmap,
    BoundedStack,
};
use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    Criterion,
};
use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};

criterion_group!(
    bench_bounded,
    bench_bitmap_insert_then_clear,
    bench_bitmap_get,
    bench_worklist_round,
);
criterion_main!(bench_bounded);

/// Returns `amount` random indices below `len`, the same ones on every call.
fn random_indices(len: usize, amount: usize) -> Vec<usize> {
    let mut rng = SmallRng::seed_from_u64(0);
    (0..amount).map(|_| rng.gen_range(0, len)).collect()
}

fn bench_bitmap_insert_then_clear(c: &mut Criterion) {
    let mut g = c.benchmark_group("bitmap::insert_then_clear");
    let len = 100_000;
    let indices = random_indices(len, 1_000);
    let mut bit_map = <BoundedBitmap<usize>>::with_len(len);
    let mut vec_bool = vec![false; len];
    g.bench_function("BoundedBitmap", |bencher| {
        bencher.iter(|| {
            for &i in &indices {
                black_box(bit_map.insert(i).unwrap());
            }
            bit_map.clear();
        })
    });
    g.bench_function("Vec<bool> (reference)", |bencher| {
        bencher.iter(|| {
            for &i in &indices {
                black_box(!vec_bool[i]);
                vec_bool[i] = true;
            }
            vec_bool.iter_mut().for_each(|flag| *flag = false);
        })
    });
}

fn bench_bitmap_get(c: &mut Criterion) {
    let mut g = c.benchmark_group("bitmap::get");
    let len = 100_000;
    let bit_map = <BoundedBitmap<usize>>::with_len(len);
    let vec_bool = vec![false; len];
    g.bench_function("BoundedBitmap", |bencher| {
        bencher.iter(|| {
            for i in 0..len {
                assert_eq!(bit_map.get(i), Ok(false));
            }
        })
    });
    g.bench_function("Vec<bool> (reference)", |bencher| {
        bencher.iter(|| {
            for i in 0..len {
                assert!(!vec_bool[i]);
            }
        })
    });
}

/// Marks and pushes random indices and drains the stack again, like one
/// round of a worklist fixpoint.
fn bench_worklist_round(c: &mut Criterion) {
    let mut g = c.benchmark_group("worklist::round");
    let len = 10_000;
    let indices = random_indices(len, 5_000);
    let mut marks = <BoundedBitmap<usize>>::with_len(len);
    let mut stack = <BoundedStack<usize>>::with_capacity(len);
    g.bench_function("BoundedBitmap + BoundedStack", |bencher| {
        bencher.iter(|| {
            marks.clear();
            stack.clear();
            for &i in &indices {
                if marks.insert(i).unwrap() {
                    stack.push(i);
                }
            }
            while let Some(i) = stack.pop() {
                black_box(i);
            }
        })
    });
    let mut vec_marks = vec![false; len];
    let mut vec_stack = Vec::with_capacity(len);
    g.bench_function("Vec<bool> + Vec (reference)", |bencher| {
        bencher.iter(|| {
            vec_marks.iter_mut().for_each(|flag| *flag = false);
            vec_stack.clear();
            for &i in &indices {
                if !vec_marks[i] {
                    vec_marks[i] = true;
                    vec_stack.push(i);
                }
            }
            while let Some(i) = vec_stack.pop() {
                black_box(i);
            }
        })
    });
}
