use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use editor_marks::{Bias, Mark, MarkVector};

/// A vector holding `count` marks spread over a document of `count * 8` chars.
fn populated(count: usize) -> (MarkVector, Vec<Mark>) {
    let vector = MarkVector::new();
    let marks: Vec<Mark> = (0..count)
        .map(|i| {
            let bias = if i % 2 == 0 { Bias::Forward } else { Bias::Backward };
            vector.create_mark(i * 8, bias)
        })
        .collect();
    vector.insert_list(&marks).unwrap();
    (vector, marks)
}

fn bench_insert_sorted(c: &mut Criterion) {
    c.bench_function("insert_list/10k_sorted", |b| {
        b.iter_batched(
            || {
                let vector = MarkVector::new();
                let marks: Vec<Mark> = (0..10_000)
                    .map(|i| vector.create_mark(i * 3, Bias::Forward))
                    .collect();
                (vector, marks)
            },
            |(vector, marks)| {
                vector.insert_list(&marks).unwrap();
                black_box(vector.mark_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    c.bench_function("typing_middle/100_inserts_10k_marks", |b| {
        b.iter_batched(
            || populated(10_000),
            |(vector, marks)| {
                let mut offset = 40_000;
                for _ in 0..100 {
                    vector.update(offset, 1, None);
                    offset += 1;
                }
                black_box(marks[9_999].offset().unwrap());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_remove_and_undo(c: &mut Criterion) {
    let (vector, marks) = populated(10_000);
    c.bench_function("remove_undo/800_chars_10k_marks", |b| {
        b.iter(|| {
            let undo = vector.update(20_000, -800, None);
            vector.update(20_000, 800, undo);
            black_box(marks[5_000].offset().unwrap());
        })
    });
}

fn bench_scattered_edits(c: &mut Criterion) {
    c.bench_function("scattered_edits/100_edits_10k_marks", |b| {
        b.iter_batched(
            || populated(10_000),
            |(vector, _marks)| {
                for i in 0..100 {
                    let offset = (i * 7_919) % 70_000;
                    vector.update(offset, 2, None);
                    vector.update(offset, -1, None);
                }
                black_box(vector.mark_count());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_insert_sorted,
    bench_typing_in_middle,
    bench_remove_and_undo,
    bench_scattered_edits
);
criterion_main!(benches);
