use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weather_dashboard::{
    classify, coerce, generate_sample_dataset, parse_csv, to_csv, FieldVocabulary, Record,
};

fn sample_csv(rows: usize) -> String {
    let dataset = generate_sample_dataset(Utc::now(), rows);
    let records: Vec<&Record> = dataset.iter().collect();
    to_csv(&dataset.columns(), &records).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let csv = sample_csv(1_000);
    let vocabulary = FieldVocabulary::default();
    let parsed = parse_csv(&csv).unwrap();
    let classification = classify(&parsed, &vocabulary);

    c.bench_function("parse_csv", |b| b.iter(|| parse_csv(black_box(&csv))));
    c.bench_function("classify", |b| {
        b.iter(|| classify(black_box(&parsed), black_box(&vocabulary)))
    });
    c.bench_function("coerce", |b| {
        b.iter(|| coerce(black_box(&parsed), black_box(&classification)))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
