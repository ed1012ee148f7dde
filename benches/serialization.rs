use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_classjson::{from_str, to_string, Deserializer, TypeRegistry};

#[derive(Serialize, Deserialize, Clone, Default)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone, Default)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone, Default)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register_type::<User>()
        .and_then(|r| r.register_type::<Product>())
        .and_then(|r| r.register_type::<NestedData>())
        .and_then(|r| r.register_type::<Metadata>())
        .unwrap();
    registry
}

fn user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn nested() -> NestedData {
    NestedData {
        id: 42,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        tags: vec![
            "important".to_string(),
            "verified".to_string(),
            "production".to_string(),
        ],
    }
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn benchmark_simple(c: &mut Criterion) {
    let registry = registry();
    let user = user();
    let text = to_string(&user).unwrap();

    c.bench_function("serialize_simple_record", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
    c.bench_function("deserialize_simple_record", |b| {
        b.iter(|| from_str::<User, _>(black_box(&text), &registry))
    });
}

fn benchmark_array(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("record_array");

    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);
        let text = to_string(&products).unwrap();

        group.bench_with_input(BenchmarkId::new("serialize", size), &products, |b, p| {
            b.iter(|| to_string(black_box(p)))
        });
        group.bench_with_input(BenchmarkId::new("deserialize", size), &text, |b, text| {
            b.iter(|| from_str::<Vec<Product>, _>(black_box(text), &registry))
        });
    }
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let registry = registry();
    let data = nested();
    let text = to_string(&data).unwrap();

    c.bench_function("serialize_nested_record", |b| {
        b.iter(|| to_string(black_box(&data)))
    });
    c.bench_function("parse_nested_record_value", |b| {
        b.iter(|| Deserializer::new(&registry).deserialize(black_box(&text)))
    });
}

fn benchmark_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    let plain = "This is a medium length string with some content";
    let escaped = "tab\there, \"quotes\" and\nnew lines \\ everywhere\u{1}";

    group.bench_function("serialize_plain", |b| b.iter(|| to_string(black_box(&plain))));
    group.bench_function("serialize_escaped", |b| {
        b.iter(|| to_string(black_box(&escaped)))
    });

    let registry = TypeRegistry::new();
    let escaped_text = to_string(&escaped).unwrap();
    group.bench_function("deserialize_escaped", |b| {
        b.iter(|| from_str::<String, _>(black_box(&escaped_text), &registry))
    });

    group.finish();
}

fn benchmark_primitive_array(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    let mut group = c.benchmark_group("primitive_array");

    let numbers: Vec<i32> = (0..100).collect();
    let floats: Vec<f64> = (0..100).map(|i| i as f64 * 1.5).collect();

    group.bench_function("serialize_integers", |b| {
        b.iter(|| to_string(black_box(&numbers)))
    });
    group.bench_function("serialize_floats", |b| {
        b.iter(|| to_string(black_box(&floats)))
    });

    let numbers_text = to_string(&numbers).unwrap();
    let floats_text = to_string(&floats).unwrap();

    group.bench_function("deserialize_integers", |b| {
        b.iter(|| from_str::<Vec<i32>, _>(black_box(&numbers_text), &registry))
    });
    group.bench_function("deserialize_floats", |b| {
        b.iter(|| from_str::<Vec<f64>, _>(black_box(&floats_text), &registry))
    });

    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let registry = TypeRegistry::new();
    let data: Vec<Vec<i64>> = (0..20).map(|i| (0..i).collect()).collect();
    let mut group = c.benchmark_group("comparison");

    group.bench_function("classjson_serialize", |b| {
        b.iter(|| to_string(black_box(&data)))
    });
    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&data)))
    });

    let text = to_string(&data).unwrap();
    let json = serde_json::to_string(&data).unwrap();

    group.bench_function("classjson_deserialize", |b| {
        b.iter(|| from_str::<Vec<Vec<i64>>, _>(black_box(&text), &registry))
    });
    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<Vec<Vec<i64>>>(black_box(&json)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_simple,
    benchmark_array,
    benchmark_nested,
    benchmark_strings,
    benchmark_primitive_array,
    benchmark_comparison_with_json
);
criterion_main!(benches);
