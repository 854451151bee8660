//! Query and Rendering Benchmarks
//!
//! Measures the view layer over a few thousand generated records:
//! - Client filtering and sorting
//! - Pagination of a filtered list
//! - Template rendering

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use ca_core::config::PortalConfig;
use ca_core::models::{ClientStatus, NewClient};
use ca_core::query::{ClientQuery, ClientSortField, SortOrder, filter_clients, paginate};
use ca_core::sample::sample_templates;
use ca_core::store::PracticeStore;
use ca_core::template::{VariableData, render};

const CATEGORIES: [&str; 5] = ["Individual", "Company", "Startup", "Partnership", "LLP"];

fn populated_store(count: usize) -> PracticeStore {
    let mut store = PracticeStore::new();
    for i in 0..count {
        let status = ClientStatus::ALL[i % ClientStatus::ALL.len()];
        store.add_client(
            NewClient::new(
                format!("Client {}", i),
                format!("client{}@example.com", i),
                format!("+91 90000{:05}", i),
                format!("Company {}", i % 97),
                "Pvt Ltd",
            )
            .with_category(CATEGORIES[i % CATEGORIES.len()])
            .with_status(status),
        );
    }
    store
}

fn bench_client_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("client_filter");

    for size in [100, 1000, 5000] {
        let store = populated_store(size);

        group.bench_with_input(BenchmarkId::new("search", size), &store, |b, store| {
            let query = ClientQuery::new().search("company 4");
            b.iter(|| black_box(filter_clients(store.clients(), &query)))
        });

        group.bench_with_input(BenchmarkId::new("category_status_sorted", size), &store, |b, store| {
            let query = ClientQuery::new()
                .category("Startup")
                .status(ClientStatus::Active)
                .sort_by(ClientSortField::Name, SortOrder::Asc);
            b.iter(|| black_box(filter_clients(store.clients(), &query)))
        });
    }

    group.finish();
}

fn bench_paginate(c: &mut Criterion) {
    let store = populated_store(5000);
    let filtered = filter_clients(store.clients(), &ClientQuery::new());

    c.bench_function("paginate_page_25", |b| b.iter(|| black_box(paginate(&filtered, 25, 10))));
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_render");
    let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap_or_default();
    let data = VariableData::sample(&PortalConfig::default(), today);

    for template in sample_templates() {
        group.bench_with_input(BenchmarkId::new("body", template.id), &template.body, |b, body| {
            b.iter(|| black_box(render(body, &data)))
        });
    }

    let unknown = "Hi {{client_name}}, {{foo}} {{bar}} {{baz}}".repeat(50);
    group.bench_function("unknown_placeholders", |b| b.iter(|| black_box(render(&unknown, &data))));

    group.finish();
}

criterion_group!(benches, bench_client_filter, bench_paginate, bench_render);
criterion_main!(benches);
