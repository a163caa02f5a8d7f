//! Criterion benchmarks for statement rendering and the `SQLite` round trip.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sql_chain::prelude::*;
use sql_chain::count_placeholders;
use tokio::runtime::Runtime;

fn build_select(conn: &ConnectionHandle, filters: usize) -> SqlResult<FinalizedStatement> {
    let mut stmt = conn
        .table("users")
        .select(["id", "name", "score"])
        .left_join("orders", |q| q.on("orders.user_id", "=", "users.id"))
        .where_("active", "=", 1);
    for i in 0..filters {
        stmt = stmt.and(&format!("col{i}"), ">", i64::try_from(i).unwrap_or_default());
    }
    stmt.order_by("name", SortDirection::Asc).limit(50).finalize()
}

fn bench_builder(c: &mut Criterion) {
    let conn = ConnectionHandle::sqlite("bench", ConnectionConfig::new(":memory:"));
    let mut group = c.benchmark_group("statement_builder");
    for filters in [1_usize, 8, 64] {
        group.bench_with_input(BenchmarkId::new("select_finalize", filters), &filters, |b, &n| {
            b.iter(|| black_box(build_select(&conn, n)));
        });
    }
    group.finish();

    let sql = build_select(&conn, 256).map(|s| s.sql).unwrap_or_default();
    c.bench_function("count_placeholders_256", |b| {
        b.iter(|| black_box(count_placeholders(black_box(&sql))));
    });
}

fn bench_sqlite_round_trip(c: &mut Criterion) {
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(err) => panic!("tokio runtime: {err}"),
    };
    let conn = ConnectionHandle::sqlite("bench", ConnectionConfig::new(":memory:"));
    let setup = rt.block_on(async {
        conn.query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, score REAL)")
            .execute()
            .await?;
        for i in 0..1_000_i64 {
            conn.table("users")
                .insert([("name", RowValues::Text(format!("user-{i}"))), ("score", RowValues::Int(i))])
                .execute()
                .await?;
        }
        Ok::<(), SqlChainError>(())
    });
    if let Err(err) = setup {
        panic!("seed failed: {err}");
    }

    c.bench_function("sqlite_single_row_lookup", |b| {
        b.to_async(&rt).iter(|| async {
            let row = conn
                .table("users")
                .select_all()
                .where_("id", "=", 500)
                .fetch_first()
                .await;
            black_box(row)
        });
    });
}

criterion_group!(benches, bench_builder, bench_sqlite_round_trip);
criterion_main!(benches);
