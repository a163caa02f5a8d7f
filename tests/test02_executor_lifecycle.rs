mod common;

use common::{Call, FailAt, recorded_connection};
use sql_chain::prelude::*;

#[tokio::test]
async fn full_cycle_runs_in_order_and_releases() -> Result<(), Box<dyn std::error::Error>> {
    let (conn, recorder) = recorded_connection("main");
    recorder.report_rows_affected(1);
    recorder.report_insert_id(42);

    let outcome = conn
        .table("users")
        .insert([("name", "Ann"), ("city", "Oslo")])
        .execute()
        .await?;
    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(outcome.last_insert_id, 42);
    assert!(outcome.rows.is_none());

    let id = StatementId(1);
    assert_eq!(
        recorder.calls(),
        vec![
            Call::Connect,
            Call::Prepare(id, "INSERT INTO `users` (name,city) VALUES (?,?)".into()),
            Call::Bind(
                id,
                "ss".into(),
                vec![RowValues::Text("Ann".into()), RowValues::Text("Oslo".into())]
            ),
            Call::Execute(id),
            Call::Close(id),
        ]
    );
    assert_eq!(conn.last_insert_id().await, 42);
    assert_eq!(conn.open_statements().await, 0);
    Ok(())
}

#[tokio::test]
async fn binding_failure_skips_execute_but_releases() {
    let (conn, recorder) = recorded_connection("main");
    recorder.fail_at(FailAt::Bind);

    let err = conn
        .table("users")
        .select_all()
        .where_("id", "=", 1)
        .execute()
        .await
        .unwrap_err();
    assert!(err.is_binding_error());
    assert_eq!(recorder.executed(), 0);
    assert_eq!(recorder.calls().last(), Some(&Call::Close(StatementId(1))));
    assert_eq!(conn.open_statements().await, 0);
}

#[tokio::test]
async fn tag_arity_mismatch_never_reaches_the_driver_bind() {
    let (conn, recorder) = recorded_connection("main");

    let err = conn
        .execute_sql("SELECT ?", vec![RowValues::Int(1)], "ii", false)
        .await
        .unwrap_err();
    assert!(err.is_binding_error());

    let calls = recorder.calls();
    assert!(!calls.iter().any(|c| matches!(c, Call::Bind(..) | Call::Execute(_))));
    assert!(calls.contains(&Call::Close(StatementId(1))));
}

#[tokio::test]
async fn no_parameters_means_no_bind_call() -> Result<(), Box<dyn std::error::Error>> {
    let (conn, recorder) = recorded_connection("main");
    conn.table("users").delete().execute().await?;
    assert!(!recorder.calls().iter().any(|c| matches!(c, Call::Bind(..))));
    Ok(())
}

#[tokio::test]
async fn failures_are_classified_by_step() {
    let cases: [(FailAt, fn(&SqlChainError) -> bool); 4] = [
        (FailAt::Connect, SqlChainError::is_connection_error),
        (FailAt::Prepare, SqlChainError::is_preparation_error),
        (FailAt::Execute, SqlChainError::is_execution_error),
        (FailAt::Fetch, SqlChainError::is_fetch_error),
    ];
    for (step, check) in cases {
        let (conn, recorder) = recorded_connection("main");
        recorder.fail_at(step);
        let err = conn
            .table("users")
            .select_all()
            .fetch()
            .await
            .unwrap_err();
        assert!(check(&err), "{step:?}: {err}");
        assert_eq!(conn.open_statements().await, 0, "{step:?}");
    }
}

#[tokio::test]
async fn prepare_failure_still_releases_the_id() {
    let (conn, recorder) = recorded_connection("main");
    recorder.fail_at(FailAt::Prepare);
    let _ = conn.table("users").delete().execute().await;
    assert_eq!(recorder.calls().last(), Some(&Call::Close(StatementId(1))));
}

#[tokio::test]
async fn release_failure_on_success_is_reported() {
    let (conn, recorder) = recorded_connection("main");
    recorder.fail_at(FailAt::Close);
    let err = conn.table("users").delete().execute().await.unwrap_err();
    assert!(matches!(err, SqlChainError::Other(_)));
    assert_eq!(conn.open_statements().await, 0);
}

#[tokio::test]
async fn release_failure_after_error_keeps_the_original_error() {
    let (conn, recorder) = recorded_connection("main");
    recorder.fail_at(FailAt::Execute);
    recorder.fail_at(FailAt::Close);
    let err = conn.table("users").delete().execute().await.unwrap_err();
    assert!(err.is_execution_error());
    assert_eq!(recorder.calls().last(), Some(&Call::Close(StatementId(1))));
}

#[tokio::test]
async fn statement_ids_increment_per_connection() -> Result<(), Box<dyn std::error::Error>> {
    let (first, first_rec) = recorded_connection("first");
    let (second, second_rec) = recorded_connection("second");

    first.table("a").delete().execute().await?;
    first.table("a").delete().execute().await?;
    second.table("b").delete().execute().await?;

    let ids = |calls: Vec<Call>| -> Vec<StatementId> {
        calls
            .into_iter()
            .filter_map(|c| match c {
                Call::Prepare(id, _) => Some(id),
                _ => None,
            })
            .collect()
    };
    assert_eq!(ids(first_rec.calls()), vec![StatementId(1), StatementId(2)]);
    assert_eq!(ids(second_rec.calls()), vec![StatementId(1)]);
    Ok(())
}

#[tokio::test]
async fn connection_opens_lazily_once() -> Result<(), Box<dyn std::error::Error>> {
    let (conn, recorder) = recorded_connection("main");
    assert!(!conn.is_open().await);
    assert_eq!(conn.last_insert_id().await, -1);

    conn.table("a").delete().execute().await?;
    conn.table("a").delete().execute().await?;
    let connects = recorder
        .calls()
        .iter()
        .filter(|c| **c == Call::Connect)
        .count();
    assert_eq!(connects, 1);
    assert!(conn.is_open().await);

    conn.close().await?;
    assert!(!conn.is_open().await);
    assert_eq!(recorder.calls().last(), Some(&Call::Disconnect));
    Ok(())
}

#[tokio::test]
async fn fetch_returns_driver_rows_with_affected_count() -> Result<(), Box<dyn std::error::Error>> {
    let (conn, recorder) = recorded_connection("main");
    let mut rows = ResultSet::default();
    rows.add_row(Row::from_pairs([("id", RowValues::Int(1)), ("name", RowValues::from("Ann"))]));
    rows.add_row(Row::from_pairs([("id", RowValues::Int(2)), ("name", RowValues::from("Bob"))]));
    recorder.respond_with(rows);

    let fetched = conn.table("users").select_all().fetch().await?;
    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched.results[1].get("name"), Some(&RowValues::from("Bob")));

    let first = conn.table("users").select_all().fetch_first().await?;
    assert_eq!(first.and_then(|r| r.get("id").cloned()), Some(RowValues::Int(1)));
    Ok(())
}

#[tokio::test]
async fn builder_insert_id_reads_the_connection() -> Result<(), Box<dyn std::error::Error>> {
    let (conn, recorder) = recorded_connection("main");
    let pending = conn.table("users").delete();
    assert_eq!(pending.last_insert_id().await, -1);

    recorder.report_insert_id(8);
    conn.table("users").insert([("name", "Ann")]).execute().await?;
    assert_eq!(pending.last_insert_id().await, 8);
    assert_eq!(conn.last_insert_id().await, 8);
    Ok(())
}

#[tokio::test]
async fn escape_goes_through_the_driver() {
    let (conn, _) = recorded_connection("main");
    assert_eq!(conn.escape_string("it's").await, "it\\'s");
}

#[tokio::test]
async fn concurrent_callers_are_serialized() -> Result<(), Box<dyn std::error::Error>> {
    let (conn, recorder) = recorded_connection("main");
    let mut handles = Vec::new();
    for i in 0..8 {
        let conn = conn.clone();
        handles.push(tokio::spawn(async move {
            conn.table("t").delete().where_("id", "=", i).execute().await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    // Each statement's calls must be contiguous: prepare, bind, execute, close.
    let calls: Vec<Call> = recorder
        .calls()
        .into_iter()
        .filter(|c| *c != Call::Connect)
        .collect();
    assert_eq!(calls.len(), 8 * 4);
    for chunk in calls.chunks(4) {
        let Call::Prepare(id, _) = &chunk[0] else {
            panic!("expected prepare, got {:?}", chunk[0]);
        };
        assert!(matches!(&chunk[1], Call::Bind(b, ..) if b == id));
        assert_eq!(chunk[2], Call::Execute(*id));
        assert_eq!(chunk[3], Call::Close(*id));
    }
    Ok(())
}
