//! Integration tests for pipelines running inside a transactional resource.

use std::sync::{Arc, Mutex};

use serde_json::json;
use steprail_core::{DynOutcome, Outcome, StepOutput, Tag, Value};
use steprail_pipeline::{
    Pipeline, PipelineError, Registry, ScopeBlock, ScopeError, StepFault, StepTable,
    TransactionBoundary, TransactionalResource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeEnd {
    Committed,
    Aborted,
}

/// Stands in for a database: writes made inside a scope are staged and
/// only become visible on commit.
#[derive(Default)]
struct FakeDatabase {
    rows: Mutex<Vec<String>>,
    staged: Mutex<Vec<String>>,
    endings: Mutex<Vec<ScopeEnd>>,
}

impl FakeDatabase {
    fn stage(&self, row: &str) {
        self.staged.lock().expect("lock staged").push(row.to_string());
    }

    fn rows(&self) -> Vec<String> {
        self.rows.lock().expect("lock rows").clone()
    }

    fn endings(&self) -> Vec<ScopeEnd> {
        self.endings.lock().expect("lock endings").clone()
    }
}

impl TransactionalResource for FakeDatabase {
    fn run_in_scope(&self, block: ScopeBlock<'_>) -> Result<StepOutput, ScopeError> {
        self.staged.lock().expect("lock staged").clear();
        let result = block();
        let mut staged = std::mem::take(&mut *self.staged.lock().expect("lock staged"));
        let ending = if result.is_ok() {
            self.rows.lock().expect("lock rows").append(&mut staged);
            ScopeEnd::Committed
        } else {
            ScopeEnd::Aborted
        };
        self.endings.lock().expect("lock endings").push(ending);
        result
    }
}

fn steps(db: &Arc<FakeDatabase>) -> StepTable {
    let insert_db = Arc::clone(db);
    StepTable::new()
        .with("insert", move |v: Value| {
            insert_db.stage(v.as_str().unwrap_or_default());
            Ok(json!(["ok", v]))
        })
        .with("db_fail", |_| Ok((Tag::Error, json!("db fail"))))
        .with("crash", |_| Err::<Value, StepFault>("Boom".into()))
}

fn setup() -> (Arc<FakeDatabase>, TransactionBoundary, StepTable) {
    let db = Arc::new(FakeDatabase::default());
    let boundary = TransactionBoundary::with_resource(db.clone());
    let table = steps(&db);
    (db, boundary, table)
}

#[test]
fn failure_result_rolls_back_and_is_returned_as_value() {
    let (db, boundary, table) = setup();
    let pipeline = Pipeline::builder("save")
        .transactional(true)
        .step("insert")
        .step("db_fail")
        .build();

    let result = pipeline
        .call_in(&boundary, &table, json!("order-1"))
        .expect("rollback is delivered as a value");

    assert!(result.is_failure());
    assert_eq!(result, Outcome::fail(json!("db fail")));
    assert_eq!(db.endings(), vec![ScopeEnd::Aborted]);
    assert!(db.rows().is_empty());
}

#[test]
fn success_commits_the_scope() {
    let (db, boundary, table) = setup();
    let pipeline = Pipeline::builder("save")
        .transactional(true)
        .step("insert")
        .build();

    let result = pipeline
        .call_in(&boundary, &table, json!("order-2"))
        .expect("no fault");

    assert_eq!(result, Outcome::succeed(json!("order-2")));
    assert_eq!(db.endings(), vec![ScopeEnd::Committed]);
    assert_eq!(db.rows(), vec!["order-2"]);
}

#[test]
fn unsafe_fault_aborts_and_propagates() {
    let (db, boundary, table) = setup();
    let pipeline = Pipeline::builder("save")
        .transactional(true)
        .step("insert")
        .step("crash")
        .build();

    let err = pipeline
        .call_in(&boundary, &table, json!("order-3"))
        .expect_err("fault reaches the caller");

    assert!(matches!(err, PipelineError::Step { ref step, .. } if step == "crash"));
    assert_eq!(db.endings(), vec![ScopeEnd::Aborted]);
    assert!(db.rows().is_empty());
}

#[test]
fn safe_fault_becomes_failure_and_still_rolls_back() {
    let (db, boundary, table) = setup();
    let pipeline = Pipeline::builder("save")
        .transactional(true)
        .safe(true)
        .step("insert")
        .step("crash")
        .build();

    let result = pipeline
        .call_in(&boundary, &table, json!("order-4"))
        .expect("safe mode never raises");

    assert_eq!(result, Outcome::fail(json!("Boom")));
    assert_eq!(db.endings(), vec![ScopeEnd::Aborted]);
}

#[test]
fn non_transactional_pipeline_ignores_the_resource() {
    let (db, boundary, table) = setup();
    let pipeline = Pipeline::builder("save").step("insert").build();

    let result = pipeline
        .call_in(&boundary, &table, json!("order-5"))
        .expect("no fault");

    assert!(result.is_ok());
    assert!(db.endings().is_empty());
}

#[test]
fn registry_calls_use_the_registry_boundary() {
    let (db, boundary, table) = setup();
    let mut registry = Registry::with_boundary(boundary);
    registry.define("save", |p| p.transactional(true).step("insert").step("db_fail"));

    let result = registry
        .call("save", &table, json!("order-6"))
        .expect("rollback is delivered as a value");

    assert_eq!(result.failure(), Some(json!("db fail")));
    assert_eq!(db.endings(), vec![ScopeEnd::Aborted]);
}

#[test]
fn standalone_boundary_rolls_back_chained_outcomes() {
    let (db, boundary, _) = setup();

    let result = boundary
        .run_outcome(|| {
            Ok(DynOutcome::succeed(json!("start"))
                .and_then(|_| Outcome::fail(json!("db fail"))))
        })
        .expect("rollback is not a fault");

    assert_eq!(result, Outcome::fail(json!("db fail")));
    assert_eq!(db.endings(), vec![ScopeEnd::Aborted]);
}
