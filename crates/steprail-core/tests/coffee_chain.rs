//! Chaining outcomes by hand, without a pipeline.

use serde_json::json;
use steprail_core::{DynOutcome, InvalidStepResult, Outcome, Tag, Value, start};

fn grind_beans(coffee_type: Value) -> Value {
    match coffee_type.as_str() {
        Some(kind @ ("espresso" | "latte" | "cappuccino")) => {
            json!(["ok", format!("Grinding {kind} beans")])
        }
        _ => json!(["error", "Invalid coffee type"]),
    }
}

fn brew_coffee(msg: Value) -> (Tag, Value) {
    let msg = msg.as_str().unwrap_or_default();
    (
        Tag::Ok,
        json!(msg.replace("Grinding", "Brewing").replace("beans", "")),
    )
}

fn serve(msg: Value) -> DynOutcome {
    let msg = msg.as_str().unwrap_or_default();
    Outcome::succeed(json!(format!("{} into cup", msg.replace("Brewing", "Serving"))))
}

fn brew(coffee_type: &str) -> Result<DynOutcome, InvalidStepResult> {
    start(json!(coffee_type))
        .then(grind_beans)?
        .then(brew_coffee)?
        .then(serve)
}

#[test]
fn brewing_espresso_runs_every_step() -> anyhow::Result<()> {
    let result = brew("espresso")?;

    assert!(result.is_ok());
    let served = result.unwrap_strict()?;
    assert!(served.as_str().unwrap_or_default().starts_with("Serving espresso"));
    Ok(())
}

#[test]
fn brewing_mud_stops_at_the_grinder() -> anyhow::Result<()> {
    let result = brew("mud")?;

    assert!(result.is_failure());
    assert_eq!(result.failure(), Some(json!("Invalid coffee type")));
    Ok(())
}

#[test]
fn unwrap_strict_on_failed_brew_reports_payload() -> anyhow::Result<()> {
    let err = brew("mud")?
        .unwrap_strict()
        .expect_err("mud never brews");

    assert_eq!(err.payload, json!("Invalid coffee type"));
    Ok(())
}

#[test]
fn map_and_observers_compose_with_then() -> anyhow::Result<()> {
    let mut seen = Vec::new();

    let result = start::<Value, Value>(json!(3))
        .then(|v| json!(["ok", v.as_i64().unwrap_or_default() * 2]))?
        .on_success(|v| seen.push(v.clone()))
        .map(|v| json!(v.to_string()));

    assert_eq!(result, Outcome::succeed(json!("6")));
    assert_eq!(seen, vec![json!(6)]);
    Ok(())
}

#[test]
fn returning_a_bare_value_is_a_contract_violation() {
    let err = start::<Value, Value>(json!("hello"))
        .then(|v| v)
        .expect_err("a bare string has no outcome shape");

    assert!(err.to_string().contains("\"hello\""));
}
