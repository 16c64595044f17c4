use std::sync::Arc;

use serde_json::{Value, json};
use steprail_core::{DynOutcome, Outcome};
use steprail_pipeline::{Receiver, StepResult};
use thiserror::Error;
use tracing::trace;

use crate::journal::Journal;

pub(crate) const STEPS: &[&str] = &[
    "grind_beans",
    "brew_coffee",
    "pour_into_cup",
    "add_sugar",
    "add_cream",
    "serve",
    "upcase",
    "crash",
];

#[derive(Debug, Error)]
#[error("Boom")]
struct Crashed;

/// Built-in receiver the `run` command dispatches to.
#[derive(Debug)]
pub(crate) struct CoffeeMachine {
    journal: Arc<Journal>,
}

impl CoffeeMachine {
    pub(crate) fn new(journal: Arc<Journal>) -> Self {
        Self { journal }
    }

    fn grind_beans(&self, coffee_type: &Value) -> DynOutcome {
        match coffee_type.as_str() {
            Some(kind @ ("espresso" | "latte" | "cappuccino")) => {
                self.journal.record(format!("ground {kind} beans"));
                Outcome::succeed(json!(format!("Grinding {kind} beans")))
            }
            _ => Outcome::fail(json!("Invalid coffee type")),
        }
    }

    fn pour_into_cup(&self, msg: &str) -> DynOutcome {
        self.journal.record("poured a cup");
        Outcome::succeed(json!(format!("{} into cup", msg.replacen("Brewing", "Pouring", 1))))
    }

    fn serve(&self, msg: &str) -> DynOutcome {
        self.journal.record("served");
        Outcome::succeed(json!(msg.replacen("Pouring", "Serving", 1)))
    }
}

/// Strings as-is, anything else as JSON.
pub(crate) fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Receiver for CoffeeMachine {
    fn invoke(&self, step: &str, value: Value) -> Option<StepResult> {
        trace!(step, %value, "machine step");
        let msg = text(&value);
        let output: StepResult = match step {
            "grind_beans" => Ok(self.grind_beans(&value).into()),
            "brew_coffee" => Ok(json!([
                "ok",
                msg.replacen("Grinding", "Brewing", 1).replacen("beans", "", 1)
            ])
            .into()),
            "pour_into_cup" => Ok(self.pour_into_cup(&msg).into()),
            "add_sugar" => Ok(json!(["ok", format!("{msg} with sugar")]).into()),
            "add_cream" => Ok(json!(["ok", format!("{msg} with cream")]).into()),
            "serve" => Ok(self.serve(&msg).into()),
            "upcase" => Ok(json!(msg.to_uppercase()).into()),
            "crash" => Err(Crashed.into()),
            _ => return None,
        };
        Some(output)
    }
}
