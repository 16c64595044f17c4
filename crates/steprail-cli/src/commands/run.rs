use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use serde_json::Value;
use steprail_core::DynOutcome;
use steprail_pipeline::{PipelineConfig, TransactionBoundary};
use tracing::debug;

use super::RunArgs;
use crate::error::Result;
use crate::journal::Journal;
use crate::machine::{CoffeeMachine, text};

pub(crate) fn run(args: &RunArgs, out: &mut impl Write) -> Result<ExitCode> {
    let config = PipelineConfig::from_path(&args.config)?;
    let journal = Arc::new(Journal::new());
    let boundary = if args.transaction {
        TransactionBoundary::with_resource(journal.clone())
    } else {
        TransactionBoundary::none()
    };
    let registry = config.into_registry(boundary);
    let machine = CoffeeMachine::new(Arc::clone(&journal));
    let input = parse_input(args.input.as_deref());

    debug!(pipeline = %args.pipeline, %input, "running pipeline");
    let outcome = registry.call(&args.pipeline, &machine, input)?;
    let succeeded = outcome.is_ok();

    writeln!(out, "{}", render_outcome(outcome))?;
    if let Some(end) = journal.last_end() {
        writeln!(
            out,
            "{} ({} journal entries)",
            end.as_str(),
            journal.entries().len()
        )?;
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn parse_input(raw: Option<&str>) -> Value {
    match raw {
        None => Value::Null,
        Some(raw) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
    }
}

fn render_outcome(outcome: DynOutcome) -> String {
    outcome.fold(
        |value| format!("ok: {}", text(&value)),
        |value| format!("error: {}", text(&value)),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use steprail_core::Outcome;

    use super::*;

    #[test]
    fn input_defaults_to_null() {
        assert_eq!(parse_input(None), Value::Null);
    }

    #[test]
    fn json_input_is_parsed() {
        assert_eq!(parse_input(Some("{\"n\": 2}")), json!({ "n": 2 }));
        assert_eq!(parse_input(Some("\"espresso\"")), json!("espresso"));
    }

    #[test]
    fn non_json_input_is_a_string() {
        assert_eq!(parse_input(Some("espresso")), json!("espresso"));
    }

    #[test]
    fn outcomes_render_with_their_tag() {
        assert_eq!(render_outcome(Outcome::succeed(json!("HELLO"))), "ok: HELLO");
        assert_eq!(render_outcome(Outcome::fail(json!({ "code": 3 }))), "error: {\"code\":3}");
    }
}
