use std::io::Write;

use steprail_pipeline::{Pipeline, PipelineConfig, StepDescriptor};

use super::ListArgs;
use crate::error::Result;
use crate::machine::STEPS;

pub(crate) fn run(args: &ListArgs, out: &mut impl Write) -> Result<()> {
    let config = PipelineConfig::from_path(&args.config)?;
    let pipelines = config.build_pipelines();

    if pipelines.is_empty() {
        writeln!(out, "No pipelines defined.")?;
    }
    for pipeline in &pipelines {
        write_pipeline(out, pipeline)?;
    }
    writeln!(out)?;
    writeln!(out, "Built-in steps: {}", STEPS.join(", "))?;
    Ok(())
}

fn write_pipeline(out: &mut impl Write, pipeline: &Pipeline) -> std::io::Result<()> {
    let mut flags = Vec::new();
    if pipeline.is_transactional() {
        flags.push("transactional");
    }
    if pipeline.is_safe() {
        flags.push("safe");
    }

    if flags.is_empty() {
        writeln!(out, "{}", pipeline.name())?;
    } else {
        writeln!(out, "{} [{}]", pipeline.name(), flags.join(", "))?;
    }
    for step in pipeline.steps() {
        write_step(out, step)?;
    }
    Ok(())
}

fn write_step(out: &mut impl Write, step: &StepDescriptor) -> std::io::Result<()> {
    if step.is_transform_only() {
        writeln!(out, "  - {} (transform)", step.label())
    } else {
        writeln!(out, "  - {}", step.label())
    }
}
