//! Validated, ordered pipeline descriptions.

use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::stage::Stage;

/// An ordered sequence of stages, immutable once built.
///
/// Construction enforces the chain invariants: tags are unique and every
/// `inputs` reference names a strictly earlier stage, so the stages always
/// form a DAG (a simple chain in the fetch pipeline).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineDescription {
    pipeline: Vec<Stage>,
}

impl PipelineDescription {
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        validate(&stages)?;
        Ok(Self { pipeline: stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.pipeline
    }

    pub fn stage(&self, tag: &str) -> Option<&Stage> {
        self.pipeline.iter().find(|s| s.tag() == tag)
    }

    pub fn len(&self) -> usize {
        self.pipeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipeline.is_empty()
    }

    /// The executor's wire form: `{"pipeline": [...]}`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn validate(stages: &[Stage]) -> Result<()> {
    if stages.is_empty() {
        return Err(PipelineError::template("pipeline has no stages"));
    }

    let mut seen: Vec<&str> = Vec::with_capacity(stages.len());
    for stage in stages {
        let tag = stage.tag();
        if tag.is_empty() {
            return Err(PipelineError::template(format!(
                "{} stage has an empty tag",
                stage.type_name()
            )));
        }
        if seen.contains(&tag) {
            return Err(PipelineError::template(format!("duplicate stage tag '{tag}'")));
        }
        for input in stage.inputs() {
            if !seen.contains(&input.as_str()) {
                return Err(PipelineError::template(format!(
                    "stage '{tag}' references '{input}', which is not an earlier stage"
                )));
            }
        }
        seen.push(tag);
    }

    Ok(())
}
