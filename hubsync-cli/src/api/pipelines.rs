//! Pipeline and stage label lookup

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::debug;

use super::client::HubSpotClient;
use super::models::PipelinesResponse;

/// Id-to-label maps for an object type's pipelines, flattened across all
/// pipelines so stage ids resolve without knowing their parent.
#[derive(Debug, Default, Clone)]
pub struct PipelineLabels {
    pub pipelines: HashMap<String, String>,
    pub stages: HashMap<String, String>,
}

impl PipelineLabels {
    /// Label for a pipeline id, falling back to the raw id.
    pub fn pipeline_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.pipelines.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Label for a stage id, falling back to the raw id.
    pub fn stage_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.stages.get(id).map(String::as_str).unwrap_or(id)
    }
}

pub async fn fetch_pipeline_labels(
    client: &HubSpotClient,
    object_type: &str,
) -> Result<PipelineLabels> {
    let url = format!("/crm/v3/pipelines/{}", urlencoding::encode(object_type));
    let value = client.get_json(&url).await?;
    let response: PipelinesResponse = serde_json::from_value(value)
        .with_context(|| format!("Failed to decode {} pipelines", object_type))?;

    let mut labels = PipelineLabels::default();
    for pipeline in response.results {
        labels.pipelines.insert(pipeline.id, pipeline.label);
        for stage in pipeline.stages {
            labels.stages.insert(stage.id, stage.label);
        }
    }

    debug!(
        "Loaded {} pipeline and {} stage labels for {}",
        labels.pipelines.len(),
        labels.stages.len(),
        object_type
    );
    Ok(labels)
}
