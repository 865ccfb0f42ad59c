//! Request and response shapes for the CRM v3 endpoints

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A CRM record: id plus the requested property values. Properties the
/// portal has no value for arrive as null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub results: Vec<Record>,
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    pub next: Option<PagingNext>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagingNext {
    pub after: String,
}

/// Search body. Groups OR together, filters within a group AND; the sync
/// only ever sends single-filter groups.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub properties: Vec<String>,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(rename = "filterGroups")]
    pub filter_groups: Vec<FilterGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterGroup {
    pub filters: Vec<FilterCriterion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    pub property_name: String,
    pub operator: String,
    pub value: String,
}

impl FilterCriterion {
    pub fn equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property_name: property.into(),
            operator: "EQ".to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReadRequest {
    pub inputs: Vec<BatchInput>,
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchInput {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchReadResponse {
    #[serde(default)]
    pub results: Vec<Record>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelinesResponse {
    #[serde(default)]
    pub results: Vec<Pipeline>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub stages: Vec<PipelineStage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineStage {
    pub id: String,
    pub label: String,
}
