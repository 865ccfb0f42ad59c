//! Stage counts read off the dashboard sheet

use std::collections::HashMap;

use serde::Serialize;

use super::columns::{STAGE_HEADER, STAGE_ORDER, SUMMARY_DATA_START_ROW, SUMMARY_HEADER_ROW};
use crate::sheet::model::Sheet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub rows: Vec<StageCount>,
    pub total: usize,
}

/// Tally stages from the dashboard sheet into the fixed stage order.
/// Sheets that are missing, too short or lack a stage column produce an
/// empty summary rather than an error. Stages outside the known order
/// are ignored, so the total only covers the listed rows.
pub fn stage_summary(sheet: Option<&Sheet>) -> StageSummary {
    let Some(sheet) = sheet else {
        return StageSummary::default();
    };
    if sheet.row_count() < SUMMARY_DATA_START_ROW {
        return StageSummary::default();
    }

    let Some(header) = sheet.row(SUMMARY_HEADER_ROW - 1) else {
        return StageSummary::default();
    };
    let Some(stage_col) = header
        .iter()
        .position(|cell| cell.to_string().trim().to_lowercase() == STAGE_HEADER)
    else {
        return StageSummary::default();
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in &sheet.rows[SUMMARY_DATA_START_ROW - 1..] {
        let stage = row
            .get(stage_col)
            .map(|cell| cell.to_string())
            .unwrap_or_default();
        let key = stage.trim();
        if key.is_empty() {
            continue;
        }
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }

    let rows: Vec<StageCount> = STAGE_ORDER
        .iter()
        .map(|&stage| StageCount {
            stage: stage.to_string(),
            count: counts.get(stage).copied().unwrap_or(0),
        })
        .collect();
    let total = rows.iter().map(|row| row.count).sum();

    StageSummary { rows, total }
}
