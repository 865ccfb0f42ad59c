//! End-to-end sync pipeline: fetch, join, normalize, write

pub mod assemble;
pub mod columns;
pub mod normalize;
pub mod summary;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::api::auth::resolve_token;
use crate::api::client::HubSpotClient;
use crate::api::constants::{DEALS_OBJECT_TYPE, JOBS_OBJECT_TYPE_ID};
use crate::api::fetch::{fetch_all, fetch_all_filtered, fetch_contacts_by_ids};
use crate::api::pipelines::fetch_pipeline_labels;
use crate::config::SyncConfig;
use crate::sheet::reader::load_workbook;
use crate::sheet::writer::{save_workbook, write_selective};
use crate::sync::assemble::{combine_rows, property_id, Properties};
use crate::sync::columns::{
    CONTACT_ID_PROPERTY, CONTACT_PROPERTIES, DEAL_PROPERTIES, JOB_PROPERTIES,
};

pub struct SyncReport {
    pub rows: usize,
    pub sheet: String,
    pub workbook: PathBuf,
}

/// Run a full sync against the live API using the resolved token.
pub async fn run_sync(config: &SyncConfig) -> Result<SyncReport> {
    let token = resolve_token(config.inline_token.as_deref())?;
    let client = HubSpotClient::new(token)?;
    run_sync_with_client(config, &client).await
}

pub async fn run_sync_with_client(
    config: &SyncConfig,
    client: &HubSpotClient,
) -> Result<SyncReport> {
    let labels = fetch_pipeline_labels(client, JOBS_OBJECT_TYPE_ID).await?;

    let jobs = if config.state_filter {
        fetch_all_filtered(
            client,
            JOBS_OBJECT_TYPE_ID,
            JOB_PROPERTIES,
            &config.state_filter_criteria,
        )
        .await?
    } else {
        fetch_all(client, JOBS_OBJECT_TYPE_ID, JOB_PROPERTIES).await?
    };

    let deals = fetch_all(client, DEALS_OBJECT_TYPE, DEAL_PROPERTIES).await?;

    let contact_ids: Vec<String> = jobs
        .iter()
        .filter_map(|job| property_id(&job.properties, CONTACT_ID_PROPERTY))
        .collect();
    let contacts_by_id = fetch_contacts_by_ids(client, &contact_ids, CONTACT_PROPERTIES).await?;

    let deals_by_id: HashMap<String, Properties> = deals
        .into_iter()
        .map(|deal| (deal.id, deal.properties))
        .collect();

    let rows = combine_rows(config, &jobs, &deals_by_id, &contacts_by_id, &labels);

    let mut workbook = load_workbook(&config.workbook)?;
    let sheet = workbook.sheet_mut_or_insert(&config.sheet);
    write_selective(sheet, &rows, &config.output_columns);
    save_workbook(&workbook, &config.workbook)?;

    info!(
        "Synced {} rows to sheet {} in {}",
        rows.len(),
        config.sheet,
        config.workbook.display()
    );
    Ok(SyncReport {
        rows: rows.len(),
        sheet: config.sheet.clone(),
        workbook: config.workbook.clone(),
    })
}
