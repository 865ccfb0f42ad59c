//! Paged record fetching from the CRM v3 object APIs

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;

use super::client::HubSpotClient;
use super::constants::{BATCH_SIZE, PAGE_SIZE};
use super::models::{
    BatchInput, BatchReadRequest, BatchReadResponse, FilterCriterion, FilterGroup, ListResponse,
    Record, SearchRequest,
};

/// List every record of an object type, following `paging.next.after`
/// until the API stops returning a cursor.
pub async fn fetch_all(
    client: &HubSpotClient,
    object_type: &str,
    properties: &[&str],
) -> Result<Vec<Record>> {
    let encoded_type = urlencoding::encode(object_type);
    let encoded_properties = urlencoding::encode(&properties.join(",")).into_owned();

    let mut records = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let mut url = format!(
            "/crm/v3/objects/{}?properties={}&limit={}",
            encoded_type, encoded_properties, PAGE_SIZE
        );
        if let Some(cursor) = &after {
            url.push_str(&format!("&after={}", urlencoding::encode(cursor)));
        }
        url.push_str("&archived=false");

        let value = client.get_json(&url).await?;
        let page: ListResponse = serde_json::from_value(value)
            .with_context(|| format!("Failed to decode {} list page", object_type))?;

        debug!("Fetched {} {} records", page.results.len(), object_type);
        records.extend(page.results);

        after = page.paging.and_then(|p| p.next).map(|n| n.after);
        if after.is_none() {
            break;
        }
    }

    info!("Fetched {} {} records", records.len(), object_type);
    Ok(records)
}

/// Search an object type, OR-ing the criteria (each one becomes its own
/// filter group). Paged the same way as [`fetch_all`].
pub async fn fetch_all_filtered(
    client: &HubSpotClient,
    object_type: &str,
    properties: &[&str],
    criteria: &[FilterCriterion],
) -> Result<Vec<Record>> {
    let url = format!(
        "/crm/v3/objects/{}/search",
        urlencoding::encode(object_type)
    );
    let filter_groups: Vec<FilterGroup> = criteria
        .iter()
        .map(|criterion| FilterGroup {
            filters: vec![criterion.clone()],
        })
        .collect();

    let mut records = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let request = SearchRequest {
            properties: properties.iter().map(|p| p.to_string()).collect(),
            limit: PAGE_SIZE,
            after: after.clone(),
            filter_groups: filter_groups.clone(),
        };

        let value = client.post_json(&url, &request).await?;
        let page: ListResponse = serde_json::from_value(value)
            .with_context(|| format!("Failed to decode {} search page", object_type))?;

        debug!("Searched {} {} records", page.results.len(), object_type);
        records.extend(page.results);

        after = page.paging.and_then(|p| p.next).map(|n| n.after);
        if after.is_none() {
            break;
        }
    }

    info!("Fetched {} filtered {} records", records.len(), object_type);
    Ok(records)
}

/// Batch-read contacts by id, keyed by record id on return. Ids are
/// deduplicated up front and requested in chunks of [`BATCH_SIZE`].
pub async fn fetch_contacts_by_ids(
    client: &HubSpotClient,
    ids: &[String],
    properties: &[&str],
) -> Result<HashMap<String, HashMap<String, Value>>> {
    let mut contacts = HashMap::new();
    let distinct = dedupe_preserving_order(ids);
    if distinct.is_empty() {
        return Ok(contacts);
    }

    for chunk in distinct.chunks(BATCH_SIZE) {
        let request = BatchReadRequest {
            inputs: chunk
                .iter()
                .map(|id| BatchInput { id: id.clone() })
                .collect(),
            properties: properties.iter().map(|p| p.to_string()).collect(),
        };

        let value = client
            .post_json("/crm/v3/objects/contacts/batch/read", &request)
            .await?;
        let batch: BatchReadResponse =
            serde_json::from_value(value).context("Failed to decode contact batch response")?;

        for record in batch.results {
            contacts.insert(record.id, record.properties);
        }
    }

    info!("Fetched {} contacts", contacts.len());
    Ok(contacts)
}

fn dedupe_preserving_order(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
