//! Joining jobs, deals and contacts into denormalized sheet rows

use std::collections::HashMap;

use log::debug;
use serde_json::Value;

use super::columns::{special, ColumnSource, CONTACT_ID_PROPERTY, DEAL_ID_PROPERTY};
use super::normalize::{build_full_name, normalize_phone, normalize_state, parse_any_date};
use crate::api::models::Record;
use crate::api::pipelines::PipelineLabels;
use crate::config::SyncConfig;
use crate::sheet::model::CellValue;

pub type Properties = HashMap<String, Value>;

/// One output row: the job id plus cells parallel to the configured
/// output columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub id: String,
    pub values: Vec<CellValue>,
}

/// Association id from a property, if set. Blank strings and zero do
/// not count as set.
pub fn property_id(properties: &Properties, key: &str) -> Option<String> {
    match properties.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn cell_from_property(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Empty,
        Some(Value::String(s)) => CellValue::from_text(s.clone()),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty),
        Some(Value::Bool(b)) => CellValue::Bool(*b),
        Some(other) => CellValue::Text(other.to_string()),
    }
}

/// Build one combined row per job, resolving each output column from
/// its source record and applying the per-column normalizers. Jobs
/// whose pipeline label does not match the configured filter (when one
/// is set) are dropped.
pub fn combine_rows(
    config: &SyncConfig,
    jobs: &[Record],
    deals_by_id: &HashMap<String, Properties>,
    contacts_by_id: &HashMap<String, Properties>,
    labels: &PipelineLabels,
) -> Vec<CombinedRow> {
    let mut rows = Vec::with_capacity(jobs.len());

    for job in jobs {
        if !config.filter_pipeline_label.is_empty() {
            let raw = cell_from_property(job.properties.get(special::PIPELINE)).to_string();
            if labels.pipeline_label(&raw) != config.filter_pipeline_label {
                continue;
            }
        }

        let contact_props = property_id(&job.properties, CONTACT_ID_PROPERTY)
            .and_then(|id| contacts_by_id.get(&id));
        let deal_props =
            property_id(&job.properties, DEAL_ID_PROPERTY).and_then(|id| deals_by_id.get(&id));

        let values = config
            .output_columns
            .iter()
            .map(|column| {
                let source_props = match column.source {
                    ColumnSource::Contact => contact_props,
                    ColumnSource::Deal => deal_props,
                    ColumnSource::Job => Some(&job.properties),
                };
                let value = cell_from_property(source_props.and_then(|p| p.get(column.name)));
                post_process(column.name, value, contact_props, labels)
            })
            .collect();

        rows.push(CombinedRow {
            id: job.id.clone(),
            values,
        });
    }

    debug!("Combined {} rows from {} jobs", rows.len(), jobs.len());
    rows
}

fn post_process(
    name: &str,
    value: CellValue,
    contact_props: Option<&Properties>,
    labels: &PipelineLabels,
) -> CellValue {
    match name {
        special::FULL_NAME if value.is_empty() => {
            let first = cell_from_property(contact_props.and_then(|p| p.get(special::FIRST_NAME)));
            let last = cell_from_property(contact_props.and_then(|p| p.get(special::LAST_NAME)));
            CellValue::from_text(build_full_name(&first.to_string(), &last.to_string()))
        }
        special::PHONE if !value.is_empty() => {
            CellValue::from_text(normalize_phone(&value.to_string()))
        }
        special::STATE if !value.is_empty() => {
            CellValue::from_text(normalize_state(&value.to_string()))
        }
        special::AGREEMENT_DATE | special::UPDATE_DATE | special::STANDBY_DATE
            if !value.is_empty() =>
        {
            parse_any_date(&value.to_string())
        }
        special::PIPELINE if !value.is_empty() => {
            let raw = value.to_string();
            CellValue::from_text(labels.pipeline_label(&raw).to_string())
        }
        special::PIPELINE_STAGE if !value.is_empty() => {
            let raw = value.to_string();
            CellValue::from_text(labels.stage_label(&raw).to_string())
        }
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileConfig, SyncConfig};
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn record(id: &str, properties: serde_json::Value) -> Record {
        serde_json::from_value(json!({"id": id, "properties": properties})).unwrap()
    }

    fn props(value: serde_json::Value) -> Properties {
        serde_json::from_value(value).unwrap()
    }

    fn labels() -> PipelineLabels {
        let mut labels = PipelineLabels::default();
        labels.pipelines.insert("p1".into(), "Residential".into());
        labels.stages.insert("s1".into(), "Permitting".into());
        labels
    }

    fn config() -> SyncConfig {
        SyncConfig::resolve(FileConfig::default(), None)
    }

    fn col(config: &SyncConfig, name: &str) -> usize {
        config
            .output_columns
            .iter()
            .position(|c| c.name == name)
            .unwrap()
    }

    #[test]
    fn joins_contact_and_deal_columns() {
        let config = config();
        let jobs = vec![record(
            "j1",
            json!({
                "associated_contact_record_id": "c1",
                "associated_deal_record_id": "d1",
                "city": "Fresno"
            }),
        )];
        let deals = HashMap::from([(
            "d1".to_string(),
            props(json!({"utility_company": "PG&E"})),
        )]);
        let contacts = HashMap::from([(
            "c1".to_string(),
            props(json!({"firstname": "Ana", "email": "ana@example.com"})),
        )]);

        let rows = combine_rows(&config, &jobs, &deals, &contacts, &labels());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "j1");
        assert_eq!(
            rows[0].values[col(&config, "email")],
            CellValue::Text("ana@example.com".into())
        );
        assert_eq!(
            rows[0].values[col(&config, "utility_company")],
            CellValue::Text("PG&E".into())
        );
        assert_eq!(
            rows[0].values[col(&config, "city")],
            CellValue::Text("Fresno".into())
        );
    }

    #[test]
    fn missing_associations_leave_source_columns_blank() {
        let config = config();
        let jobs = vec![record("j2", json!({"city": "Merced"}))];

        let rows = combine_rows(&config, &jobs, &HashMap::new(), &HashMap::new(), &labels());

        assert_eq!(rows[0].values[col(&config, "email")], CellValue::Empty);
        assert_eq!(
            rows[0].values[col(&config, "utility_company")],
            CellValue::Empty
        );
        assert_eq!(
            rows[0].values[col(&config, "city")],
            CellValue::Text("Merced".into())
        );
    }

    #[test]
    fn synthesizes_full_name_only_when_blank() {
        let config = config();
        let jobs = vec![
            record("j1", json!({"associated_contact_record_id": "c1"})),
            record("j2", json!({"associated_contact_record_id": "c2"})),
        ];
        let contacts = HashMap::from([
            (
                "c1".to_string(),
                props(json!({"firstname": "Ana", "lastname": "Alvarez", "full_name": ""})),
            ),
            (
                "c2".to_string(),
                props(json!({"firstname": "Bo", "lastname": "Lee", "full_name": "Custom Name"})),
            ),
        ]);

        let rows = combine_rows(&config, &jobs, &HashMap::new(), &contacts, &labels());

        let full_name = col(&config, "full_name");
        assert_eq!(
            rows[0].values[full_name],
            CellValue::Text("Ana Alvarez".into())
        );
        assert_eq!(
            rows[1].values[full_name],
            CellValue::Text("Custom Name".into())
        );
    }

    #[test]
    fn normalizes_phone_state_and_dates() {
        let config = config();
        let jobs = vec![record(
            "j1",
            json!({
                "associated_contact_record_id": "c1",
                "state": "california",
                "job_agreement_date_1": "1700000000",
                "update_date": "2024-01-15"
            }),
        )];
        let contacts = HashMap::from([(
            "c1".to_string(),
            props(json!({"phone": "415.555.1234"})),
        )]);

        let rows = combine_rows(&config, &jobs, &HashMap::new(), &contacts, &labels());

        assert_eq!(
            rows[0].values[col(&config, "phone")],
            CellValue::Text("(415) 555-1234".into())
        );
        assert_eq!(
            rows[0].values[col(&config, "state")],
            CellValue::Text("CA".into())
        );
        assert_eq!(
            rows[0].values[col(&config, "job_agreement_date_1")],
            CellValue::DateTime(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
        );
        assert_eq!(
            rows[0].values[col(&config, "update_date")],
            CellValue::DateTime(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn translates_pipeline_ids_with_raw_fallback() {
        let config = config();
        let jobs = vec![
            record(
                "j1",
                json!({"hs_pipeline": "p1", "hs_pipeline_stage": "s1"}),
            ),
            record(
                "j2",
                json!({"hs_pipeline": "p9", "hs_pipeline_stage": "s9"}),
            ),
        ];

        let rows = combine_rows(&config, &jobs, &HashMap::new(), &HashMap::new(), &labels());

        let pipeline = col(&config, "hs_pipeline");
        let stage = col(&config, "hs_pipeline_stage");
        assert_eq!(rows[0].values[pipeline], CellValue::Text("Residential".into()));
        assert_eq!(rows[0].values[stage], CellValue::Text("Permitting".into()));
        assert_eq!(rows[1].values[pipeline], CellValue::Text("p9".into()));
        assert_eq!(rows[1].values[stage], CellValue::Text("s9".into()));
    }

    #[test]
    fn pipeline_filter_keeps_matching_label_only() {
        let mut config = config();
        config.filter_pipeline_label = "Residential".to_string();

        let jobs = vec![
            record("keep", json!({"hs_pipeline": "p1"})),
            record("other", json!({"hs_pipeline": "p2"})),
            record("unset", json!({})),
        ];

        let rows = combine_rows(&config, &jobs, &HashMap::new(), &HashMap::new(), &labels());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "keep");
    }

    #[test]
    fn property_ids_require_a_usable_value() {
        let properties = props(json!({
            "text": "123",
            "numeric": 456,
            "blank": "",
            "zero": 0,
            "null": null
        }));

        assert_eq!(property_id(&properties, "text"), Some("123".to_string()));
        assert_eq!(property_id(&properties, "numeric"), Some("456".to_string()));
        assert_eq!(property_id(&properties, "blank"), None);
        assert_eq!(property_id(&properties, "zero"), None);
        assert_eq!(property_id(&properties, "null"), None);
        assert_eq!(property_id(&properties, "missing"), None);
    }
}
