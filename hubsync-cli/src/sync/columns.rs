//! Property lists, column ordering and sheet layout constants

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::api::models::FilterCriterion;

pub const DATA_SHEET: &str = "data";
pub const SUMMARY_SHEET: &str = "Active Projects";

/// 1-based rows of the dashboard sheet layout.
pub const SUMMARY_HEADER_ROW: usize = 11;
pub const SUMMARY_DATA_START_ROW: usize = 12;
pub const STAGE_HEADER: &str = "stage";

/// Agreement dates render as dates, never locale-guessed text.
pub const DATE_COLUMN_FORMAT: &str = "yyyy-mm-dd;@";

pub const CONTACT_ID_PROPERTY: &str = "associated_contact_record_id";
pub const DEAL_ID_PROPERTY: &str = "associated_deal_record_id";

/// Columns that get post-processing on the way into the sheet.
pub mod special {
    pub const FIRST_NAME: &str = "firstname";
    pub const LAST_NAME: &str = "lastname";
    pub const FULL_NAME: &str = "full_name";
    pub const PHONE: &str = "phone";
    pub const STATE: &str = "state";
    pub const AGREEMENT_DATE: &str = "job_agreement_date_1";
    pub const UPDATE_DATE: &str = "update_date";
    pub const STANDBY_DATE: &str = "date_entered__stand_by__stage";
    pub const PIPELINE: &str = "hs_pipeline";
    pub const PIPELINE_STAGE: &str = "hs_pipeline_stage";
}

/// Properties requested for each job record.
pub const JOB_PROPERTIES: &[&str] = &[
    "associated_contact_record_id",
    "associated_deal_record_id",
    "hs_object_id",
    "job_name",
    "job_agreement_date_1",
    "system__size__watts_",
    "street_address",
    "city",
    "state",
    "zip_code",
    "service_area",
    "partner",
    "amount",
    "cashback",
    "payment_method1",
    "installation_status",
    "utility_status",
    "battery_services_cost",
    "dealerfee",
    "adder_amount",
    "fulfillment_partnerfee",
    "additional_services_price",
    "collection_base_amount",
    "override",
    "cp_status_start__submitted__date",
    "volt",
    "lightreach_tesla_adder",
    "materials_request",
    "domestic_content",
    "permit_fees__adder",
    "hs_pipeline_stage",
    "hs_pipeline",
    "hvac_price",
    "roof_price",
    "water_filter_price",
    "estimated_installation_costs",
    "additional_services_amount",
    "is_test",
    "solar_roof_s__size__watts_",
    "system_size__ton_",
    "hvac_quantity",
    "hvac_contract_value__view_only_",
    "actual_stage",
    "project_update",
    "update_date",
    "date_entered__stand_by__stage",
    "sales_team_take",
    "panel___brand__only_view_",
    "panel___model__only_view_",
    "panel_quantity__only_view_",
    "inverter___model__only_view_",
    "inverter___brand__only_view_",
    "inverter_quantity__only_view_",
    "battery___brand__only_view_",
    "battery_quantity__only_view_",
    "battery___model__only_view_",
    "m1_amount___paid",
    "m1_amount",
    "m2_amount",
    "m2_amount___paid",
    "clawbacks___applied",
];

/// Properties requested for each associated contact.
pub const CONTACT_PROPERTIES: &[&str] = &[
    "firstname",
    "lastname",
    "full_name",
    "email",
    "phone",
    "language_preference",
];

/// Properties requested for each deal.
pub const DEAL_PROPERTIES: &[&str] = &[
    "dealname",
    "existing_roof_type",
    "existing_secondary_roof_type",
    "panel_panel_watts",
    "utility_company",
    "roof_size__sq_",
];

/// Output columns sourced from the associated deal (the rest of the
/// non-contact columns come from the job itself).
const DEAL_COLUMNS: &[&str] = &[
    "utility_company",
    "existing_roof_type",
    "existing_secondary_roof_type",
    "roof_size__sq_",
    "panel_panel_watts",
];

/// Sheet column order, left to right, after the leading id column.
const FINAL_ORDER: &[&str] = &[
    "firstname",
    "lastname",
    "full_name",
    "email",
    "phone",
    "language_preference",
    "hs_object_id",
    "job_name",
    "job_agreement_date_1",
    "system__size__watts_",
    "street_address",
    "city",
    "state",
    "zip_code",
    "service_area",
    "partner",
    "amount",
    "payment_method1",
    "cashback",
    "installation_status",
    "utility_status",
    "panel___brand__only_view_",
    "inverter___brand__only_view_",
    "battery___brand__only_view_",
    "panel_quantity__only_view_",
    "inverter_quantity__only_view_",
    "battery_quantity__only_view_",
    "panel___model__only_view_",
    "inverter___model__only_view_",
    "battery___model__only_view_",
    "panel_panel_watts",
    "battery_services_cost",
    "utility_company",
    "dealerfee",
    "adder_amount",
    "fulfillment_partnerfee",
    "additional_services_price",
    "collection_base_amount",
    "override",
    "cp_status_start__submitted__date",
    "volt",
    "lightreach_tesla_adder",
    "materials_request",
    "existing_roof_type",
    "domestic_content",
    "existing_secondary_roof_type",
    "permit_fees__adder",
    "associated_deal_record_id",
    "hs_pipeline_stage",
    "hs_pipeline",
    "hvac_price",
    "roof_price",
    "water_filter_price",
    "estimated_installation_costs",
    "additional_services_amount",
    "is_test",
    "roof_size__sq_",
    "solar_roof_s__size__watts_",
    "system_size__ton_",
    "hvac_quantity",
    "hvac_contract_value__view_only_",
    "actual_stage",
    "project_update",
    "update_date",
    "date_entered__stand_by__stage",
    "sales_team_take",
    "m1_amount___paid",
    "m1_amount",
    "m2_amount",
    "m2_amount___paid",
    "clawbacks___applied",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    Job,
    Deal,
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputColumn {
    pub name: &'static str,
    pub source: ColumnSource,
}

/// The full output column layout in sheet order.
pub fn output_columns() -> Vec<OutputColumn> {
    FINAL_ORDER
        .iter()
        .map(|&name| OutputColumn {
            name,
            source: source_of(name),
        })
        .collect()
}

fn source_of(name: &str) -> ColumnSource {
    if CONTACT_PROPERTIES.contains(&name) {
        ColumnSource::Contact
    } else if DEAL_COLUMNS.contains(&name) {
        ColumnSource::Deal
    } else {
        ColumnSource::Job
    }
}

/// Server-side job filter: CRM data carries both spellings of the state.
pub fn state_filter_criteria() -> Vec<FilterCriterion> {
    vec![
        FilterCriterion::equals("state", "CA"),
        FilterCriterion::equals("state", "California"),
    ]
}

/// Full state names (uppercased) to USPS codes, DC included.
pub static STATE_ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ALABAMA", "AL"),
        ("ALASKA", "AK"),
        ("ARIZONA", "AZ"),
        ("ARKANSAS", "AR"),
        ("CALIFORNIA", "CA"),
        ("COLORADO", "CO"),
        ("CONNECTICUT", "CT"),
        ("DELAWARE", "DE"),
        ("FLORIDA", "FL"),
        ("GEORGIA", "GA"),
        ("HAWAII", "HI"),
        ("IDAHO", "ID"),
        ("ILLINOIS", "IL"),
        ("INDIANA", "IN"),
        ("IOWA", "IA"),
        ("KANSAS", "KS"),
        ("KENTUCKY", "KY"),
        ("LOUISIANA", "LA"),
        ("MAINE", "ME"),
        ("MARYLAND", "MD"),
        ("MASSACHUSETTS", "MA"),
        ("MICHIGAN", "MI"),
        ("MINNESOTA", "MN"),
        ("MISSISSIPPI", "MS"),
        ("MISSOURI", "MO"),
        ("MONTANA", "MT"),
        ("NEBRASKA", "NE"),
        ("NEVADA", "NV"),
        ("NEW HAMPSHIRE", "NH"),
        ("NEW JERSEY", "NJ"),
        ("NEW MEXICO", "NM"),
        ("NEW YORK", "NY"),
        ("NORTH CAROLINA", "NC"),
        ("NORTH DAKOTA", "ND"),
        ("OHIO", "OH"),
        ("OKLAHOMA", "OK"),
        ("OREGON", "OR"),
        ("PENNSYLVANIA", "PA"),
        ("RHODE ISLAND", "RI"),
        ("SOUTH CAROLINA", "SC"),
        ("SOUTH DAKOTA", "SD"),
        ("TENNESSEE", "TN"),
        ("TEXAS", "TX"),
        ("UTAH", "UT"),
        ("VERMONT", "VT"),
        ("VIRGINIA", "VA"),
        ("WASHINGTON", "WA"),
        ("WEST VIRGINIA", "WV"),
        ("WISCONSIN", "WI"),
        ("WYOMING", "WY"),
        ("DISTRICT OF COLUMBIA", "DC"),
    ])
});

/// Dashboard stage order, top to bottom.
pub const STAGE_ORDER: &[&str] = &[
    "Stand by",
    "New Job",
    "Pending Documents",
    "Site Survey",
    "Pending NTP",
    "Engineering",
    "Permitting",
    "Pre-Install Actions Pending",
    "Scheduling",
    "Installation",
    "Issues",
    "Final Inspection Pending",
    "Utility",
];
