//! STIX object construction for enriched observables

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

const SOURCE_NAME: &str = "Enrichment Data";

/// External-source citation carrying the lookup URL and payload
#[derive(Debug, Clone, Serialize)]
pub struct ExternalReference {
    pub source_name: String,
    pub url: String,
    pub description: String,
}

/// STIX 2.1 observed-data record
#[derive(Debug, Clone, Serialize)]
pub struct ObservedData {
    #[serde(rename = "type")]
    pub object_type: String,
    pub spec_version: String,
    pub id: String,
    pub created: String,
    pub modified: String,
    pub first_observed: String,
    pub last_observed: String,
    pub number_observed: u32,
    pub object_refs: Vec<String>,
    pub external_references: Vec<ExternalReference>,
}

/// STIX 2.1 bundle
#[derive(Debug, Clone, Serialize)]
pub struct Bundle {
    #[serde(rename = "type")]
    pub object_type: String,
    pub id: String,
    pub objects: Vec<ObservedData>,
}

/// Build the single-record bundle submitted for one enriched observable.
///
/// The bundle references the pre-existing observable id and is never mutated
/// after construction. Runs only after a successful lookup, so the enrichment
/// payload is assumed well-formed.
pub fn create_bundle(observable_id: &str, enrichment: &Value, url: &str) -> Bundle {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let reference = ExternalReference {
        source_name: SOURCE_NAME.to_string(),
        url: url.to_string(),
        description: serde_json::to_string_pretty(enrichment).unwrap_or_default(),
    };

    let observed = ObservedData {
        object_type: "observed-data".to_string(),
        spec_version: "2.1".to_string(),
        id: format!("observed-data--{}", Uuid::new_v4()),
        created: now.clone(),
        modified: now.clone(),
        first_observed: now.clone(),
        last_observed: now,
        number_observed: 1,
        object_refs: vec![observable_id.to_string()],
        external_references: vec![reference],
    };

    Bundle {
        object_type: "bundle".to_string(),
        id: format!("bundle--{}", Uuid::new_v4()),
        objects: vec![observed],
    }
}
