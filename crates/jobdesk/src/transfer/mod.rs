//! Portable JSON export and validated import.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransferError;
use crate::model::{Customer, Engineer, Job, StoredDate};
use crate::persistence::DATA_VERSION;

const EXPORT_SCHEMA: &str = include_str!("../../../../schema/export-v1.json");

#[derive(Serialize)]
struct ExportDocument<'a> {
    version: &'a str,
    timestamp: StoredDate,
    jobs: &'a [Job],
    customers: &'a [Customer],
    engineers: &'a [Engineer],
}

/// Serializes the collections as a pretty-printed export document.
pub fn export_document(
    jobs: &[Job],
    customers: &[Customer],
    engineers: &[Engineer],
) -> Result<String, TransferError> {
    let document = ExportDocument {
        version: DATA_VERSION,
        timestamp: StoredDate::now(),
        jobs,
        customers,
        engineers,
    };
    serde_json::to_string_pretty(&document).map_err(TransferError::Serialize)
}

/// Collections decoded from an import document. Absent lists stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportData {
    pub jobs: Option<Vec<Job>>,
    pub customers: Option<Vec<Customer>>,
    pub engineers: Option<Vec<Engineer>>,
}

impl ImportData {
    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            jobs: self.jobs.as_ref().map(Vec::len),
            customers: self.customers.as_ref().map(Vec::len),
            engineers: self.engineers.as_ref().map(Vec::len),
        }
    }
}

/// Number of records replaced per collection; `None` for collections left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub jobs: Option<usize>,
    pub customers: Option<usize>,
    pub engineers: Option<usize>,
}

/// Parses and validates an export document without touching any state.
pub fn parse_import(text: &str) -> Result<ImportData, TransferError> {
    let value: Value = serde_json::from_str(text).map_err(TransferError::Parse)?;

    validate_schema(&value)?;

    let data = ImportData {
        jobs: decode(&value, "jobs")?,
        customers: decode(&value, "customers")?,
        engineers: decode(&value, "engineers")?,
    };

    validate_identities(&data)?;

    Ok(data)
}

fn validate_schema(value: &Value) -> Result<(), TransferError> {
    let schema: Value =
        serde_json::from_str(EXPORT_SCHEMA).map_err(|e| TransferError::Validation {
            message: format!("Invalid embedded export schema: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| TransferError::Validation {
        message: format!("Failed to compile export schema: {}", e),
    })?;

    let errors: Vec<String> = validator.iter_errors(value).map(|e| e.to_string()).collect();
    if !errors.is_empty() {
        return Err(TransferError::Schema {
            errors: errors.join("; "),
        });
    }
    Ok(())
}

fn decode<T>(value: &Value, collection: &'static str) -> Result<Option<Vec<T>>, TransferError>
where
    T: for<'de> Deserialize<'de>,
{
    match value.get(collection) {
        None => Ok(None),
        Some(items) => Vec::<T>::deserialize(items)
            .map(Some)
            .map_err(|source| TransferError::Collection { collection, source }),
    }
}

fn validate_identities(data: &ImportData) -> Result<(), TransferError> {
    if let Some(jobs) = &data.jobs {
        ensure_unique("job id", jobs.iter().map(|j| j.id.as_str()))?;
    }
    if let Some(customers) = &data.customers {
        ensure_unique("customer id", customers.iter().map(|c| c.id.as_str()))?;
    }
    if let Some(engineers) = &data.engineers {
        ensure_unique("engineer name", engineers.iter().map(|e| e.name.as_str()))?;
    }
    Ok(())
}

fn ensure_unique<'a>(what: &str, keys: impl Iterator<Item = &'a str>) -> Result<(), TransferError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(TransferError::Validation {
                message: format!("duplicate {} '{}'", what, key),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::{seed_customers, seed_engineers, seed_jobs};

    #[test]
    fn test_export_document_shape() {
        let text = export_document(&seed_jobs(), &seed_customers(), &seed_engineers()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], "1.0.0");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["jobs"].as_array().unwrap().len(), 6);
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_exported_document_imports_cleanly() {
        let jobs = seed_jobs();
        let text = export_document(&jobs, &seed_customers(), &seed_engineers()).unwrap();
        let data = parse_import(&text).unwrap();
        assert_eq!(data.jobs.as_deref(), Some(jobs.as_slice()));
        assert_eq!(
            data.summary(),
            ImportSummary {
                jobs: Some(6),
                customers: Some(5),
                engineers: Some(5),
            }
        );
    }

    #[test]
    fn test_partial_document_leaves_other_collections() {
        let data = parse_import(r#"{"customers": []}"#).unwrap();
        assert!(data.jobs.is_none());
        assert_eq!(data.customers, Some(vec![]));
        assert!(data.engineers.is_none());
    }

    #[test]
    fn test_rejects_malformed_input() {
        let cases = [
            ("not json", "not valid JSON"),
            ("[1, 2, 3]", "does not look like"),
            (r#"{"version": "1.0.0"}"#, "does not look like"),
            (r#"{"jobs": "nope"}"#, "does not look like"),
            (r#"{"jobs": [{"id": "1", "status": "purple"}]}"#, "does not look like"),
        ];
        for (input, expected) in cases {
            let err = parse_import(input).unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "input {:?} gave {}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut jobs = seed_jobs();
        jobs[1].id = jobs[0].id.clone();
        let text = export_document(&jobs, &[], &[]).unwrap();
        let err = parse_import(&text).unwrap_err();
        assert!(matches!(err, TransferError::Validation { .. }));
    }
}
