//! Static patient journey fixture and JSON loaders for `InMemoryRepository`.

use journey_core::{DashboardError, InMemoryRepository, Patient, StepStatus};
use serde_json::Value;

/// Bundled demo data set: five patients, ten journeys.
pub const FIXTURE_JSON: &str = include_str!("../data/patients.json");

/// Build a repository from the bundled fixture.
pub fn load_fixture_repository() -> Result<InMemoryRepository, DashboardError> {
    load_repository_str(FIXTURE_JSON)
}

/// Build a repository from a JSON string.
pub fn load_repository_str(json: &str) -> Result<InMemoryRepository, DashboardError> {
    let patients = parse_patients_str(json)?;
    into_repository(patients)
}

/// Build a repository from a `serde_json::Value`.
pub fn load_repository_value(document: &Value) -> Result<InMemoryRepository, DashboardError> {
    let patients = parse_patients_value(document)?;
    into_repository(patients)
}

/// Parse patients from a JSON string.
pub fn parse_patients_str(json: &str) -> Result<Vec<Patient>, DashboardError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| DashboardError::Parse(err.to_string()))?;
    parse_patients_value(&value)
}

/// Parse patients from either a bare array or an object with a `patients` array.
pub fn parse_patients_value(document: &Value) -> Result<Vec<Patient>, DashboardError> {
    let entries = match document {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("patients")
            .and_then(Value::as_array)
            .ok_or(DashboardError::MissingData)?,
        other => {
            return Err(DashboardError::Parse(format!(
                "Expected an array or an object with `patients`, received {}",
                value_kind(other)
            )))
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Patient>(entry.clone()).map_err(|err| {
                let id = entry.get("id").and_then(Value::as_str).unwrap_or("?");
                DashboardError::Parse(format!("patient #{index} ({id}): {err}"))
            })
        })
        .collect()
}

fn into_repository(patients: Vec<Patient>) -> Result<InMemoryRepository, DashboardError> {
    warn_on_multiple_active_steps(&patients);

    let repository = InMemoryRepository::new(patients)?;
    tracing::info!(patients = repository.len(), "patient fixture loaded");
    Ok(repository)
}

// At most one active step per journey is expected but not enforced.
fn warn_on_multiple_active_steps(patients: &[Patient]) {
    for patient in patients {
        for journey in &patient.journeys {
            let active = journey
                .steps
                .iter()
                .filter(|step| step.status == StepStatus::Active)
                .count();
            if active > 1 {
                tracing::warn!(
                    patient = %patient.id,
                    journey = %journey.id,
                    active,
                    "journey has more than one active step"
                );
            }
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
