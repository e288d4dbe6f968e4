//! Bridge WASM <-> JavaScript trung lập framework cho dữ liệu hành trình bệnh nhân.

use std::sync::OnceLock;

use chrono::{NaiveDateTime, Utc};
use journey_core::{
    DashboardError, InMemoryRepository, JourneyStats, PatientFilter, PatientRepository,
};
use journey_fixtures::load_fixture_repository;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

/// Tiêu chí lọc từ phía JS; trường thiếu giữ giá trị mặc định.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct JsFilterCriteria {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    context_id: Option<String>,
    #[serde(default)]
    campaign: Option<String>,
    #[serde(default)]
    date_range: Option<String>,
    /// Mốc tham chiếu cho `dateRange`, dạng `YYYY-MM-DDTHH:MM:SS`; mặc định là hiện tại.
    #[serde(default)]
    now: Option<NaiveDateTime>,
}

impl TryFrom<JsFilterCriteria> for PatientFilter {
    type Error = DashboardError;

    fn try_from(criteria: JsFilterCriteria) -> Result<Self, Self::Error> {
        let mut filter = PatientFilter::default();
        if let Some(query) = criteria.query {
            filter.query = query;
        }
        if let Some(context_id) = criteria.context_id {
            filter.context_id = context_id;
        }
        if let Some(campaign) = criteria.campaign {
            filter.campaign = campaign.parse()?;
        }
        if let Some(range) = criteria.date_range {
            filter.date_range = range.parse()?;
        }
        Ok(filter)
    }
}

/// Danh sách bệnh nhân khớp tiêu chí, giữ nguyên thứ tự.
#[wasm_bindgen]
pub fn list_patients(criteria: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (filter, now) = read_filter(criteria)?;
    let repo = repository()?;
    to_js(&filter.apply(repo.patients(), now))
}

/// Số liệu tổng hợp trên tập đã lọc.
#[wasm_bindgen]
pub fn journey_stats(criteria: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let (filter, now) = read_filter(criteria)?;
    let repo = repository()?;
    to_js(&JourneyStats::compute(filter.apply(repo.patients(), now)))
}

/// Bệnh nhân theo mã, hoặc `null` khi không tìm thấy.
#[wasm_bindgen]
pub fn get_patient(id: &str) -> Result<JsValue, JsValue> {
    let repo = repository()?;
    match repo.find_by_id(id) {
        Some(patient) => to_js(patient),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen]
pub fn patients_by_context(context_id: &str) -> Result<JsValue, JsValue> {
    let repo = repository()?;
    to_js(&repo.find_by_context(context_id))
}

fn read_filter(criteria: Option<JsValue>) -> Result<(PatientFilter, NaiveDateTime), JsValue> {
    let criteria = match criteria {
        Some(value) if !value.is_undefined() && !value.is_null() => from_value(value)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được tiêu chí lọc: {err}")))?,
        _ => JsFilterCriteria::default(),
    };
    resolve_criteria(criteria).map_err(|err| JsValue::from_str(&format_dashboard_error(err)))
}

fn resolve_criteria(
    criteria: JsFilterCriteria,
) -> Result<(PatientFilter, NaiveDateTime), DashboardError> {
    let now = criteria.now.unwrap_or_else(wall_clock);
    Ok((PatientFilter::try_from(criteria)?, now))
}

fn repository() -> Result<&'static InMemoryRepository, JsValue> {
    static REPOSITORY: OnceLock<Result<InMemoryRepository, String>> = OnceLock::new();
    REPOSITORY
        .get_or_init(|| load_fixture_repository().map_err(format_dashboard_error))
        .as_ref()
        .map_err(|err| JsValue::from_str(err))
}

fn wall_clock() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

fn format_dashboard_error(err: DashboardError) -> String {
    format!("Dashboard error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use journey_core::{CampaignFilter, DateRange, JourneyType};

    fn criteria(json: &str) -> JsFilterCriteria {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let filter = PatientFilter::try_from(criteria(r#"{"query":"emma"}"#)).unwrap();
        assert_eq!(filter.query, "emma");
        assert_eq!(filter.campaign, CampaignFilter::All);
        assert_eq!(filter.date_range, DateRange::All);
    }

    #[test]
    fn camel_case_fields_are_read() {
        let filter = PatientFilter::try_from(criteria(
            r#"{"contextId":"CTX-001","campaign":"awo","dateRange":"3d"}"#,
        ))
        .unwrap();
        assert_eq!(filter.context_id, "CTX-001");
        assert_eq!(filter.campaign, CampaignFilter::Only(JourneyType::Awo));
        assert_eq!(filter.date_range, DateRange::Last3Days);
    }

    #[test]
    fn explicit_now_anchors_the_date_range() {
        let (filter, now) =
            resolve_criteria(criteria(r#"{"dateRange":"7d","now":"2023-12-08T12:00:00"}"#))
                .unwrap();
        assert_eq!(now.to_string(), "2023-12-08 12:00:00");

        let repo = load_fixture_repository().unwrap();
        let ids: Vec<&str> = filter
            .apply(repo.patients(), now)
            .into_iter()
            .map(|patient| patient.id.as_str())
            .collect();
        assert_eq!(ids, ["P-1002", "P-1003", "P-1004", "P-1005"]);
    }

    #[test]
    fn missing_now_uses_the_clock() {
        let before = wall_clock();
        let (_, now) = resolve_criteria(JsFilterCriteria::default()).unwrap();
        assert!(now >= before);
    }

    #[test]
    fn malformed_now_is_rejected() {
        let result = serde_json::from_str::<JsFilterCriteria>(r#"{"now":"last week"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn bad_enum_strings_are_reported() {
        let err = PatientFilter::try_from(criteria(r#"{"campaign":"billing"}"#)).unwrap_err();
        assert_eq!(
            format_dashboard_error(err),
            "Dashboard error: Loại chiến dịch không hợp lệ: billing"
        );

        let err = PatientFilter::try_from(criteria(r#"{"dateRange":"forever"}"#)).unwrap_err();
        assert_eq!(err, DashboardError::UnknownDateRange("forever".to_string()));
    }
}
