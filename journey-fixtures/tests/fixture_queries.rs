use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use journey_core::{
    CampaignFilter, DateRange, InMemoryRepository, JourneyStats, JourneyType, Patient,
    PatientFilter, PatientRepository,
};
use journey_fixtures::{load_fixture_repository, parse_patients_str, FIXTURE_JSON};
use serde_json::Value;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn repository() -> InMemoryRepository {
    load_fixture_repository().expect("Không nạp được dữ liệu mẫu")
}

fn reference_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 12, 8)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("Mốc thời gian không hợp lệ")
}

fn names(patients: &[&Patient]) -> Vec<String> {
    patients.iter().map(|patient| patient.name.clone()).collect()
}

#[test]
fn context_search_returns_household_members() {
    let repo = repository();
    let filter = PatientFilter {
        context_id: "CTX-001".to_string(),
        ..PatientFilter::default()
    };

    let matched = filter.apply(repo.patients(), reference_now());
    assert_eq!(names(&matched), ["Emma Thompson", "Sarah Johnson"]);

    let ids: Vec<&str> = matched.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["P-1001", "P-1003"]);
}

#[test]
fn context_lookup_matches_filter() {
    let repo = repository();
    let ids: Vec<&str> = repo
        .find_by_context("CTX-001")
        .into_iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, ["P-1001", "P-1003"]);
    assert!(repo.find_by_context("CTX-404").is_empty());
}

#[test]
fn prepay_campaign_filter() {
    let repo = repository();
    let filter = PatientFilter {
        campaign: "prepay".parse().expect("Loại chiến dịch hợp lệ"),
        ..PatientFilter::default()
    };

    let matched = filter.apply(repo.patients(), reference_now());
    assert_eq!(
        names(&matched),
        ["Emma Thompson", "Michael Chen", "Jennifer Lee"]
    );
}

#[test]
fn campaign_all_and_empty_query_return_everything() {
    let repo = repository();
    let filter = PatientFilter {
        campaign: CampaignFilter::All,
        query: String::new(),
        ..PatientFilter::default()
    };
    let matched = filter.apply(repo.patients(), reference_now());
    assert_eq!(matched.len(), repo.patients().len());
}

#[test]
fn lookup_by_id() {
    let repo = repository();
    let patient = repo.find_by_id("P-1001").expect("Thiếu bệnh nhân P-1001");
    assert_eq!(patient.name, "Emma Thompson");
    assert_eq!(patient.initials(), "ET");
    assert_eq!(patient.active_journey_count(), 1);
    assert!(repo.find_by_id("P-0000").is_none());
}

#[test]
fn full_fixture_stats_match_golden() {
    let repo = repository();
    let stats = JourneyStats::compute(repo.patients());

    let actual = serde_json::to_value(&stats).expect("Không serialize stats");
    let expected = fs::read_to_string(fixture_path("fixture_stats.json"))
        .expect("Không đọc được golden stats");
    let expected: Value = serde_json::from_str(&expected).expect("Golden không hợp lệ");

    assert_eq!(actual, expected);
    // Hành trình pending chỉ nằm trong tổng.
    assert_eq!(
        stats.total_journeys - stats.active_journeys - stats.completed_journeys,
        1
    );
}

#[test]
fn stats_follow_filtered_set() {
    let repo = repository();
    let filter = PatientFilter {
        context_id: "CTX-001".to_string(),
        ..PatientFilter::default()
    };
    let stats = JourneyStats::compute(filter.apply(repo.patients(), reference_now()));

    assert_eq!(stats.total_patients, 2);
    assert_eq!(stats.total_journeys, 4);
    assert_eq!(stats.active_journeys, 2);
    assert_eq!(stats.completed_journeys, 2);
    assert_eq!(stats.count_for(JourneyType::Results), 2);
    assert_eq!(stats.count_for(JourneyType::Awo), 0);
    assert_eq!(stats.completion_rate, 50);
}

#[test]
fn date_range_against_reference_instant() {
    let repo = repository();
    let last_day = PatientFilter {
        date_range: DateRange::LastDay,
        ..PatientFilter::default()
    };
    assert_eq!(
        names(&last_day.apply(repo.patients(), reference_now())),
        ["Sarah Johnson", "David Rodriguez"]
    );

    let last_week = PatientFilter {
        date_range: DateRange::Last7Days,
        ..PatientFilter::default()
    };
    assert_eq!(
        names(&last_week.apply(repo.patients(), reference_now())),
        ["Michael Chen", "Sarah Johnson", "Jennifer Lee", "David Rodriguez"]
    );
}

#[test]
fn fixture_survives_serde_round_trip() {
    let patients = parse_patients_str(FIXTURE_JSON).expect("Dữ liệu mẫu hợp lệ");
    let encoded = serde_json::to_value(&patients).expect("Không serialize bệnh nhân");

    let pending_step = &encoded[0]["journeys"][0]["steps"][7];
    assert_eq!(pending_step["id"], "s8");
    assert_eq!(pending_step["timestamp"], "");
    assert_eq!(encoded[0]["journeys"][1]["endDate"], "2023-11-15T14:30:00");
    assert_eq!(encoded[0]["contextId"], "CTX-001");
    assert!(encoded[4].get("avatar").is_none());

    let decoded: Vec<Patient> = serde_json::from_value(encoded).expect("Không đọc lại được");
    assert_eq!(decoded, patients);
}
