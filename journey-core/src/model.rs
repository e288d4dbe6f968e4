//! Mô hình dữ liệu bệnh nhân, hành trình và các bước.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// Loại chiến dịch của một hành trình.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JourneyType {
    Prepay,
    Results,
    Guestpay,
    Appointment,
    Awo,
}

impl JourneyType {
    /// Toàn bộ loại chiến dịch theo thứ tự khai báo.
    pub const ALL: [JourneyType; 5] = [
        JourneyType::Prepay,
        JourneyType::Results,
        JourneyType::Guestpay,
        JourneyType::Appointment,
        JourneyType::Awo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JourneyType::Prepay => "prepay",
            JourneyType::Results => "results",
            JourneyType::Guestpay => "guestpay",
            JourneyType::Appointment => "appointment",
            JourneyType::Awo => "awo",
        }
    }
}

impl fmt::Display for JourneyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JourneyType {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        JourneyType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DashboardError::UnknownCampaign(value.to_string()))
    }
}

/// Trạng thái tổng thể của hành trình, được cung cấp sẵn trong dữ liệu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JourneyStatus {
    Active,
    Completed,
    Pending,
}

/// Trạng thái của một bước.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Active,
    Upcoming,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
}

/// Một giai đoạn trong hành trình.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    pub id: String,
    pub name: String,
    /// `None` nghĩa là bước chưa diễn ra; được ghi ra thành chuỗi rỗng.
    #[serde(default, with = "optional_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
}

/// Một chiến dịch nhiều bước gắn với bệnh nhân.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: JourneyType,
    pub name: String,
    pub start_date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    pub status: JourneyStatus,
    pub steps: Vec<Step>,
}

impl Journey {
    /// Bước đang hoạt động đầu tiên, nếu có.
    pub fn active_step(&self) -> Option<&Step> {
        self.steps
            .iter()
            .find(|step| step.status == StepStatus::Active)
    }

    /// Số bước đã hoàn thành trên tổng số bước.
    pub fn progress(&self) -> (usize, usize) {
        let completed = self
            .steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
            .count();
        (completed, self.steps.len())
    }

    /// Thời điểm hoạt động gần nhất: ngày bắt đầu, ngày kết thúc hoặc mốc của các bước.
    pub fn last_activity(&self) -> NaiveDateTime {
        self.steps
            .iter()
            .filter_map(|step| step.timestamp)
            .chain(self.end_date)
            .fold(self.start_date, |latest, candidate| latest.max(candidate))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub age: u32,
    pub gender: String,
    /// Khóa nhóm bên ngoài (hộ gia đình, hồ sơ) dùng chung giữa nhiều bệnh nhân.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub journeys: Vec<Journey>,
}

impl Patient {
    /// Chữ cái đầu của từng phần trong tên, viết hoa ("Emma Thompson" -> "ET").
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn active_journey_count(&self) -> usize {
        self.journeys
            .iter()
            .filter(|journey| journey.status == JourneyStatus::Active)
            .count()
    }

    pub fn has_journey_type(&self, kind: JourneyType) -> bool {
        self.journeys.iter().any(|journey| journey.kind == kind)
    }
}

mod optional_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => serializer.collect_str(&timestamp.format(FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDateTime::parse_from_str(text, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 12, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .unwrap()
    }

    fn step(id: &str, status: StepStatus, timestamp: Option<NaiveDateTime>) -> Step {
        Step {
            id: id.to_string(),
            name: format!("Step {id}"),
            timestamp,
            status,
            details: None,
            metadata: None,
            actions: None,
        }
    }

    fn journey(steps: Vec<Step>) -> Journey {
        Journey {
            id: "J-1".to_string(),
            kind: JourneyType::Prepay,
            name: "Pre-Payment Campaign".to_string(),
            start_date: at(1, 9, 0),
            end_date: None,
            status: JourneyStatus::Active,
            steps,
        }
    }

    #[test]
    fn journey_type_parses_case_insensitively() {
        assert_eq!("GuestPay".parse::<JourneyType>(), Ok(JourneyType::Guestpay));
        assert_eq!(" awo ".parse::<JourneyType>(), Ok(JourneyType::Awo));
        assert_eq!(
            "billing".parse::<JourneyType>(),
            Err(DashboardError::UnknownCampaign("billing".to_string()))
        );
    }

    #[test]
    fn initials_take_first_letter_of_each_name_part() {
        let patient = Patient {
            id: "P-1".to_string(),
            name: "maria  de la Cruz".to_string(),
            avatar: None,
            age: 40,
            gender: "Female".to_string(),
            context_id: None,
            contact_info: ContactInfo {
                email: "maria@example.com".to_string(),
                phone: "(555) 000-0000".to_string(),
            },
            journeys: Vec::new(),
        };
        assert_eq!(patient.initials(), "MDLC");
    }

    #[test]
    fn progress_and_active_step() {
        let journey = journey(vec![
            step("s1", StepStatus::Completed, Some(at(1, 9, 5))),
            step("s2", StepStatus::Active, Some(at(1, 9, 30))),
            step("s3", StepStatus::Upcoming, None),
        ]);

        assert_eq!(journey.progress(), (1, 3));
        assert_eq!(journey.active_step().map(|s| s.id.as_str()), Some("s2"));
    }

    #[test]
    fn last_activity_ignores_missing_timestamps() {
        let mut journey = journey(vec![
            step("s1", StepStatus::Completed, Some(at(2, 8, 0))),
            step("s2", StepStatus::Upcoming, None),
        ]);
        assert_eq!(journey.last_activity(), at(2, 8, 0));

        journey.end_date = Some(at(3, 12, 0));
        assert_eq!(journey.last_activity(), at(3, 12, 0));

        journey.steps.clear();
        journey.end_date = None;
        assert_eq!(journey.last_activity(), at(1, 9, 0));
    }

    #[test]
    fn empty_step_timestamp_round_trips_as_empty_string() {
        let raw = r#"{"id":"s8","name":"Payment Completed","timestamp":"","status":"upcoming"}"#;
        let parsed: Step = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.timestamp, None);

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["timestamp"], "");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn journey_uses_camel_case_fields() {
        let raw = r#"{
            "id": "J-9",
            "type": "appointment",
            "name": "Annual Checkup",
            "startDate": "2023-12-10T08:00:00",
            "endDate": "2023-12-10T09:00:00",
            "status": "completed",
            "steps": []
        }"#;
        let parsed: Journey = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.kind, JourneyType::Appointment);
        assert_eq!(parsed.end_date, Some(at(10, 9, 0)));
        assert_eq!(parsed.status, JourneyStatus::Completed);
    }
}
