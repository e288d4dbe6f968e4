//! Bộ lọc bệnh nhân: tìm kiếm tự do, mã ngữ cảnh, loại chiến dịch và khoảng thời gian.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{DashboardError, JourneyType, Patient};

/// Lựa chọn loại chiến dịch: tất cả hoặc một loại cụ thể.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum CampaignFilter {
    #[default]
    All,
    Only(JourneyType),
}

impl CampaignFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignFilter::All => "all",
            CampaignFilter::Only(kind) => kind.as_str(),
        }
    }

    fn matches(self, patient: &Patient) -> bool {
        match self {
            CampaignFilter::All => true,
            CampaignFilter::Only(kind) => patient.has_journey_type(kind),
        }
    }
}

impl FromStr for CampaignFilter {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(CampaignFilter::All);
        }
        trimmed.parse().map(CampaignFilter::Only)
    }
}

impl TryFrom<String> for CampaignFilter {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CampaignFilter> for String {
    fn from(value: CampaignFilter) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for CampaignFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cửa sổ thời gian tính ngược từ thời điểm tham chiếu.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum DateRange {
    #[default]
    All,
    LastDay,
    Last3Days,
    Last7Days,
    Last30Days,
}

impl DateRange {
    pub const ALL: [DateRange; 5] = [
        DateRange::All,
        DateRange::LastDay,
        DateRange::Last3Days,
        DateRange::Last7Days,
        DateRange::Last30Days,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateRange::All => "all",
            DateRange::LastDay => "1d",
            DateRange::Last3Days => "3d",
            DateRange::Last7Days => "7d",
            DateRange::Last30Days => "30d",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::All => "All Time",
            DateRange::LastDay => "Last 24 Hours",
            DateRange::Last3Days => "Last 3 Days",
            DateRange::Last7Days => "Last 7 Days",
            DateRange::Last30Days => "Last 30 Days",
        }
    }

    /// Độ dài cửa sổ; `None` với `All`.
    pub fn window(self) -> Option<Duration> {
        match self {
            DateRange::All => None,
            DateRange::LastDay => Some(Duration::days(1)),
            DateRange::Last3Days => Some(Duration::days(3)),
            DateRange::Last7Days => Some(Duration::days(7)),
            DateRange::Last30Days => Some(Duration::days(30)),
        }
    }

    fn matches(self, patient: &Patient, now: NaiveDateTime) -> bool {
        let Some(window) = self.window() else {
            return true;
        };
        let since = now - window;
        patient.journeys.iter().any(|journey| {
            let last = journey.last_activity();
            last >= since && last <= now
        })
    }
}

impl FromStr for DateRange {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(DateRange::All);
        }
        DateRange::ALL
            .into_iter()
            .find(|range| range.as_str() == normalized)
            .ok_or_else(|| DashboardError::UnknownDateRange(value.to_string()))
    }
}

impl TryFrom<String> for DateRange {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateRange> for String {
    fn from(value: DateRange) -> Self {
        value.as_str().to_string()
    }
}

/// Tiêu chí lọc độc lập, kết hợp theo phép AND. Tiêu chí rỗng khớp mọi bệnh nhân.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientFilter {
    /// So khớp không phân biệt hoa thường với tên, email, số điện thoại, mã bệnh nhân.
    pub query: String,
    /// So khớp không phân biệt hoa thường với tên/email, hoặc chuỗi con của mã ngữ cảnh.
    pub context_id: String,
    pub campaign: CampaignFilter,
    pub date_range: DateRange,
}

impl PatientFilter {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.context_id.trim().is_empty()
            && self.campaign == CampaignFilter::All
            && self.date_range == DateRange::All
    }

    /// Kiểm tra một bệnh nhân với mọi tiêu chí; `now` chỉ dùng cho khoảng thời gian.
    pub fn matches(&self, patient: &Patient, now: NaiveDateTime) -> bool {
        query_matches(patient, &self.query)
            && context_matches(patient, &self.context_id)
            && self.campaign.matches(patient)
            && self.date_range.matches(patient, now)
    }

    /// Trả về tập con giữ nguyên thứ tự ban đầu.
    pub fn apply<'a>(&self, patients: &'a [Patient], now: NaiveDateTime) -> Vec<&'a Patient> {
        let matched: Vec<&Patient> = patients
            .iter()
            .filter(|patient| self.matches(patient, now))
            .collect();

        tracing::debug!(
            total = patients.len(),
            matched = matched.len(),
            campaign = %self.campaign,
            date_range = self.date_range.as_str(),
            "patient filter applied"
        );

        matched
    }
}

fn query_matches(patient: &Patient, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [
        patient.name.as_str(),
        patient.contact_info.email.as_str(),
        patient.contact_info.phone.as_str(),
        patient.id.as_str(),
    ]
    .iter()
    .any(|text| text.to_lowercase().contains(&query))
}

fn context_matches(patient: &Patient, context_id: &str) -> bool {
    let term = context_id.trim();
    if term.is_empty() {
        return true;
    }

    let lowered = term.to_lowercase();
    patient.name.to_lowercase().contains(&lowered)
        || patient.contact_info.email.to_lowercase().contains(&lowered)
        || patient
            .context_id
            .as_deref()
            .is_some_and(|ctx| ctx.contains(term))
}
