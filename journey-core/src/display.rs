//! Bảng tra cứu trình bày: biểu tượng bước, nhãn và màu theo loại chiến dịch,
//! nhãn trạng thái hành trình, tab và định dạng thời gian.
//!
//! Không có phép chuyển trạng thái nào ở đây; trạng thái đến từ dữ liệu.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Journey, JourneyStatus, JourneyType, StepStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepIcon {
    Check,
    Clock,
    Cross,
    Dot,
}

impl StepIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            StepIcon::Check => "✓",
            StepIcon::Clock => "◷",
            StepIcon::Cross => "✕",
            StepIcon::Dot => "•",
        }
    }
}

/// Mức nhấn của một bước trên timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTone {
    /// Nền nhạt màu chiến dịch.
    Accent,
    /// Nền đậm màu chiến dịch, có viền nổi.
    Highlight,
    Muted,
    Faint,
}

impl StepTone {
    pub fn css_key(self) -> &'static str {
        match self {
            StepTone::Accent => "accent",
            StepTone::Highlight => "highlight",
            StepTone::Muted => "muted",
            StepTone::Faint => "faint",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepAppearance {
    pub icon: StepIcon,
    pub tone: StepTone,
    pub pulse: bool,
    pub strike: bool,
}

impl StepStatus {
    pub fn appearance(self) -> StepAppearance {
        match self {
            StepStatus::Completed => StepAppearance {
                icon: StepIcon::Check,
                tone: StepTone::Accent,
                pulse: false,
                strike: false,
            },
            StepStatus::Active => StepAppearance {
                icon: StepIcon::Clock,
                tone: StepTone::Highlight,
                pulse: true,
                strike: false,
            },
            StepStatus::Upcoming => StepAppearance {
                icon: StepIcon::Dot,
                tone: StepTone::Muted,
                pulse: false,
                strike: false,
            },
            StepStatus::Skipped => StepAppearance {
                icon: StepIcon::Cross,
                tone: StepTone::Faint,
                pulse: false,
                strike: true,
            },
        }
    }

    pub fn css_key(self) -> &'static str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::Active => "active",
            StepStatus::Upcoming => "upcoming",
            StepStatus::Skipped => "skipped",
        }
    }
}

/// Nhãn và bảng màu của một loại chiến dịch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeScheme {
    pub label: &'static str,
    pub badge: &'static str,
    pub accent: &'static str,
}

impl JourneyType {
    pub fn scheme(self) -> TypeScheme {
        match self {
            JourneyType::Prepay => TypeScheme {
                label: "Pre-Payment",
                badge: "Prepay",
                accent: "#8b5cf6",
            },
            JourneyType::Results => TypeScheme {
                label: "Results Call",
                badge: "Results",
                accent: "#f59e0b",
            },
            JourneyType::Guestpay => TypeScheme {
                label: "Guest Payment",
                badge: "Guest Pay",
                accent: "#06b6d4",
            },
            JourneyType::Appointment => TypeScheme {
                label: "Appointment",
                badge: "Appointment",
                accent: "#2563eb",
            },
            JourneyType::Awo => TypeScheme {
                label: "AWO",
                badge: "AWO",
                accent: "#16a34a",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Info,
    Success,
    Warning,
}

impl BadgeTone {
    pub fn css_key(self) -> &'static str {
        match self {
            BadgeTone::Info => "info",
            BadgeTone::Success => "success",
            BadgeTone::Warning => "warning",
        }
    }
}

impl JourneyStatus {
    pub fn badge(self) -> (&'static str, BadgeTone) {
        match self {
            JourneyStatus::Active => ("Active", BadgeTone::Info),
            JourneyStatus::Completed => ("Completed", BadgeTone::Success),
            JourneyStatus::Pending => ("Pending", BadgeTone::Warning),
        }
    }
}

/// Tab hành trình trong màn chi tiết bệnh nhân.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JourneyTab {
    #[default]
    All,
    Active,
    Completed,
}

impl JourneyTab {
    pub const ALL: [JourneyTab; 3] = [JourneyTab::All, JourneyTab::Active, JourneyTab::Completed];

    pub fn label(self) -> &'static str {
        match self {
            JourneyTab::All => "All Journeys",
            JourneyTab::Active => "Active",
            JourneyTab::Completed => "Completed",
        }
    }

    pub fn empty_label(self) -> &'static str {
        match self {
            JourneyTab::All => "No journeys found",
            JourneyTab::Active => "No active journeys",
            JourneyTab::Completed => "No completed journeys",
        }
    }

    pub fn includes(self, journey: &Journey) -> bool {
        match self {
            JourneyTab::All => true,
            JourneyTab::Active => journey.status == JourneyStatus::Active,
            JourneyTab::Completed => journey.status == JourneyStatus::Completed,
        }
    }

    /// Hành trình thuộc tab, đã sắp theo thứ tự hiển thị.
    pub fn select(self, journeys: &[Journey]) -> Vec<&Journey> {
        order_for_display(journeys.iter().filter(|journey| self.includes(journey)))
    }
}

/// Đưa hành trình `appointment` lên đầu, giữ nguyên thứ tự tương đối còn lại.
pub fn order_for_display<'a, I>(journeys: I) -> Vec<&'a Journey>
where
    I: IntoIterator<Item = &'a Journey>,
{
    let mut ordered: Vec<&Journey> = journeys.into_iter().collect();
    ordered.sort_by_key(|journey| journey.kind != JourneyType::Appointment);
    ordered
}

/// "Dec 1, 2023"; chuỗi rỗng khi chưa có mốc thời gian.
pub fn format_date(timestamp: Option<NaiveDateTime>) -> String {
    timestamp
        .map(|ts| ts.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// "9:05 AM".
pub fn format_time(timestamp: Option<NaiveDateTime>) -> String {
    timestamp
        .map(|ts| ts.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// "Dec 1, 9:05 AM".
pub fn format_date_time(timestamp: Option<NaiveDateTime>) -> String {
    timestamp
        .map(|ts| ts.format("%b %-d, %-I:%M %p").to_string())
        .unwrap_or_default()
}

/// "Dec 1, 2023 - Dec 3, 2023" hoặc chỉ ngày bắt đầu.
pub fn format_span(journey: &Journey) -> String {
    let start = format_date(Some(journey.start_date));
    match journey.end_date {
        Some(end) => format!("{start} - {}", format_date(Some(end))),
        None => start,
    }
}
