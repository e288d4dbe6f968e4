use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::JourneyTab;

/// Kiểu bố trí timeline của một hành trình.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineLayout {
    /// Danh sách bước theo chiều dọc, kèm chi tiết và hành động.
    #[default]
    Vertical,
    /// Dải bước nằm ngang, chi tiết hiện trong tooltip.
    Horizontal,
}

/// Cấu hình hiển thị của dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    pub timeline_layout: TimelineLayout,
    /// Tab được chọn khi mở chi tiết bệnh nhân.
    pub default_tab: JourneyTab,
    /// Dưới độ rộng này (px) chỉ hiển thị một cột: danh sách hoặc chi tiết.
    pub mobile_breakpoint_px: u32,
    /// Hiển thị hàng thẻ đếm theo loại chiến dịch.
    pub show_type_stats: bool,
    /// Mốc tham chiếu cho bộ lọc khoảng thời gian; `None` dùng đồng hồ hệ thống.
    #[serde(default)]
    pub reference_time: Option<NaiveDateTime>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timeline_layout: TimelineLayout::default(),
            default_tab: JourneyTab::default(),
            mobile_breakpoint_px: 768,
            show_type_stats: true,
            reference_time: None,
        }
    }
}

impl DashboardConfig {
    pub fn is_mobile_width(&self, width_px: f64) -> bool {
        width_px < f64::from(self.mobile_breakpoint_px)
    }

    pub fn reference_now(&self) -> NaiveDateTime {
        self.reference_time.unwrap_or_else(|| Utc::now().naive_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn reference_time_overrides_wall_clock() {
        let fixed = NaiveDate::from_ymd_opt(2023, 12, 8)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .unwrap();
        let config = DashboardConfig {
            reference_time: Some(fixed),
            ..DashboardConfig::default()
        };
        assert_eq!(config.reference_now(), fixed);
    }

    #[test]
    fn missing_reference_time_follows_the_clock() {
        let before = Utc::now().naive_utc();
        let now = DashboardConfig::default().reference_now();
        assert!(now >= before);
    }
}
