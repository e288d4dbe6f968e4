//! Logic lõi của dashboard hành trình bệnh nhân: mô hình dữ liệu, bộ lọc,
//! số liệu tổng hợp và bảng tra cứu trình bày.

mod config;
mod display;
mod error;
mod filter;
mod model;
mod repository;
mod stats;

pub use config::{DashboardConfig, TimelineLayout};
pub use display::{
    format_date, format_date_time, format_span, format_time, order_for_display, BadgeTone,
    JourneyTab, StepAppearance, StepIcon, StepTone, TypeScheme,
};
pub use error::DashboardError;
pub use filter::{CampaignFilter, DateRange, PatientFilter};
pub use model::{ContactInfo, Journey, JourneyStatus, JourneyType, Patient, Step, StepStatus};
pub use repository::{InMemoryRepository, PatientRepository};
pub use stats::JourneyStats;
