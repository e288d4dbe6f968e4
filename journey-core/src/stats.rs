//! Số liệu tổng hợp trên danh sách bệnh nhân đã lọc.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{JourneyStatus, JourneyType, Patient};

/// Bảng số liệu cho các thẻ thống kê.
///
/// Chỉ đếm riêng hành trình `active` và `completed`; hành trình `pending`
/// nằm trong `total_journeys` nhưng không có bộ đếm riêng, nên
/// `active_journeys + completed_journeys` có thể nhỏ hơn tổng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStats {
    pub total_patients: usize,
    pub total_journeys: usize,
    pub active_journeys: usize,
    pub completed_journeys: usize,
    /// Luôn có đủ năm loại chiến dịch, kể cả khi bằng 0.
    pub by_type: BTreeMap<JourneyType, usize>,
    /// Phần trăm hoàn thành, làm tròn; bằng 0 khi không có hành trình.
    pub completion_rate: u32,
}

impl Default for JourneyStats {
    fn default() -> Self {
        Self {
            total_patients: 0,
            total_journeys: 0,
            active_journeys: 0,
            completed_journeys: 0,
            by_type: JourneyType::ALL.into_iter().map(|kind| (kind, 0)).collect(),
            completion_rate: 0,
        }
    }
}

impl JourneyStats {
    /// Tính lại toàn bộ số liệu; nhận cả `&[Patient]` lẫn `Vec<&Patient>`.
    pub fn compute<'a, I>(patients: I) -> Self
    where
        I: IntoIterator<Item = &'a Patient>,
    {
        let mut stats = Self::default();

        for patient in patients {
            stats.total_patients += 1;
            for journey in &patient.journeys {
                stats.total_journeys += 1;
                match journey.status {
                    JourneyStatus::Active => stats.active_journeys += 1,
                    JourneyStatus::Completed => stats.completed_journeys += 1,
                    JourneyStatus::Pending => {}
                }
                *stats.by_type.entry(journey.kind).or_insert(0) += 1;
            }
        }

        stats.completion_rate = completion_rate(stats.completed_journeys, stats.total_journeys);

        tracing::debug!(
            patients = stats.total_patients,
            journeys = stats.total_journeys,
            completion_rate = stats.completion_rate,
            "journey stats computed"
        );

        stats
    }

    pub fn count_for(&self, kind: JourneyType) -> usize {
        self.by_type.get(&kind).copied().unwrap_or_default()
    }
}

/// Làm tròn nửa lên bằng số nguyên: `round(completed * 100 / total)`.
fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (completed * 200 + total) / (total * 2);
    u32::try_from(rate).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContactInfo, Journey};
    use chrono::NaiveDate;

    fn journey(kind: JourneyType, status: JourneyStatus) -> Journey {
        Journey {
            id: format!("J-{kind}"),
            kind,
            name: kind.as_str().to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 12, 1)
                .and_then(|date| date.and_hms_opt(9, 0, 0))
                .unwrap(),
            end_date: None,
            status,
            steps: Vec::new(),
        }
    }

    fn patient(id: &str, journeys: Vec<Journey>) -> Patient {
        Patient {
            id: id.to_string(),
            name: format!("Patient {id}"),
            avatar: None,
            age: 50,
            gender: "Male".to_string(),
            context_id: None,
            contact_info: ContactInfo {
                email: format!("{id}@example.com"),
                phone: "(555) 111-2222".to_string(),
            },
            journeys,
        }
    }

    #[test]
    fn empty_input_has_zero_rate_and_all_types() {
        let stats = JourneyStats::compute(&[] as &[Patient]);
        assert_eq!(stats.total_patients, 0);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.by_type.len(), JourneyType::ALL.len());
        assert!(stats.by_type.values().all(|count| *count == 0));
    }

    #[test]
    fn patient_without_journeys_counts_but_rate_stays_zero() {
        let patients = vec![patient("P-1", Vec::new())];
        let stats = JourneyStats::compute(&patients);
        assert_eq!(stats.total_patients, 1);
        assert_eq!(stats.total_journeys, 0);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn pending_journeys_are_only_in_total() {
        let patients = vec![
            patient(
                "P-1",
                vec![
                    journey(JourneyType::Prepay, JourneyStatus::Active),
                    journey(JourneyType::Results, JourneyStatus::Completed),
                ],
            ),
            patient(
                "P-2",
                vec![journey(JourneyType::Awo, JourneyStatus::Pending)],
            ),
        ];
        let stats = JourneyStats::compute(&patients);

        assert_eq!(stats.total_patients, 2);
        assert_eq!(stats.total_journeys, 3);
        assert_eq!(stats.active_journeys, 1);
        assert_eq!(stats.completed_journeys, 1);
        assert_ne!(
            stats.active_journeys + stats.completed_journeys,
            stats.total_journeys
        );
        assert_eq!(stats.count_for(JourneyType::Awo), 1);
        assert_eq!(stats.count_for(JourneyType::Guestpay), 0);
        assert_eq!(stats.completion_rate, 33);
    }

    #[test]
    fn completion_rate_rounds_half_up() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 200), 1);
        assert_eq!(completion_rate(1, 201), 0);
        assert_eq!(completion_rate(5, 5), 100);
    }

    #[test]
    fn compute_accepts_filtered_references() {
        let patients = vec![
            patient("P-1", vec![journey(JourneyType::Guestpay, JourneyStatus::Completed)]),
            patient("P-2", vec![journey(JourneyType::Prepay, JourneyStatus::Active)]),
        ];
        let filtered: Vec<&Patient> = patients.iter().filter(|p| p.id == "P-1").collect();
        let stats = JourneyStats::compute(filtered);
        assert_eq!(stats.total_patients, 1);
        assert_eq!(stats.completion_rate, 100);
    }
}
