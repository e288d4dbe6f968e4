//! Lớp truy cập dữ liệu chỉ đọc mà giao diện sử dụng.

use std::collections::HashSet;

use crate::{DashboardError, Patient};

/// Nguồn dữ liệu bệnh nhân chỉ đọc.
///
/// Giao diện chỉ phụ thuộc vào trait này, nên có thể thay bộ dữ liệu mẫu
/// bằng backend thật mà không đổi phía sử dụng.
pub trait PatientRepository {
    fn patients(&self) -> &[Patient];

    /// Tìm bệnh nhân theo mã; `None` khi không có.
    fn find_by_id(&self, id: &str) -> Option<&Patient> {
        self.patients().iter().find(|patient| patient.id == id)
    }

    /// Mọi bệnh nhân có đúng mã ngữ cảnh này, theo thứ tự gốc.
    fn find_by_context(&self, context_id: &str) -> Vec<&Patient> {
        let context_id = context_id.trim();
        if context_id.is_empty() {
            return Vec::new();
        }
        self.patients()
            .iter()
            .filter(|patient| patient.context_id.as_deref() == Some(context_id))
            .collect()
    }
}

/// Kho dữ liệu trong bộ nhớ, nạp một lần và không thay đổi.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryRepository {
    patients: Vec<Patient>,
}

impl InMemoryRepository {
    /// Từ chối dữ liệu có mã bệnh nhân trùng nhau.
    pub fn new(patients: Vec<Patient>) -> Result<Self, DashboardError> {
        let mut seen = HashSet::with_capacity(patients.len());
        for patient in &patients {
            if !seen.insert(patient.id.as_str()) {
                return Err(DashboardError::DuplicatePatient(patient.id.clone()));
            }
        }
        Ok(Self { patients })
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

impl PatientRepository for InMemoryRepository {
    fn patients(&self) -> &[Patient] {
        &self.patients
    }
}
