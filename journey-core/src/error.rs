/// Lỗi chung của dashboard hành trình bệnh nhân.
///
/// Tra cứu theo mã không bao giờ sinh lỗi (trả về `Option`); các biến thể
/// dưới đây chỉ xuất hiện khi nạp dữ liệu hoặc đọc tiêu chí lọc dạng chuỗi.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Loại chiến dịch không hợp lệ: {0}")]
    UnknownCampaign(String),
    #[error("Khoảng thời gian không hợp lệ: {0}")]
    UnknownDateRange(String),
    #[error("Mã bệnh nhân bị trùng: {0}")]
    DuplicatePatient(String),
}
