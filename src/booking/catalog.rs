//! Static service catalog: categories, time slots, counter routing.

use chrono::NaiveTime;

/// Service categories offered by the ward office, in display order.
pub const SERVICES: &[&str] = &[
    "Chứng thực bản sao/chữ ký",
    "Hộ tịch (Khai sinh/Kết hôn)",
    "Bảo trợ xã hội & Chính sách",
    "Xác nhận tình trạng hôn nhân",
    "Thủ tục đất đai/xây dựng",
    "Đăng ký hộ kinh doanh",
    "Khác (Tư vấn hành chính)",
];

/// The full half-hour slot grid: morning block 07:30–11:30, lunch gap,
/// afternoon block 13:30–17:00.
pub const ALL_TIME_SLOTS: &[&str] = &[
    "07:30 - 08:00",
    "08:00 - 08:30",
    "08:30 - 09:00",
    "09:00 - 09:30",
    "09:30 - 10:00",
    "10:00 - 10:30",
    "10:30 - 11:00",
    "11:00 - 11:30",
    "13:30 - 14:00",
    "14:00 - 14:30",
    "14:30 - 15:00",
    "15:00 - 15:30",
    "15:30 - 16:00",
    "16:00 - 16:30",
    "16:30 - 17:00",
];

/// Counter the citizen is routed to for a service category.
///
/// Unknown or empty input is not an error — it degrades to the general
/// counter "01".
pub fn counter_for_service(service: &str) -> &'static str {
    match service {
        "Chứng thực bản sao/chữ ký" => "07",
        "Hộ tịch (Khai sinh/Kết hôn)" => "10",
        "Xác nhận tình trạng hôn nhân" => "10",
        "Bảo trợ xã hội & Chính sách" => "03",
        "Thủ tục đất đai/xây dựng" => "11",
        "Đăng ký hộ kinh doanh" => "12",
        _ => "01",
    }
}

/// Is this one of the catalog's service categories?
pub fn is_known_service(service: &str) -> bool {
    SERVICES.contains(&service)
}

/// Start time of a slot label like `"07:30 - 08:00"`.
pub fn slot_start(slot: &str) -> Option<NaiveTime> {
    let start = slot.split(" - ").next()?;
    NaiveTime::parse_from_str(start, "%H:%M").ok()
}
