//! The notification feed: seeded ward announcements plus booking
//! confirmations, newest first.
//!
//! Single-session, in-memory, single-writer: items are prepended in the
//! order bookings complete and never deleted. Mark-as-read is the only
//! mutation after insert.

use chrono::NaiveDateTime;

use crate::language::Language;
use crate::models::booking::BookingRecord;
use crate::models::notification::{BookingSummary, NotificationCategory, NotificationItem};

/// Display timestamp used across the feed, `HH:MM - dd/mm/yyyy`.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%H:%M - %d/%m/%Y").to_string()
}

pub struct NotificationCenter {
    items: Vec<NotificationItem>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Feed pre-loaded with the ward's standing announcements.
    pub fn with_seed() -> Self {
        let mut center = Self::new();
        center.push(
            "Triển khai cài đặt ứng dụng phường cho toàn dân".into(),
            "UBND Phường khuyến khích người dân sử dụng ứng dụng để nộp hồ sơ \
             trực tuyến và định danh công dân."
                .into(),
            "08:00 - 15/05/2026".into(),
            NotificationCategory::Announcement,
            true,
            None,
        );
        center.push(
            "Đợt cao điểm cấp CCCD gắn chip và định danh điện tử".into(),
            "Hỗ trợ người dân kích hoạt tài khoản định danh điện tử mức độ 2 \
             tại trụ sở Công an Phường."
                .into(),
            "08:00 - 20/05/2026".into(),
            NotificationCategory::Event,
            false,
            None,
        );
        center.push(
            "Hướng dẫn nộp hồ sơ trực tuyến qua Cổng dịch vụ công".into(),
            "Các bước đơn giản để nộp hồ sơ chứng thực bản sao và đăng ký \
             khai sinh ngay tại nhà."
                .into(),
            "09:15 - 01/06/2026".into(),
            NotificationCategory::News,
            false,
            Some("https://dichvucong.gov.vn".into()),
        );
        center
    }

    /// Append a plain announcement (oldest seeds first, so the feed stays
    /// newest-first once bookings start prepending).
    fn push(
        &mut self,
        title: String,
        summary: String,
        timestamp: String,
        category: NotificationCategory,
        is_important: bool,
        url: Option<String>,
    ) {
        let id = self.take_id();
        self.items.push(NotificationItem {
            id,
            title,
            summary,
            timestamp,
            category,
            is_read: false,
            is_important,
            url,
            is_booking: false,
            booking: None,
        });
    }

    /// Record a completed booking at the top of the feed.
    pub fn push_booking(
        &mut self,
        record: &BookingRecord,
        completed_at: NaiveDateTime,
        language: Language,
    ) -> u64 {
        let id = self.take_id();
        let item = NotificationItem {
            id,
            title: language.booking_confirmed_title(&record.service),
            summary: language.booking_confirmed_summary(
                &record.code,
                &record.citizen_name,
                &record.national_id,
                &record.time_slot,
                &record.date_label(),
            ),
            timestamp: format_timestamp(completed_at),
            category: NotificationCategory::Announcement,
            is_read: false,
            is_important: false,
            url: None,
            is_booking: true,
            booking: Some(BookingSummary::from(record)),
        };
        self.items.insert(0, item);
        id
    }

    pub fn items(&self) -> &[NotificationItem] {
        &self.items
    }

    pub fn by_category(&self, category: NotificationCategory) -> Vec<&NotificationItem> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_read).count()
    }

    /// Mark one item read. Returns false when the id is unknown.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.is_read = true;
                true
            }
            None => false,
        }
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_seed()
    }
}
