//! Ticket rendering: a confirmed booking becomes a downloadable PNG.
//!
//! Fixed 1000×1400 portrait layout mirroring the paper queue ticket: dark
//! red gradient with faint diagonal hatching, gold header band, a rounded
//! card carrying the labeled fields, and a footer line. Pure function of the
//! [`BookingRecord`] — no network, no state. Pixel work is plain `image`
//! buffer manipulation; text uses the built-in 5×7 font.

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};

use crate::config;
use crate::models::booking::BookingRecord;

use super::font::{fold_upper, glyph, GLYPH_HEIGHT, GLYPH_WIDTH};

pub const TICKET_WIDTH: u32 = 1000;
pub const TICKET_HEIGHT: u32 = 1400;

/// Characters per wrapped line of the service-category column.
const SERVICE_COLUMN_CHARS: usize = 20;

const BG_TOP: Rgb<u8> = Rgb([0x7F, 0x1D, 0x1D]);
const BG_BOTTOM: Rgb<u8> = Rgb([0x45, 0x0A, 0x0A]);
const GOLD: Rgb<u8> = Rgb([0xFA, 0xCC, 0x15]);
const GOLD_SOFT: Rgb<u8> = Rgb([0xFE, 0xF0, 0x8A]);
const GOLD_CODE: Rgb<u8> = Rgb([0xFD, 0xE0, 0x47]);
const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Download name for a ticket, embedding the appointment code.
pub fn ticket_filename(code: &str) -> String {
    let safe: String = code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    format!("PhieuHen_{safe}.png")
}

/// Render the ticket for a confirmed booking. Returns PNG bytes.
pub fn render_ticket(record: &BookingRecord) -> Result<Vec<u8>, TicketError> {
    let mut img = RgbImage::new(TICKET_WIDTH, TICKET_HEIGHT);

    paint_background(&mut img);

    // Gold accent band across the top
    fill_rect(&mut img, 0, 0, TICKET_WIDTH, 15, GOLD);

    // Office header line
    let header = fold_upper(&format!("{} {}", config::OFFICE_NAME, config::WARD_NAME));
    draw_text(&mut img, Anchor::Left(60), 52, &header, 3, GOLD_SOFT);

    // Card region holding all fields
    blend_rounded_rect(&mut img, 60, 180, 880, 1050, 50, Rgb([0, 0, 0]), 0.2);

    draw_text(
        &mut img,
        Anchor::Center(500),
        270,
        &fold_upper("Phiếu đặt lịch hẹn"),
        7,
        GOLD,
    );
    draw_text(
        &mut img,
        Anchor::Center(500),
        348,
        &fold_upper("Vui lòng xuất trình phiếu này khi đến làm việc"),
        2,
        faded(GOLD_SOFT, 0.35),
    );

    draw_field(
        &mut img,
        410,
        "Họ tên người đăng ký",
        &record.citizen_name,
        5,
        WHITE,
    );
    draw_field(
        &mut img,
        530,
        "Số Căn cước công dân",
        &record.national_id,
        5,
        WHITE,
    );
    draw_field(
        &mut img,
        650,
        "Mã số định danh lịch hẹn",
        &record.code,
        6,
        GOLD_CODE,
    );

    blend_hline(&mut img, 110, 890, 775, GOLD, 0.10);

    // Service category, wrapped within its fixed column
    draw_text(
        &mut img,
        Anchor::Left(110),
        810,
        &fold_upper("Lĩnh vực tiếp nhận"),
        2,
        faded(GOLD_SOFT, 0.45),
    );
    let mut line_y = 845;
    for line in wrap_text(&fold_upper(&record.service), SERVICE_COLUMN_CHARS) {
        draw_text(&mut img, Anchor::Left(110), line_y, &line, 4, WHITE);
        line_y += 45;
    }

    // Counter, right column
    draw_text(
        &mut img,
        Anchor::Right(890),
        810,
        &fold_upper("Vị trí tiếp nhận"),
        2,
        faded(GOLD_SOFT, 0.45),
    );
    draw_text(
        &mut img,
        Anchor::Right(890),
        845,
        &format!("QUAY SO {}", record.counter),
        6,
        GOLD,
    );

    // Slot + date row, below whichever column ran longer
    let info_y = line_y.max(1000) + 40;
    draw_field(
        &mut img,
        info_y,
        "Khung giờ đến làm việc",
        &record.time_slot,
        5,
        WHITE,
    );
    draw_text(
        &mut img,
        Anchor::Right(890),
        info_y,
        &fold_upper("Ngày hẹn"),
        2,
        faded(GOLD_SOFT, 0.45),
    );
    draw_text(
        &mut img,
        Anchor::Right(890),
        info_y + 30,
        &record.date_label(),
        5,
        WHITE,
    );

    draw_text(
        &mut img,
        Anchor::Center(500),
        1330,
        &header,
        2,
        faded(GOLD_SOFT, 0.25),
    );

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageOutputFormat::Png)
        .map_err(|e| TicketError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

// ── Layout helpers ───────────────────────────────────────────

/// Label + value pair in the left column.
fn draw_field(img: &mut RgbImage, y: u32, label: &str, value: &str, scale: u32, color: Rgb<u8>) {
    draw_text(
        img,
        Anchor::Left(110),
        y,
        &fold_upper(label),
        2,
        faded(GOLD_SOFT, 0.45),
    );
    draw_text(img, Anchor::Left(110), y + 30, &fold_upper(value), scale, color);
}

/// Word wrap within a fixed column width, in characters.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if current_len + word_len + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ── Pixel primitives ─────────────────────────────────────────

fn paint_background(img: &mut RgbImage) {
    // Vertical gradient, then faint diagonal hatching over it
    for y in 0..TICKET_HEIGHT {
        let t = y as f32 / (TICKET_HEIGHT - 1) as f32;
        let color = lerp(BG_TOP, BG_BOTTOM, t);
        for x in 0..TICKET_WIDTH {
            img.put_pixel(x, y, color);
        }
    }
    for i in 0..40 {
        blend_diagonal(img, i * 60, 150, GOLD, 0.03);
    }
}

fn lerp(a: Rgb<u8>, b: Rgb<u8>, t: f32) -> Rgb<u8> {
    let channel = |ca: u8, cb: u8| (ca as f32 + (cb as f32 - ca as f32) * t).round() as u8;
    Rgb([
        channel(a.0[0], b.0[0]),
        channel(a.0[1], b.0[1]),
        channel(a.0[2], b.0[2]),
    ])
}

fn blend_pixel(img: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>, alpha: f32) {
    if x >= img.width() || y >= img.height() {
        return;
    }
    let base = *img.get_pixel(x, y);
    img.put_pixel(x, y, lerp(base, color, alpha));
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Darkened rounded-rectangle overlay (the card region).
fn blend_rounded_rect(
    img: &mut RgbImage,
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
    radius: u32,
    color: Rgb<u8>,
    alpha: f32,
) {
    let r = radius as i64;
    let r_sq = r * r;
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            // Distance from the nearest corner center, for corner rounding
            let dx = (x as i64 - (x0 as i64 + r)).min(0) + (x as i64 - (x0 + w) as i64 + r + 1).max(0);
            let dy = (y as i64 - (y0 as i64 + r)).min(0) + (y as i64 - (y0 + h) as i64 + r + 1).max(0);
            if dx * dx + dy * dy > r_sq {
                continue;
            }
            blend_pixel(img, x, y, color, alpha);
        }
    }
}

fn blend_hline(img: &mut RgbImage, x0: u32, x1: u32, y: u32, color: Rgb<u8>, alpha: f32) {
    for x in x0..=x1.min(img.width() - 1) {
        blend_pixel(img, x, y, color, alpha);
    }
}

/// One hatch line from (0, y0) to (width, y0 + drop).
fn blend_diagonal(img: &mut RgbImage, y0: u32, drop: u32, color: Rgb<u8>, alpha: f32) {
    let w = img.width();
    for x in 0..w {
        let y = y0 as f32 + drop as f32 * x as f32 / w as f32;
        blend_pixel(img, x, y.round() as u32, color, alpha);
    }
}

/// Pre-fade a color toward the gradient midpoint, approximating the source's
/// low-opacity label text without per-glyph alpha.
fn faded(color: Rgb<u8>, opacity: f32) -> Rgb<u8> {
    let mid = lerp(BG_TOP, BG_BOTTOM, 0.5);
    lerp(mid, color, opacity.clamp(0.0, 1.0))
}

enum Anchor {
    Left(u32),
    Center(u32),
    Right(u32),
}

fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        0
    } else {
        n * (GLYPH_WIDTH + 1) * scale - scale
    }
}

/// Draw one line of folded text, top-left anchored at the resolved x.
fn draw_text(img: &mut RgbImage, anchor: Anchor, y: u32, text: &str, scale: u32, color: Rgb<u8>) {
    let width = text_width(text, scale);
    let mut pen_x = match anchor {
        Anchor::Left(x) => x,
        Anchor::Center(cx) => cx.saturating_sub(width / 2),
        Anchor::Right(x) => x.saturating_sub(width),
    };
    for c in text.chars() {
        if let Some(rows) = glyph(c) {
            for row_idx in 0..GLYPH_HEIGHT {
                let row = rows[row_idx as usize];
                for col in 0..GLYPH_WIDTH {
                    if (row >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                        continue;
                    }
                    let px = pen_x + col * scale;
                    let py = y + row_idx * scale;
                    fill_rect(img, px, py, scale, scale, color);
                }
            }
        }
        pen_x += (GLYPH_WIDTH + 1) * scale;
    }
}
