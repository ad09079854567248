//! Geometry normalizer
//!
//! [`Normalize::normalize`] turns untrusted JSON into a fully valid entity.
//! It never fails: every field is validated independently and falls back to
//! the corresponding field of `fallback` when unusable. Sizes are resolved
//! before positions so that position clamps see the final size.

use std::collections::HashSet;

use serde_json::Value;

use super::clamp::{number, text, truncate_chars, verbatim, Bounds, RectBounds};
use super::defaults::*;
use super::types::{
    ActionButtonTemplate, BookItem, FrontTemplate, FrontTemplates, Hotspot, MediaType, Rect,
    ShelfLayout, Spine, TitleFont,
};

/// Entities that can be rebuilt from untrusted input
pub trait Normalize: Sized {
    fn normalize(raw: &Value, fallback: &Self) -> Self;
}

/// Normalize an already-typed entity by round-tripping through JSON
pub fn renormalize<T>(entity: &T, fallback: &T) -> T
where
    T: Normalize + serde::Serialize,
{
    match serde_json::to_value(entity) {
        Ok(raw) => T::normalize(&raw, fallback),
        Err(_) => T::normalize(&Value::Null, fallback),
    }
}

fn label(raw: &Value, key: &str, fallback: &str) -> String {
    match text(raw, key) {
        Some(value) => truncate_chars(value, MAX_LABEL_CHARS),
        None => fallback.to_string(),
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

static NULL: Value = Value::Null;

fn field<'a>(raw: &'a Value, key: &str) -> &'a Value {
    raw.get(key).unwrap_or(&NULL)
}

fn literal<T>(raw: &Value, key: &str, parse: fn(&str) -> Option<T>, fallback: T) -> T {
    raw.get(key)
        .and_then(Value::as_str)
        .and_then(parse)
        .unwrap_or(fallback)
}

impl Normalize for Hotspot {
    fn normalize(raw: &Value, fallback: &Self) -> Self {
        Hotspot {
            key: match text(raw, "key") {
                Some(key) if !key.is_empty() => key,
                _ => fallback.key.clone(),
            },
            x_percent: HOTSPOT_POSITION.resolve(number(raw, "xPercent"), fallback.x_percent),
            y_percent: HOTSPOT_POSITION.resolve(number(raw, "yPercent"), fallback.y_percent),
            label: label(raw, "label", &fallback.label),
            target_path: text(raw, "targetPath").unwrap_or_else(|| fallback.target_path.clone()),
            font_size_vw: HOTSPOT_FONT_VW.resolve(number(raw, "fontSizeVw"), fallback.font_size_vw),
        }
    }
}

impl Normalize for BookItem {
    fn normalize(raw: &Value, fallback: &Self) -> Self {
        let rect = BOOK_RECT.resolve_value(raw, &fallback.rect());
        let title_box = match raw.get("titleBox") {
            Some(inner) => TITLE_BOX_RECT.resolve_value(inner, &fallback.title_box),
            None => TITLE_BOX_RECT.clamp(&fallback.title_box, &fallback.title_box),
        };
        let title_color = match text(raw, "titleColor") {
            Some(color) if is_hex_color(&color) => color,
            _ => fallback.title_color.clone(),
        };

        BookItem {
            key: text(raw, "key").unwrap_or_else(|| fallback.key.clone()),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            label: label(raw, "label", &fallback.label),
            target_path: text(raw, "targetPath").unwrap_or_else(|| fallback.target_path.clone()),
            spine: literal(raw, "spine", Spine::from_literal, fallback.spine),
            title_font: literal(raw, "titleFont", TitleFont::from_literal, fallback.title_font),
            title_size_vw: TITLE_SIZE_VW.resolve(number(raw, "titleSizeVw"), fallback.title_size_vw),
            title_color,
            title_box,
            cover_url: verbatim(raw, "coverUrl").unwrap_or_else(|| fallback.cover_url.clone()),
            sample_url: verbatim(raw, "sampleUrl").unwrap_or_else(|| fallback.sample_url.clone()),
            sample_type: literal(raw, "sampleType", MediaType::from_literal, fallback.sample_type),
            info_url: verbatim(raw, "infoUrl").unwrap_or_else(|| fallback.info_url.clone()),
            info_type: literal(raw, "infoType", MediaType::from_literal, fallback.info_type),
            full_book_url: verbatim(raw, "fullBookUrl")
                .unwrap_or_else(|| fallback.full_book_url.clone()),
            full_book_type: literal(
                raw,
                "fullBookType",
                MediaType::from_literal,
                fallback.full_book_type,
            ),
            hide_first_pages: HIDE_FIRST_PAGES
                .resolve_int(number(raw, "hideFirstPages"), fallback.hide_first_pages),
            max_pages: MAX_PAGES.resolve_int(number(raw, "maxPages"), fallback.max_pages),
        }
    }
}

/// Normalize a book collection.
///
/// The incoming list is truncated to [`MAX_BOOKS`] first; a shorter list
/// shrinks the shelf. Item `i` falls back to `fallback[i]`, or to the
/// default book for slot `i`. A non-array value keeps `fallback` intact.
pub fn normalize_books(raw: Option<&Value>, fallback: &[BookItem]) -> Vec<BookItem> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return fallback.to_vec();
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .take(MAX_BOOKS)
        .enumerate()
        .map(|(index, item)| {
            let item_fallback = fallback
                .get(index)
                .cloned()
                .unwrap_or_else(|| default_book(index));
            let mut book = BookItem::normalize(item, &item_fallback);
            if book.key.is_empty() || seen.contains(&book.key) {
                book.key = free_book_key(&seen, index + 1);
            }
            seen.insert(book.key.clone());
            book
        })
        .collect()
}

/// First `book-<n>` key at or after `start` not already in `taken`
fn free_book_key(taken: &HashSet<String>, start: usize) -> String {
    (start..)
        .map(|n| format!("book-{}", n))
        .find(|key| !taken.contains(key))
        .unwrap_or_default()
}

/// Normalize a cover window, snapping near-copies of historical defaults
pub fn normalize_cover_window(raw: &Value, fallback: &Rect) -> Rect {
    let rect = COVER_WINDOW_RECT.resolve_value(raw, fallback);
    let legacy = COVER_WINDOW_LEGACY
        .iter()
        .any(|old| rect.max_delta(old) <= COVER_WINDOW_SNAP_EPSILON);
    if legacy {
        COVER_WINDOW_DEFAULT
    } else {
        rect
    }
}

impl Normalize for ActionButtonTemplate {
    fn normalize(raw: &Value, fallback: &Self) -> Self {
        let rect = BUTTON_RECT.resolve_value(raw, &fallback.rect());
        ActionButtonTemplate {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            label: label(raw, "label", &fallback.label),
            font_size_vw: BUTTON_FONT_VW.resolve(number(raw, "fontSizeVw"), fallback.font_size_vw),
        }
    }
}

impl Normalize for FrontTemplate {
    fn normalize(raw: &Value, fallback: &Self) -> Self {
        FrontTemplate {
            frame: TEMPLATE_FRAME_RECT.resolve_value(field(raw, "frame"), &fallback.frame),
            cover_window: normalize_cover_window(field(raw, "coverWindow"), &fallback.cover_window),
            sample_button: ActionButtonTemplate::normalize(
                field(raw, "sampleButton"),
                &fallback.sample_button,
            ),
            info_button: ActionButtonTemplate::normalize(
                field(raw, "infoButton"),
                &fallback.info_button,
            ),
        }
    }
}

impl Normalize for FrontTemplates {
    fn normalize(raw: &Value, fallback: &Self) -> Self {
        FrontTemplates {
            gold: FrontTemplate::normalize(field(raw, "gold"), &fallback.gold),
            brown: FrontTemplate::normalize(field(raw, "brown"), &fallback.brown),
        }
    }
}

/// Normalize the shared admin logo rectangle
pub fn normalize_admin_logo(raw: &Value, fallback: &Rect) -> Rect {
    ADMIN_LOGO_RECT.resolve_value(raw, fallback)
}

impl Normalize for ShelfLayout {
    fn normalize(raw: &Value, fallback: &Self) -> Self {
        ShelfLayout {
            books: normalize_books(raw.get("books"), &fallback.books),
            templates: FrontTemplates::normalize(field(raw, "templates"), &fallback.templates),
            admin_logo: normalize_admin_logo(field(raw, "adminLogo"), &fallback.admin_logo),
        }
    }
}

impl Normalize for Rect {
    /// Plain percentage rectangle with full-range sizes
    fn normalize(raw: &Value, fallback: &Self) -> Self {
        let full = RectBounds::new(Bounds::PERCENT, Bounds::PERCENT);
        full.resolve_value(raw, fallback)
    }
}
