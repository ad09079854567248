//! Clamp tables and default entities for each geometry family

use super::clamp::{Bounds, RectBounds};
use super::types::{
    ActionButtonTemplate, BookItem, FrontTemplate, FrontTemplates, Hotspot, MediaType, Rect,
    ShelfLayout, Spine, TitleFont,
};

/// Maximum number of books on one shelf
pub const MAX_BOOKS: usize = 8;

/// Labels longer than this are truncated
pub const MAX_LABEL_CHARS: usize = 120;

pub const HOTSPOT_POSITION: Bounds = Bounds::PERCENT;
pub const HOTSPOT_FONT_VW: Bounds = Bounds::new(0.6, 4.0);

pub const BOOK_RECT: RectBounds = RectBounds::new(Bounds::new(4.0, 40.0), Bounds::new(8.0, 90.0));
pub const TITLE_BOX_RECT: RectBounds =
    RectBounds::new(Bounds::new(10.0, 100.0), Bounds::new(5.0, 100.0));
pub const TITLE_SIZE_VW: Bounds = Bounds::new(0.6, 5.0);
pub const HIDE_FIRST_PAGES: Bounds = Bounds::new(0.0, 50.0);
pub const MAX_PAGES: Bounds = Bounds::new(0.0, 5000.0);

pub const TEMPLATE_FRAME_RECT: RectBounds =
    RectBounds::new(Bounds::new(30.0, 100.0), Bounds::new(30.0, 100.0));
pub const COVER_WINDOW_RECT: RectBounds =
    RectBounds::new(Bounds::new(20.0, 100.0), Bounds::new(20.0, 100.0));
pub const BUTTON_RECT: RectBounds =
    RectBounds::new(Bounds::new(10.0, 60.0), Bounds::new(4.0, 20.0));
pub const BUTTON_FONT_VW: Bounds = Bounds::new(0.6, 3.0);

pub const ADMIN_LOGO_RECT: RectBounds =
    RectBounds::new(Bounds::new(4.0, 24.0), Bounds::new(4.0, 24.0));

/// Canonical cover window shape
pub const COVER_WINDOW_DEFAULT: Rect = Rect::new(50.0, 50.0, 100.0, 92.0);

/// Defaults shipped by earlier releases; saved copies of these snap to
/// [`COVER_WINDOW_DEFAULT`]
pub const COVER_WINDOW_LEGACY: [Rect; 2] = [
    Rect::new(50.0, 50.0, 70.0, 77.0),
    Rect::new(50.0, 48.0, 76.0, 84.0),
];

/// Max per-component distance for a legacy match
pub const COVER_WINDOW_SNAP_EPSILON: f64 = 0.5;

pub const ADMIN_LOGO_DEFAULT: Rect = Rect::new(90.0, 10.0, 12.0, 12.0);

/// Built-in content pages and their hotspot anchor
const PAGE_HOTSPOTS: &[(&str, f64, f64, &str)] = &[
    ("creating", 26.0, 18.0, "Creating"),
    ("reading", 72.0, 18.0, "Reading"),
    ("about", 50.0, 82.0, "About"),
    ("contact", 84.0, 64.0, "Contact"),
];

/// Default hotspot for a page key
pub fn default_hotspot(page_key: &str) -> Hotspot {
    let known = PAGE_HOTSPOTS.iter().find(|(key, ..)| *key == page_key);
    let (x, y, label) = match known {
        Some((_, x, y, label)) => (*x, *y, (*label).to_string()),
        None => (50.0, 50.0, title_case(page_key)),
    };
    Hotspot {
        key: page_key.to_string(),
        x_percent: x,
        y_percent: y,
        label,
        target_path: format!("/{}", page_key),
        font_size_vw: 1.4,
    }
}

fn title_case(key: &str) -> String {
    key.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Default book for slot `index` (books are spread left to right)
pub fn default_book(index: usize) -> BookItem {
    let slot = index as f64;
    BookItem {
        key: format!("book-{}", index + 1),
        x: 12.0 + slot * 10.5,
        y: 50.0,
        width: 9.0,
        height: 36.0,
        label: format!("Book {}", index + 1),
        target_path: "/".to_string(),
        spine: if index % 2 == 0 {
            Spine::Gold
        } else {
            Spine::Brown
        },
        title_font: TitleFont::Serif,
        title_size_vw: 1.2,
        title_color: "#f5e6c8".to_string(),
        title_box: Rect::new(50.0, 20.0, 80.0, 24.0),
        cover_url: String::new(),
        sample_url: String::new(),
        sample_type: MediaType::None,
        info_url: String::new(),
        info_type: MediaType::None,
        full_book_url: String::new(),
        full_book_type: MediaType::None,
        hide_first_pages: 0,
        max_pages: 0,
    }
}

fn default_button(x: f64, label: &str) -> ActionButtonTemplate {
    ActionButtonTemplate {
        x,
        y: 94.0,
        width: 40.0,
        height: 8.0,
        label: label.to_string(),
        font_size_vw: 1.1,
    }
}

pub fn default_front_template(spine: Spine) -> FrontTemplate {
    let frame = match spine {
        Spine::Gold => Rect::new(50.0, 50.0, 92.0, 94.0),
        Spine::Brown => Rect::new(50.0, 50.0, 90.0, 92.0),
    };
    FrontTemplate {
        frame,
        cover_window: COVER_WINDOW_DEFAULT,
        sample_button: default_button(28.0, "Read a sample"),
        info_button: default_button(72.0, "More info"),
    }
}

pub fn default_front_templates() -> FrontTemplates {
    FrontTemplates {
        gold: default_front_template(Spine::Gold),
        brown: default_front_template(Spine::Brown),
    }
}

/// Default shelf: three books, both templates, and the admin logo
pub fn default_shelf() -> ShelfLayout {
    ShelfLayout {
        books: (0..3).map(default_book).collect(),
        templates: default_front_templates(),
        admin_logo: ADMIN_LOGO_DEFAULT,
    }
}
