//! Core geometry entities
//!
//! All coordinates are percentages of the containing frame. Rectangles are
//! center-anchored: `x`/`y` name the center, not the top-left corner.

use serde::{Deserialize, Serialize};

/// A center-anchored rectangle in percent of its parent frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Largest per-component difference to another rectangle
    pub fn max_delta(&self, other: &Rect) -> f64 {
        (self.x - other.x)
            .abs()
            .max((self.y - other.y).abs())
            .max((self.width - other.width).abs())
            .max((self.height - other.height).abs())
    }
}

/// A single clickable labeled point on a content page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub key: String,
    pub x_percent: f64,
    pub y_percent: f64,
    pub label: String,
    pub target_path: String,
    pub font_size_vw: f64,
}

/// Visual template family of a book spine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spine {
    Gold,
    Brown,
}

impl Spine {
    pub const ALL: [Spine; 2] = [Spine::Gold, Spine::Brown];

    pub fn as_str(self) -> &'static str {
        match self {
            Spine::Gold => "gold",
            Spine::Brown => "brown",
        }
    }

    /// Exact literal match only
    pub fn from_literal(value: &str) -> Option<Spine> {
        match value {
            "gold" => Some(Spine::Gold),
            "brown" => Some(Spine::Brown),
            _ => None,
        }
    }
}

/// Font family used for a book title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleFont {
    Serif,
    Sans,
    Display,
    Script,
}

impl TitleFont {
    pub fn from_literal(value: &str) -> Option<TitleFont> {
        match value {
            "serif" => Some(TitleFont::Serif),
            "sans" => Some(TitleFont::Sans),
            "display" => Some(TitleFont::Display),
            "script" => Some(TitleFont::Script),
            _ => None,
        }
    }
}

/// Kind of media a book link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    None,
    Pdf,
    Epub,
    Images,
    Link,
}

impl MediaType {
    pub fn from_literal(value: &str) -> Option<MediaType> {
        match value {
            "none" => Some(MediaType::None),
            "pdf" => Some(MediaType::Pdf),
            "epub" => Some(MediaType::Epub),
            "images" => Some(MediaType::Images),
            "link" => Some(MediaType::Link),
            _ => None,
        }
    }
}

/// A book placed on a shelf page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookItem {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub target_path: String,
    pub spine: Spine,
    pub title_font: TitleFont,
    pub title_size_vw: f64,
    pub title_color: String,
    /// Title placement relative to the book's own rectangle
    pub title_box: Rect,
    pub cover_url: String,
    pub sample_url: String,
    pub sample_type: MediaType,
    pub info_url: String,
    pub info_type: MediaType,
    pub full_book_url: String,
    pub full_book_type: MediaType,
    pub hide_first_pages: u32,
    pub max_pages: u32,
}

impl BookItem {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Copy of this book with every content field emptied and geometry kept
    pub fn geometry_only(&self) -> BookItem {
        BookItem {
            label: String::new(),
            target_path: String::new(),
            cover_url: String::new(),
            sample_url: String::new(),
            info_url: String::new(),
            full_book_url: String::new(),
            ..self.clone()
        }
    }
}

/// Which call-to-action button of a front template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Sample,
    Info,
}

/// Call-to-action button placement inside a front template frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionButtonTemplate {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub font_size_vw: f64,
}

impl ActionButtonTemplate {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }
}

/// Overlay rendered over the open book for one spine variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontTemplate {
    /// Frame relative to the template preview
    pub frame: Rect,
    /// Cover image window relative to `frame`
    pub cover_window: Rect,
    pub sample_button: ActionButtonTemplate,
    pub info_button: ActionButtonTemplate,
}

impl FrontTemplate {
    pub fn button(&self, kind: ButtonKind) -> &ActionButtonTemplate {
        match kind {
            ButtonKind::Sample => &self.sample_button,
            ButtonKind::Info => &self.info_button,
        }
    }

    pub fn button_mut(&mut self, kind: ButtonKind) -> &mut ActionButtonTemplate {
        match kind {
            ButtonKind::Sample => &mut self.sample_button,
            ButtonKind::Info => &mut self.info_button,
        }
    }
}

/// One front template per spine variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontTemplates {
    pub gold: FrontTemplate,
    pub brown: FrontTemplate,
}

impl FrontTemplates {
    pub fn get(&self, spine: Spine) -> &FrontTemplate {
        match spine {
            Spine::Gold => &self.gold,
            Spine::Brown => &self.brown,
        }
    }

    pub fn get_mut(&mut self, spine: Spine) -> &mut FrontTemplate {
        match spine {
            Spine::Gold => &mut self.gold,
            Spine::Brown => &mut self.brown,
        }
    }
}

/// Everything positioned on a shelf page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfLayout {
    pub books: Vec<BookItem>,
    pub templates: FrontTemplates,
    /// Shared admin logo placement, relative to the canvas
    pub admin_logo: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(50.0, 40.0, 20.0, 10.0);
        assert_eq!(r.left(), 40.0);
        assert_eq!(r.right(), 60.0);
        assert_eq!(r.top(), 35.0);
        assert_eq!(r.bottom(), 45.0);
    }

    #[test]
    fn test_enum_literals_are_exact() {
        assert_eq!(Spine::from_literal("gold"), Some(Spine::Gold));
        assert_eq!(Spine::from_literal("Gold"), None);
        assert_eq!(TitleFont::from_literal("script"), Some(TitleFont::Script));
        assert_eq!(MediaType::from_literal(" pdf"), None);
    }

    #[test]
    fn test_spine_serializes_lowercase() {
        let json = serde_json::to_string(&Spine::Brown).unwrap();
        assert_eq!(json, "\"brown\"");
    }
}
