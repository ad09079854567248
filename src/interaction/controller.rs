//! Pointer-driven move/resize state machine

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use super::snap::{snap, DEFAULT_THRESHOLD};
use crate::geometry::defaults::{
    default_book, ADMIN_LOGO_RECT, BOOK_RECT, BUTTON_RECT, MAX_BOOKS, TEMPLATE_FRAME_RECT,
    TITLE_BOX_RECT,
};
use crate::geometry::{normalize_cover_window, BookItem, ButtonKind, Rect, ShelfLayout, Spine};
use crate::profile::{self, Namespace, ProfileKey};
use crate::units::{self, Unit};

/// Pixel size of a surface
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel size of a percentage rectangle inside this surface
    fn scaled(self, rect: &Rect) -> Size {
        Size::new(
            self.width * rect.width / 100.0,
            self.height * rect.height / 100.0,
        )
    }

    fn is_usable(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Editor tuning loaded from the `[editor]` config section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub snap_threshold: f64,
    pub nudge_step: f64,
    pub nudge_coarse_step: f64,
    /// Shelf canvas, the frame for books, the admin logo and nav arrows
    pub canvas: Size,
    /// Front-template preview surface
    pub template_preview: Size,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap_threshold: DEFAULT_THRESHOLD,
            nudge_step: 0.5,
            nudge_coarse_step: 5.0,
            canvas: Size::new(1200.0, 800.0),
            template_preview: Size::new(360.0, 540.0),
        }
    }
}

/// Shelf navigation arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Prev,
    Next,
}

impl Arrow {
    fn vars(self) -> (&'static str, &'static str) {
        match self {
            Arrow::Prev => ("nav-prev-x", "nav-prev-y"),
            Arrow::Next => ("nav-next-x", "nav-next-y"),
        }
    }
}

/// Something the editor can drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Book(usize),
    TitleBox(usize),
    FrontTemplate(Spine),
    CoverWindow(Spine),
    ActionButton(Spine, ButtonKind),
    AdminLogo,
    NavArrow(Arrow),
}

impl Target {
    /// Points can only be moved
    pub fn is_point(self) -> bool {
        matches!(self, Target::NavArrow(_))
    }
}

/// Resize handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Ne,
    Nw,
    Se,
    Sw,
}

impl Corner {
    /// Resize `anchor` by a percentage displacement, keeping the opposite
    /// edges fixed
    pub fn apply(self, anchor: &Rect, dx: f64, dy: f64) -> Rect {
        let (sx, sy) = match self {
            Corner::Se => (1.0, 1.0),
            Corner::Sw => (-1.0, 1.0),
            Corner::Ne => (1.0, -1.0),
            Corner::Nw => (-1.0, -1.0),
        };
        Rect {
            x: anchor.x + dx / 2.0,
            y: anchor.y + dy / 2.0,
            width: anchor.width + sx * dx,
            height: anchor.height + sy * dy,
        }
    }
}

/// A pointer sample in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

/// Snapshot taken when a gesture starts
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub target: Target,
    /// Geometry at gesture start; also the normalizer fallback
    pub anchor: Rect,
    pub origin: Pointer,
    /// Reference frame in pixels
    pub frame: Size,
}

/// The single in-flight interaction
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Moving(Gesture),
    Resizing { corner: Corner, gesture: Gesture },
}

impl Interaction {
    fn gesture(&self) -> Option<&Gesture> {
        match self {
            Interaction::Idle => None,
            Interaction::Moving(gesture) | Interaction::Resizing { gesture, .. } => Some(gesture),
        }
    }
}

/// Keyboard nudge direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn delta(self, step: f64) -> (f64, f64) {
        match self {
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
            Direction::Up => (0.0, -step),
            Direction::Down => (0.0, step),
        }
    }
}

/// In-memory edits not yet saved
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub shelf: ShelfLayout,
    pub nav_profile: ProfileKey,
    pub nav: BTreeMap<String, String>,
    pub dirty: bool,
}

/// Turns pointer and keyboard input into normalized draft geometry
#[derive(Debug, Clone)]
pub struct Controller {
    settings: EditorSettings,
    draft: Draft,
    state: Interaction,
    snapping: bool,
}

impl Controller {
    pub fn new(
        settings: EditorSettings,
        shelf: ShelfLayout,
        nav_profile: ProfileKey,
        nav: BTreeMap<String, String>,
    ) -> Self {
        Self {
            settings,
            draft: Draft {
                shelf,
                nav_profile,
                nav,
                dirty: false,
            },
            state: Interaction::Idle,
            snapping: false,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != Interaction::Idle
    }

    pub fn set_snapping(&mut self, enabled: bool) {
        self.snapping = enabled;
    }

    /// Replace the draft with freshly loaded data, dropping any gesture
    pub fn replace_draft(
        &mut self,
        shelf: ShelfLayout,
        nav_profile: ProfileKey,
        nav: BTreeMap<String, String>,
    ) {
        self.state = Interaction::Idle;
        self.draft = Draft {
            shelf,
            nav_profile,
            nav,
            dirty: false,
        };
    }

    /// Clear the dirty flag after a successful save
    pub fn mark_saved(&mut self) {
        self.draft.dirty = false;
    }

    /// Start moving `target`, replacing any active gesture.
    ///
    /// A start that cannot begin (missing target) returns `false` and
    /// leaves the current state untouched.
    pub fn begin_move(&mut self, target: Target, pointer: Pointer) -> bool {
        match self.gesture(target, pointer) {
            Some(gesture) => {
                self.state = Interaction::Moving(gesture);
                true
            }
            None => false,
        }
    }

    /// Start resizing `target` from `corner`; point targets cannot be resized.
    /// Rejected starts behave as in [`Controller::begin_move`].
    pub fn begin_resize(&mut self, target: Target, corner: Corner, pointer: Pointer) -> bool {
        if target.is_point() {
            return false;
        }
        match self.gesture(target, pointer) {
            Some(gesture) => {
                self.state = Interaction::Resizing { corner, gesture };
                true
            }
            None => false,
        }
    }

    /// Apply a pointer move; returns whether the draft changed
    pub fn pointer_move(&mut self, pointer: Pointer) -> bool {
        let Some(gesture) = self.state.gesture() else {
            return false;
        };
        if gesture.origin.id != pointer.id {
            return false;
        }
        let dx = (pointer.x - gesture.origin.x) / gesture.frame.width * 100.0;
        let dy = (pointer.y - gesture.origin.y) / gesture.frame.height * 100.0;
        let anchor = gesture.anchor;
        let target = gesture.target;

        let candidate = match &self.state {
            Interaction::Resizing { corner, .. } => corner.apply(&anchor, dx, dy),
            _ => {
                let mut moved = Rect {
                    x: anchor.x + dx,
                    y: anchor.y + dy,
                    ..anchor
                };
                if self.snapping {
                    moved.x = snap(moved.x, self.settings.snap_threshold);
                    moved.y = snap(moved.y, self.settings.snap_threshold);
                }
                moved
            }
        };
        let next = normalize_for(target, &candidate, &anchor);
        self.write(target, next);
        true
    }

    pub fn pointer_up(&mut self, id: u32) -> bool {
        self.finish(id)
    }

    pub fn pointer_cancel(&mut self, id: u32) -> bool {
        self.finish(id)
    }

    /// Move a target by one keyboard step; ignored during a gesture
    pub fn nudge(&mut self, target: Target, direction: Direction, coarse: bool) -> bool {
        if self.is_active() {
            return false;
        }
        let Some(anchor) = self.geometry(target) else {
            return false;
        };
        let step = if coarse {
            self.settings.nudge_coarse_step
        } else {
            self.settings.nudge_step
        };
        let (dx, dy) = direction.delta(step);
        let candidate = Rect {
            x: anchor.x + dx,
            y: anchor.y + dy,
            ..anchor
        };
        let next = normalize_for(target, &candidate, &anchor);
        self.write(target, next);
        self.draft.dirty = true;
        true
    }

    /// Append a default book when the shelf has room
    pub fn add_book(&mut self) -> bool {
        let books = &mut self.draft.shelf.books;
        if books.len() >= MAX_BOOKS {
            return false;
        }
        books.push(default_book(books.len()));
        self.draft.dirty = true;
        true
    }

    /// Remove a book from the draft
    pub fn remove_book(&mut self, index: usize) -> Option<BookItem> {
        if index >= self.draft.shelf.books.len() {
            return None;
        }
        // Book indices shift, so no gesture may outlive the removal.
        self.state = Interaction::Idle;
        self.draft.dirty = true;
        Some(self.draft.shelf.books.remove(index))
    }

    fn finish(&mut self, id: u32) -> bool {
        match self.state.gesture() {
            Some(gesture) if gesture.origin.id == id => {
                debug!("gesture on {:?} committed to draft", gesture.target);
                self.state = Interaction::Idle;
                self.draft.dirty = true;
                true
            }
            _ => false,
        }
    }

    fn gesture(&self, target: Target, pointer: Pointer) -> Option<Gesture> {
        let anchor = self.geometry(target)?;
        let frame = self.frame(target)?;
        frame.is_usable().then_some(Gesture {
            target,
            anchor,
            origin: pointer,
            frame,
        })
    }

    /// Current geometry of a target; points have zero size
    fn geometry(&self, target: Target) -> Option<Rect> {
        let shelf = &self.draft.shelf;
        match target {
            Target::Book(index) => shelf.books.get(index).map(BookItem::rect),
            Target::TitleBox(index) => shelf.books.get(index).map(|book| book.title_box),
            Target::FrontTemplate(spine) => Some(shelf.templates.get(spine).frame),
            Target::CoverWindow(spine) => Some(shelf.templates.get(spine).cover_window),
            Target::ActionButton(spine, kind) => {
                Some(shelf.templates.get(spine).button(kind).rect())
            }
            Target::AdminLogo => Some(shelf.admin_logo),
            Target::NavArrow(arrow) => {
                let (x_var, y_var) = arrow.vars();
                let x = profile::number_of(Namespace::Nav, &self.draft.nav, x_var)?;
                let y = profile::number_of(Namespace::Nav, &self.draft.nav, y_var)?;
                Some(Rect::new(x, y, 0.0, 0.0))
            }
        }
    }

    /// Reference frame of a target, in pixels
    fn frame(&self, target: Target) -> Option<Size> {
        let canvas = self.settings.canvas;
        let preview = self.settings.template_preview;
        let shelf = &self.draft.shelf;
        match target {
            Target::Book(_) | Target::AdminLogo | Target::NavArrow(_) => Some(canvas),
            Target::TitleBox(index) => shelf.books.get(index).map(|b| canvas.scaled(&b.rect())),
            Target::FrontTemplate(_) => Some(preview),
            Target::CoverWindow(spine) | Target::ActionButton(spine, _) => {
                Some(preview.scaled(&shelf.templates.get(spine).frame))
            }
        }
    }

    fn write(&mut self, target: Target, rect: Rect) {
        let shelf = &mut self.draft.shelf;
        match target {
            Target::Book(index) => {
                if let Some(book) = shelf.books.get_mut(index) {
                    book.set_rect(rect);
                }
            }
            Target::TitleBox(index) => {
                if let Some(book) = shelf.books.get_mut(index) {
                    book.title_box = rect;
                }
            }
            Target::FrontTemplate(spine) => shelf.templates.get_mut(spine).frame = rect,
            Target::CoverWindow(spine) => shelf.templates.get_mut(spine).cover_window = rect,
            Target::ActionButton(spine, kind) => {
                shelf.templates.get_mut(spine).button_mut(kind).set_rect(rect)
            }
            Target::AdminLogo => shelf.admin_logo = rect,
            Target::NavArrow(arrow) => {
                let (x_var, y_var) = arrow.vars();
                let mut raw: serde_json::Map<String, Value> = self
                    .draft
                    .nav
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                    .collect();
                raw.insert(x_var.into(), Value::String(units::format(Unit::Percent, rect.x)));
                raw.insert(y_var.into(), Value::String(units::format(Unit::Percent, rect.y)));
                self.draft.nav =
                    profile::merge(Namespace::Nav, self.draft.nav_profile, &Value::Object(raw));
            }
        }
    }
}

/// Run a candidate rectangle through the target's normalizer, falling back to `anchor`
fn normalize_for(target: Target, candidate: &Rect, anchor: &Rect) -> Rect {
    match target {
        Target::Book(_) => BOOK_RECT.clamp(candidate, anchor),
        Target::TitleBox(_) => TITLE_BOX_RECT.clamp(candidate, anchor),
        Target::FrontTemplate(_) => TEMPLATE_FRAME_RECT.clamp(candidate, anchor),
        Target::CoverWindow(_) => match serde_json::to_value(candidate) {
            Ok(raw) => normalize_cover_window(&raw, anchor),
            Err(_) => *anchor,
        },
        Target::ActionButton(..) => BUTTON_RECT.clamp(candidate, anchor),
        Target::AdminLogo => ADMIN_LOGO_RECT.clamp(candidate, anchor),
        // Nav positions are clamped by the variable merge.
        Target::NavArrow(_) => *candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::default_shelf;
    use crate::geometry::defaults::COVER_WINDOW_DEFAULT;

    const EPS: f64 = 1e-6;

    fn controller() -> Controller {
        let settings = EditorSettings {
            canvas: Size::new(1000.0, 500.0),
            template_preview: Size::new(400.0, 600.0),
            ..EditorSettings::default()
        };
        Controller::new(
            settings,
            default_shelf(),
            ProfileKey::Desktop,
            profile::defaults(Namespace::Nav, ProfileKey::Desktop),
        )
    }

    fn book(c: &Controller, index: usize) -> Rect {
        c.draft().shelf.books[index].rect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_move_book() {
        let mut c = controller();
        assert!(c.begin_move(Target::Book(0), Pointer::new(1, 100.0, 100.0)));
        assert!(c.pointer_move(Pointer::new(1, 200.0, 150.0)));
        let rect = book(&c, 0);
        assert_close(rect.x, 22.0);
        assert_close(rect.y, 60.0);
        assert_close(rect.width, 9.0);
    }

    #[test]
    fn test_move_is_relative_to_anchor() {
        let mut c = controller();
        c.begin_move(Target::Book(0), Pointer::new(1, 100.0, 100.0));
        c.pointer_move(Pointer::new(1, 300.0, 100.0));
        c.pointer_move(Pointer::new(1, 200.0, 100.0));
        assert_close(book(&c, 0).x, 22.0);
    }

    #[test]
    fn test_move_clamps_inside_canvas() {
        let mut c = controller();
        c.begin_move(Target::Book(0), Pointer::new(1, 0.0, 0.0));
        c.pointer_move(Pointer::new(1, 5000.0, -5000.0));
        let rect = book(&c, 0);
        assert_close(rect.x, 95.5);
        assert_close(rect.y, 18.0);
    }

    #[test]
    fn test_resize_se_keeps_top_left() {
        let mut c = controller();
        let before = book(&c, 1);
        c.begin_resize(Target::Book(1), Corner::Se, Pointer::new(7, 0.0, 0.0));
        c.pointer_move(Pointer::new(7, 50.0, 50.0));
        let after = book(&c, 1);
        assert_close(after.width, 14.0);
        assert_close(after.height, 46.0);
        assert_close(after.left(), before.left());
        assert_close(after.top(), before.top());
    }

    #[test]
    fn test_resize_nw_keeps_bottom_right() {
        let mut c = controller();
        let before = book(&c, 1);
        c.begin_resize(Target::Book(1), Corner::Nw, Pointer::new(7, 100.0, 100.0));
        c.pointer_move(Pointer::new(7, 50.0, 50.0));
        let after = book(&c, 1);
        assert_close(after.width, 14.0);
        assert_close(after.height, 46.0);
        assert_close(after.right(), before.right());
        assert_close(after.bottom(), before.bottom());
    }

    #[test]
    fn test_corner_formulas() {
        let anchor = Rect::new(50.0, 50.0, 20.0, 20.0);
        assert_eq!(Corner::Sw.apply(&anchor, 4.0, 6.0), Rect::new(52.0, 53.0, 16.0, 26.0));
        assert_eq!(Corner::Ne.apply(&anchor, 4.0, 6.0), Rect::new(52.0, 53.0, 24.0, 14.0));
    }

    #[test]
    fn test_resize_clamps_size() {
        let mut c = controller();
        c.begin_resize(Target::Book(0), Corner::Se, Pointer::new(1, 0.0, 0.0));
        c.pointer_move(Pointer::new(1, -500.0, -500.0));
        let rect = book(&c, 0);
        assert_close(rect.width, 4.0);
        assert_close(rect.height, 8.0);
    }

    #[test]
    fn test_other_pointer_ignored() {
        let mut c = controller();
        c.begin_move(Target::Book(0), Pointer::new(1, 0.0, 0.0));
        assert!(!c.pointer_move(Pointer::new(2, 100.0, 0.0)));
        assert_close(book(&c, 0).x, 12.0);
        assert!(!c.pointer_up(2));
        assert!(c.is_active());
    }

    #[test]
    fn test_pointer_up_commits_draft() {
        let mut c = controller();
        c.begin_move(Target::AdminLogo, Pointer::new(3, 0.0, 0.0));
        c.pointer_move(Pointer::new(3, -100.0, 0.0));
        assert!(!c.draft().dirty);
        assert!(c.pointer_up(3));
        assert_eq!(c.state(), &Interaction::Idle);
        assert!(c.draft().dirty);
        assert_close(c.draft().shelf.admin_logo.x, 80.0);
    }

    #[test]
    fn test_new_gesture_replaces_active_one() {
        let mut c = controller();
        c.begin_move(Target::Book(0), Pointer::new(1, 0.0, 0.0));
        c.begin_resize(Target::AdminLogo, Corner::Se, Pointer::new(2, 0.0, 0.0));
        match c.state() {
            Interaction::Resizing { gesture, .. } => assert_eq!(gesture.target, Target::AdminLogo),
            other => panic!("unexpected state {:?}", other),
        }
        assert!(!c.pointer_move(Pointer::new(1, 50.0, 0.0)));
    }

    #[test]
    fn test_missing_target_does_not_start() {
        let mut c = controller();
        assert!(!c.begin_move(Target::Book(9), Pointer::new(1, 0.0, 0.0)));
        assert!(!c.begin_resize(Target::NavArrow(Arrow::Prev), Corner::Se, Pointer::new(1, 0.0, 0.0)));
        assert!(!c.is_active());
    }

    #[test]
    fn test_rejected_start_keeps_active_gesture() {
        let mut c = controller();
        assert!(c.begin_move(Target::Book(0), Pointer::new(1, 100.0, 100.0)));
        assert!(!c.begin_move(Target::Book(9), Pointer::new(2, 0.0, 0.0)));
        assert!(!c.begin_resize(Target::NavArrow(Arrow::Next), Corner::Ne, Pointer::new(3, 0.0, 0.0)));
        match c.state() {
            Interaction::Moving(gesture) => {
                assert_eq!(gesture.target, Target::Book(0));
                assert_eq!(gesture.origin.id, 1);
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert!(c.pointer_move(Pointer::new(1, 200.0, 150.0)));
        assert_close(book(&c, 0).x, 22.0);
    }

    #[test]
    fn test_title_box_uses_book_frame() {
        let mut c = controller();
        // Book 0 is 9% x 36% of a 1000x500 canvas: 90x180 px.
        c.begin_move(Target::TitleBox(0), Pointer::new(1, 0.0, 0.0));
        c.pointer_move(Pointer::new(1, 4.5, 18.0));
        let title = c.draft().shelf.books[0].title_box;
        assert_close(title.x, 55.0);
        assert_close(title.y, 30.0);
    }

    #[test]
    fn test_button_uses_template_frame() {
        let mut c = controller();
        let before = c.draft().shelf.templates.gold.sample_button.rect();
        let frame = c.draft().shelf.templates.gold.frame;
        let frame_px = 400.0 * frame.width / 100.0;
        c.begin_move(
            Target::ActionButton(Spine::Gold, ButtonKind::Sample),
            Pointer::new(1, 0.0, 0.0),
        );
        c.pointer_move(Pointer::new(1, frame_px / 10.0, 0.0));
        let after = c.draft().shelf.templates.gold.sample_button.rect();
        assert_close(after.x, before.x + 10.0);
    }

    #[test]
    fn test_snapping_before_clamp() {
        let mut c = controller();
        c.set_snapping(true);
        c.begin_move(Target::Book(0), Pointer::new(1, 0.0, 0.0));
        // 12 + 37.2 = 49.2, within 1.5 of the 50 guide
        c.pointer_move(Pointer::new(1, 372.0, 0.0));
        assert_close(book(&c, 0).x, 50.0);

        c.set_snapping(false);
        c.pointer_move(Pointer::new(1, 372.0, 0.0));
        assert_close(book(&c, 0).x, 49.2);
    }

    #[test]
    fn test_nav_arrow_writes_variables() {
        let mut c = controller();
        assert_eq!(c.draft().nav["nav-prev-x"], "4%");
        c.begin_move(Target::NavArrow(Arrow::Prev), Pointer::new(1, 0.0, 0.0));
        c.pointer_move(Pointer::new(1, 100.0, -5000.0));
        assert_eq!(c.draft().nav["nav-prev-x"], "14%");
        assert_eq!(c.draft().nav["nav-prev-y"], "0%");
        assert_eq!(c.draft().nav["nav-next-x"], "96%");
    }

    #[test]
    fn test_nudge_steps() {
        let mut c = controller();
        assert!(c.nudge(Target::Book(0), Direction::Right, false));
        assert_close(book(&c, 0).x, 12.5);
        assert!(c.nudge(Target::Book(0), Direction::Down, true));
        assert_close(book(&c, 0).y, 55.0);
        assert!(c.draft().dirty);
    }

    #[test]
    fn test_nudge_ignored_during_gesture() {
        let mut c = controller();
        c.begin_move(Target::Book(1), Pointer::new(1, 0.0, 0.0));
        assert!(!c.nudge(Target::Book(0), Direction::Left, false));
        assert_close(book(&c, 0).x, 12.0);
    }

    #[test]
    fn test_cover_window_resize_snaps_legacy_shape() {
        let mut c = controller();
        c.draft.shelf.templates.gold.cover_window = Rect::new(50.0, 51.5, 70.0, 80.0);
        let frame = c.draft().shelf.templates.gold.frame;
        let frame_h = 600.0 * frame.height / 100.0;
        c.begin_resize(Target::CoverWindow(Spine::Gold), Corner::Se, Pointer::new(1, 0.0, 0.0));
        // Shrinking by 3% lands on the old {50,50,70,77} default.
        c.pointer_move(Pointer::new(1, 0.0, -frame_h * 0.03));
        assert_eq!(c.draft().shelf.templates.gold.cover_window, COVER_WINDOW_DEFAULT);
    }

    #[test]
    fn test_remove_and_add_book() {
        let mut c = controller();
        let removed = c.remove_book(0).unwrap();
        assert_eq!(removed.key, "book-1");
        assert_eq!(c.draft().shelf.books.len(), 2);
        assert!(c.remove_book(5).is_none());
        while c.add_book() {}
        assert_eq!(c.draft().shelf.books.len(), MAX_BOOKS);
    }

    #[test]
    fn test_replace_draft_resets() {
        let mut c = controller();
        c.begin_move(Target::Book(0), Pointer::new(1, 0.0, 0.0));
        c.nudge(Target::AdminLogo, Direction::Up, false);
        c.replace_draft(
            default_shelf(),
            ProfileKey::MobilePortrait,
            profile::defaults(Namespace::Nav, ProfileKey::MobilePortrait),
        );
        assert!(!c.is_active());
        assert!(!c.draft().dirty);
        assert_eq!(c.draft().nav["nav-prev-x"], "8%");
    }
}
