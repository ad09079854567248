//! Interactive editing
//!
//! A single [`Interaction`] value tracks the one gesture in flight, so two
//! targets can never be dragged at once. Every pointer move recomputes the
//! target's geometry from its anchor snapshot and runs it through the
//! normalizer before it reaches the [`Draft`]. Nothing is persisted until
//! [`EditorSession::save`].

pub mod controller;
pub mod session;
pub mod snap;

pub use controller::{
    Arrow, Controller, Corner, Direction, Draft, EditorSettings, Gesture, Interaction, Pointer,
    Size, Target,
};
pub use session::{fetch_draft, EditorSession, LoadTicket, LoadedDraft, Selection};
