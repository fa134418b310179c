//! Placard Core - Foundational types for the placard creative checker
//!
//! This crate provides the types that all other placard crates depend on:
//! - `CanvasContext`, `Channel`, `ChannelProfile` - evaluation parameters
//! - `Rgb` and contrast helpers - WCAG luminance math
//! - `Rect`, `SnapPoint` and friends - percentage geometry and snapping
//! - `ContentHash` - scene snapshot fingerprints
//! - Error types and Result alias

mod channel;
mod color;
mod error;
pub mod geometry;
mod hash;

pub use channel::{
    BrandPolicy, CanvasContext, CanvasSize, Channel, ChannelProfile, RetailerPolicy, SafeZone,
    REFERENCE_HEIGHT,
};
pub use color::{
    contrast_ratio, meets_wcag_aa, required_ratio, suggested_text_color, Rgb,
    WCAG_AA_LARGE_TEXT, WCAG_AA_NORMAL_TEXT,
};
pub use error::{PlacardError, Result};
pub use geometry::{Rect, SnapAxis, SnapKind, SnapPoint, SnapResult};
pub use hash::ContentHash;
