//! BOM normalization and grouping pipeline.
//!
//! Takes the flat component list extracted from a KiCad schematic export
//! through verification, multipart expansion, misc-component synthesis and
//! grouping, then resolves each group to a supplier and emits one purchase
//! CSV per supplier. Every stage is a plain function over the component
//! list; non-fatal problems are accumulated in an [`IssueSink`] instead of
//! aborting the run.

pub mod component;
pub mod consolidate;
pub mod emit;
pub mod extract;
pub mod group;
pub mod issues;
pub mod misc;
pub mod multipart;
pub mod resolve;
pub mod verify;

pub use component::{category_of, BomEntry, Component, ComponentGroup};
pub use issues::{Issue, IssueSink};

/// Reserved MPN meaning "intentionally no purchasable part" (test points,
/// mounting holes). Components carrying it are verified but never ordered.
pub const NO_MPN: &str = "NO_MPN";

/// Pseudo-supplier for in-house sourced parts. Entries routed here are
/// emitted without any external catalog lookup.
pub const LAB_SUPPLIER: &str = "Lab";
