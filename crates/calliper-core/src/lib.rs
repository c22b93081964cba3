//! Calliper Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Calliper
//! dimension annotation engine and its front ends. It includes:
//!
//! - **Identifiers**: String-interned source element ids ([`identifier::SourceId`])
//! - **Colors**: CSS and packed RGBA color handling ([`color::Color`])
//! - **Geometry**: Planar types in document px ([`geometry`] module)
//! - **Elements**: The host element model handed to the engine ([`element`] module)
//! - **Shapes**: Classified closed/open outlines ([`shape`] module)
//! - **Draw**: Annotation lines, labels and layered SVG output ([`draw`] module)

pub mod color;
pub mod draw;
pub mod element;
pub mod geometry;
pub mod identifier;
pub mod shape;
