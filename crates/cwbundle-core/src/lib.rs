//! cwbundle Core Types and Definitions
//!
//! This crate provides the foundational types shared by the cwbundle library
//! and command-line tool. It includes:
//!
//! - **Blobs**: Named, static text payloads written verbatim to disk ([`blob::Blob`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Drawable primitives for the architecture diagram ([`draw`] module)

pub mod blob;
pub mod color;
pub mod draw;
pub mod geometry;
