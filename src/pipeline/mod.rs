//! Pipeline stages for record-to-note conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different thumbnail backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! filename ──▶ thumbnail ──▶ compose ──▶ template
//! (safe stem)  (JPEG ≤300px)  (blocks+tags) (substitution)
//! ```
//!
//! 1. [`filename`]  — sanitise the article title into a filesystem-safe stem
//! 2. [`thumbnail`] — rasterise/decode the source file and write a JPEG
//!    thumbnail; the only stage with side effects besides the final write
//! 3. [`compose`]   — derive the people/location blocks and the tag line
//! 4. [`template`]  — substitute all bindings into the note template
//!
//! The Note Writer in [`crate::import`] orchestrates the stages per record.

pub mod compose;
pub mod filename;
pub mod template;
pub mod thumbnail;
