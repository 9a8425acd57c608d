//! Pipeline stages for recovering images from encoded text.
//!
//! Each submodule implements exactly one step, so every stage is testable
//! on its own and none of them touches another's state.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ codecs ──▶ classify
//! (file)    (strip ws)    (5 tries)  (full image decode)
//! ```
//!
//! 1. [`input`]    : read the encoded text from a file; the only stage with
//!    I/O, and it runs before the pipeline proper
//! 2. [`normalize`]: drop all whitespace
//! 3. [`codecs`]   : the ordered registry of base16/32/64/85/91 decoders
//! 4. [`classify`] : accept a decoded buffer only if it decodes as an image
//!
//! [`crate::decode::run_pipeline`] wires stages 2–4 together.

pub mod classify;
pub mod codecs;
pub mod input;
pub mod normalize;
