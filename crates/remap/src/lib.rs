//! # Backport Remap Pipeline
//!
//! This library implements declarative per-message rewriting between two
//! adjacent protocol schemas. A version-pair module registers one
//! descriptor per message id it cares about; everything else copies
//! through untouched.
//!
//! ## Architecture
//!
//! The pipeline is organized into several layers:
//!
//! ### 1. Field Codecs ([`types`])
//! Wire types and their binary encodings:
//! - Big-endian scalars (Boolean through Double)
//! - VarInt: 1-5 byte variable-length integer
//! - String: VarInt length-prefixed UTF-8
//! - Component: a String holding JSON chat text
//! - Position: block coordinates packed into one u64
//!
//! ### 2. Cursor ([`cursor`])
//! Per-message read/write state. Reads consume the original body, writes
//! build the rewritten one, and the unread tail copies through unchanged.
//! Cancellation and synthetic emission live here too.
//!
//! ### 3. Descriptors ([`descriptor`])
//! The ordered operations for one message id: pass-throughs, typed value
//! transforms and free-form handlers, built with chained calls.
//!
//! ### 4. Registry ([`registry`])
//! Routes (direction, id) to the registered descriptor and applies it.
//!
//! ## Usage Example
//!
//! ```rust
//! use backport_remap::{FieldType, FieldValue, PacketDescriptor};
//!
//! // Rescale a byte field to the float form the newer schema uses.
//! let descriptor = PacketDescriptor::new()
//!     .map(FieldType::VarInt)
//!     .transform(FieldType::UnsignedByte, FieldType::Float, |_cursor, value| {
//!         Ok(FieldValue::Float(value.as_unsigned_byte()? as f32 / 15.0))
//!     });
//! ```
//!
//! ## Error Scope
//!
//! Every failure in this crate is scoped to the one message being
//! rewritten. The caller drops that message and keeps the connection.

pub mod cursor;
pub mod descriptor;
pub mod error;
pub mod module;
pub mod registry;
pub mod types;

// Re-export commonly used items
pub use cursor::*;
pub use descriptor::*;
pub use error::*;
pub use module::*;
pub use registry::*;
pub use types::*;
