//! # Backport Protocols
//!
//! Concrete version-pair translation modules, wired from the mapping store
//! and the remap pipeline. A host embedding these picks the module chain
//! for a connection's version and feeds it messages by direction.
//!
//! ## Current Pairs
//! - [`Protocol1_11To1_10`]: 1.10 clients against a 1.11 peer
//!
//! ## Module Anatomy
//!
//! Each pair owns a [`backport_mappings::MappingStore`] built from its
//! version documents and a [`backport_remap::RemapRegistry`] of packet
//! descriptors. Both are built once at activation; translation afterwards
//! is lock-free shared reads.

pub mod packets;
mod player;
mod sound;
pub mod v1_11;

pub use v1_11::{Protocol1_11To1_10, NEW_VERSION, OLD_VERSION};
