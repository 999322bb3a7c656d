//! # Descriptor Registry
//!
//! Routes in-flight messages to the descriptor registered for their id and
//! direction.
//!
//! # Architecture
//!
//! One registry exists per version-pair module. Registration happens while
//! the module activates and the registry is never mutated afterwards, so
//! translation is plain shared reads with no locking.
//!
//! # Performance
//!
//! - O(1) descriptor lookup via direct HashMap access
//! - Unregistered ids copy through without decoding a single field

use std::collections::HashMap;

use backport_core::Direction;

use crate::cursor::Packet;
use crate::descriptor::PacketDescriptor;
use crate::Result;

/// Registry of packet descriptors
///
/// # Purpose
/// Maintains the mapping from (direction, message id) to the descriptor
/// that rewrites such messages.
pub struct RemapRegistry {
    descriptors: HashMap<(Direction, i32), PacketDescriptor>,
}

impl RemapRegistry {
    /// Create a new empty registry
    #[inline]
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register the descriptor for a clientbound message id
    pub fn register_clientbound(&mut self, id: i32, descriptor: PacketDescriptor) {
        self.register(Direction::Clientbound, id, descriptor);
    }

    /// Register the descriptor for a serverbound message id
    pub fn register_serverbound(&mut self, id: i32, descriptor: PacketDescriptor) {
        self.register(Direction::Serverbound, id, descriptor);
    }

    /// Register a descriptor, replacing any previous one for the same id
    pub fn register(&mut self, direction: Direction, id: i32, descriptor: PacketDescriptor) {
        tracing::debug!(
            "Registered {} descriptor for id {:#04x} ({} steps)",
            direction.as_str(),
            id,
            descriptor.step_count()
        );
        self.descriptors.insert((direction, id), descriptor);
    }

    /// The descriptor for a message identity, if one is registered
    pub fn descriptor(&self, direction: Direction, id: i32) -> Option<&PacketDescriptor> {
        self.descriptors.get(&(direction, id))
    }

    /// Translate one message
    ///
    /// # Returns
    /// Every message this one turned into, in send order. Messages with no
    /// registered descriptor are identical in both schemas and come back
    /// untouched as a single element.
    ///
    /// # Errors
    /// A descriptor failure, which is scoped to this message. The caller
    /// drops the message and keeps the connection.
    pub fn translate(&self, direction: Direction, packet: Packet) -> Result<Vec<Packet>> {
        match self.descriptor(direction, packet.id()) {
            Some(descriptor) => descriptor.remap(packet),
            None => Ok(vec![packet]),
        }
    }

    /// Get the number of registered descriptors
    pub fn descriptor_count(&self) -> usize {
        self.descriptors.len()
    }
}

impl Default for RemapRegistry {
    fn default() -> Self {
        Self::new()
    }
}
