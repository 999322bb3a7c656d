//! The version-pair module boundary.

use backport_core::Direction;

use crate::cursor::Packet;
use crate::registry::RemapRegistry;
use crate::Result;

/// One activated version-pair translation module.
///
/// A host keeps one module per adjacent version pair and feeds it the
/// messages of every connection crossing that pair. Modules are immutable
/// once activated, so sharing them across connections needs no locking.
pub trait TranslationModule: Send + Sync {
    /// Version name of the older protocol schema.
    fn old_version(&self) -> &str;

    /// Version name of the newer protocol schema.
    fn new_version(&self) -> &str;

    /// The descriptors this module registered at activation.
    fn registry(&self) -> &RemapRegistry;

    /// Translate one message between the pair's schemas.
    fn translate(&self, direction: Direction, packet: Packet) -> Result<Vec<Packet>> {
        self.registry().translate(direction, packet)
    }
}
