//! The 1.11 -> 1.10 version-pair module.

use std::sync::Arc;

use backport_core::Result;
use backport_mappings::{IdMappings, MappingDocument, MappingStore, TableSpec};
use backport_remap::{RemapRegistry, TranslationModule};

use crate::{player, sound};

/// Older schema bridged by this module.
pub const OLD_VERSION: &str = "1.10";
/// Newer schema bridged by this module.
pub const NEW_VERSION: &str = "1.11";

/// Translation module letting 1.10 clients talk to a 1.11 peer.
///
/// Clientbound messages are rewritten into the 1.10 schema, serverbound
/// ones into the 1.11 schema. Built once at startup and shared by every
/// connection crossing the pair.
pub struct Protocol1_11To1_10 {
    mappings: Arc<MappingStore>,
    registry: RemapRegistry,
}

impl Protocol1_11To1_10 {
    /// Build the pair's mapping tables and register every descriptor.
    ///
    /// `shared_items` is the sibling upgrade module's item table, adopted
    /// instead of joining items locally so both modules read one table.
    ///
    /// Mapping failures here are fatal for the pair; the host should
    /// surface them at startup rather than run without the module.
    pub fn activate(
        old_doc: &MappingDocument,
        new_doc: &MappingDocument,
        diff_doc: Option<&MappingDocument>,
        shared_items: Option<Arc<IdMappings>>,
    ) -> Result<Self> {
        let mut specs = vec![TableSpec::array("sounds"), TableSpec::object("entities")];
        if let Some(items) = shared_items {
            specs.push(TableSpec::foreign("items", items));
        }
        let mappings = Arc::new(MappingStore::load(old_doc, new_doc, diff_doc, specs)?);

        let mut registry = RemapRegistry::new();
        player::register(&mut registry);
        sound::register(&mut registry, Arc::clone(&mappings));

        tracing::info!(
            "Activated {} -> {} translation ({} descriptors)",
            NEW_VERSION,
            OLD_VERSION,
            registry.descriptor_count()
        );

        Ok(Self { mappings, registry })
    }

    /// The identifier tables this module translates with.
    pub fn mappings(&self) -> &Arc<MappingStore> {
        &self.mappings
    }
}

impl TranslationModule for Protocol1_11To1_10 {
    fn old_version(&self) -> &str {
        OLD_VERSION
    }

    fn new_version(&self) -> &str {
        NEW_VERSION
    }

    fn registry(&self) -> &RemapRegistry {
        &self.registry
    }
}
