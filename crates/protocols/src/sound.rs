//! Sound packet rewrites, backed by the pair's mapping store.

use std::sync::Arc;

use backport_mappings::MappingStore;
use backport_remap::{FieldType, FieldValue, PacketDescriptor, RemapRegistry};

use crate::packets::Clientbound;

pub(crate) fn register(registry: &mut RemapRegistry, mappings: Arc<MappingStore>) {
    registry.register_clientbound(
        Clientbound::SoundEffect.id(),
        sound_effect(Arc::clone(&mappings)),
    );
    registry.register_clientbound(
        Clientbound::NamedSoundEffect.id(),
        named_sound_effect(mappings),
    );
}

/// Numeric sound ids go through the sound table. An id with no old-version
/// counterpart drops the whole message; playing a wrong sound is worse
/// than playing none.
fn sound_effect(mappings: Arc<MappingStore>) -> PacketDescriptor {
    PacketDescriptor::new().transform(FieldType::VarInt, FieldType::VarInt, move |cursor, value| {
        match mappings.get_old_id("sounds", value.as_var_int()?) {
            Some(mapped) => Ok(FieldValue::VarInt(mapped)),
            None => {
                cursor.cancel();
                Ok(value)
            }
        }
    })
    // Category, position, volume and pitch ride through unchanged.
}

/// Named sounds consult the key overrides and otherwise keep their key;
/// most sound names carry over between versions.
fn named_sound_effect(mappings: Arc<MappingStore>) -> PacketDescriptor {
    PacketDescriptor::new().transform(FieldType::String, FieldType::String, move |_cursor, value| {
        let mapped = mappings
            .mapped_sound(value.as_string()?)
            .map(str::to_owned);
        match mapped {
            Some(key) => Ok(FieldValue::String(key)),
            None => Ok(value),
        }
    })
}
