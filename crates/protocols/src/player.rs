//! Player-facing packet rewrites for the 1.11 -> 1.10 pair.

use backport_remap::{
    FieldType, FieldValue, Packet, PacketCursor, PacketDescriptor, RemapRegistry, Result,
};

use crate::packets::{Clientbound, Serverbound};

/// Title action the newer schema inserted; everything after it shifts.
const ACTION_SET_ACTION_BAR: i32 = 2;

/// Chat position byte for text rendered above the hotbar.
const CHAT_POSITION_ACTION_BAR: i8 = 2;

pub(crate) fn register(registry: &mut RemapRegistry) {
    registry.register_clientbound(Clientbound::Title.id(), title());
    registry.register_clientbound(Clientbound::CollectItem.id(), collect_item());
    registry.register_serverbound(Serverbound::BlockPlacement.id(), block_placement());
}

/// The newer schema added set-action-bar in the middle of the title action
/// enum. That action is re-sent as a positioned chat message the old
/// client understands; every later action slides down by one.
fn title() -> PacketDescriptor {
    PacketDescriptor::new()
        .map(FieldType::VarInt) // action
        .handler(|cursor| {
            let action = cursor.get(FieldType::VarInt, 0)?.as_var_int()?;

            if action == ACTION_SET_ACTION_BAR {
                let message = cursor.read(FieldType::Component)?;
                let mut chat = Packet::empty(Clientbound::ChatMessage.id());
                chat.write(&message);
                chat.write(&FieldValue::Byte(CHAT_POSITION_ACTION_BAR));
                cursor.emit(chat);
                cursor.cancel();
                return Ok(());
            }

            if action > ACTION_SET_ACTION_BAR {
                cursor.set(FieldType::VarInt, 0, FieldValue::VarInt(action - 1))?;
            }
            Ok(())
        })
}

/// The newer schema appended a pickup count the old client cannot parse.
fn collect_item() -> PacketDescriptor {
    PacketDescriptor::new()
        .map(FieldType::VarInt) // collected entity id
        .map(FieldType::VarInt) // collector entity id
        .handler(|cursor| cursor.read(FieldType::VarInt).map(|_| ())) // drop pickup count
}

/// Cursor offsets went from 0-15 unsigned bytes to unit floats.
fn block_placement() -> PacketDescriptor {
    PacketDescriptor::new()
        .map(FieldType::Position) // location
        .map(FieldType::VarInt) // face
        .map(FieldType::VarInt) // hand
        .transform(FieldType::UnsignedByte, FieldType::Float, to_unit_float)
        .transform(FieldType::UnsignedByte, FieldType::Float, to_unit_float)
        .transform(FieldType::UnsignedByte, FieldType::Float, to_unit_float)
}

fn to_unit_float(_cursor: &mut PacketCursor, value: FieldValue) -> Result<FieldValue> {
    Ok(FieldValue::Float(f32::from(value.as_unsigned_byte()?) / 15.0))
}
