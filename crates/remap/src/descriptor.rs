//! Packet descriptors: the ordered field operations for one message id.

use std::fmt;
use std::sync::Arc;

use crate::cursor::{Packet, PacketCursor};
use crate::types::{FieldType, FieldValue};
use crate::{RemapError, Result};

/// Transform function over one field value.
///
/// Gets the decoded value plus the cursor, so it can read further fields,
/// queue synthetic messages or cancel. Returns the replacement value; its
/// kind must match the step's declared write type.
pub type TransformFn =
    Arc<dyn Fn(&mut PacketCursor, FieldValue) -> Result<FieldValue> + Send + Sync>;

/// Handler function with full cursor access.
pub type HandlerFn = Arc<dyn Fn(&mut PacketCursor) -> Result<()> + Send + Sync>;

/// One operation in a descriptor.
///
/// The set is closed: everything a descriptor can do to a message is one
/// of these three.
pub enum Step {
    /// Copy one field of the given type through unchanged.
    PassThrough(FieldType),
    /// Read as one type, run the function, write its result as another.
    Transform {
        read: FieldType,
        write: FieldType,
        func: TransformFn,
    },
    /// Run a function with full access to the cursor.
    Handler(HandlerFn),
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassThrough(ty) => f.debug_tuple("PassThrough").field(ty).finish(),
            Self::Transform { read, write, .. } => f
                .debug_struct("Transform")
                .field("read", read)
                .field("write", write)
                .finish_non_exhaustive(),
            Self::Handler(_) => f.write_str("Handler"),
        }
    }
}

/// The ordered field operations registered for one message id and
/// direction.
///
/// Built with chained calls at module activation and immutable afterwards;
/// one descriptor serves every connection on the pair concurrently.
pub struct PacketDescriptor {
    steps: Vec<Step>,
    mapped_id: Option<i32>,
}

impl PacketDescriptor {
    #[inline]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            mapped_id: None,
        }
    }

    /// Give the rewritten message a different id in the target schema.
    pub fn mapped_id(mut self, id: i32) -> Self {
        self.mapped_id = Some(id);
        self
    }

    /// Append a pass-through of one field.
    pub fn map(mut self, ty: FieldType) -> Self {
        self.steps.push(Step::PassThrough(ty));
        self
    }

    /// Append a value transform: read as `read`, write the function's
    /// result as `write`.
    pub fn transform<F>(mut self, read: FieldType, write: FieldType, func: F) -> Self
    where
        F: Fn(&mut PacketCursor, FieldValue) -> Result<FieldValue> + Send + Sync + 'static,
    {
        self.steps.push(Step::Transform {
            read,
            write,
            func: Arc::new(func),
        });
        self
    }

    /// Append a handler with full cursor access.
    pub fn handler<F>(mut self, func: F) -> Self
    where
        F: Fn(&mut PacketCursor) -> Result<()> + Send + Sync + 'static,
    {
        self.steps.push(Step::Handler(Arc::new(func)));
        self
    }

    /// Apply the descriptor to one message.
    ///
    /// Returns everything the message turned into: queued synthetics in
    /// emission order, then the rewritten message unless a step cancelled
    /// it. An error aborts this message only and emits nothing.
    pub fn remap(&self, packet: Packet) -> Result<Vec<Packet>> {
        let mut cursor = PacketCursor::new(packet);
        self.run(&mut cursor)?;
        Ok(cursor.finish(self.mapped_id))
    }

    pub(crate) fn run(&self, cursor: &mut PacketCursor) -> Result<()> {
        for step in &self.steps {
            if cursor.is_cancelled() {
                break;
            }
            match step {
                Step::PassThrough(ty) => {
                    let value = cursor.read(*ty)?;
                    cursor.write(value);
                }
                Step::Transform { read, write, func } => {
                    let value = cursor.read(*read)?;
                    let out = func(cursor, value)?;
                    if cursor.is_cancelled() {
                        continue;
                    }
                    if out.kind() != *write {
                        return Err(RemapError::TypeMismatch {
                            expected: *write,
                            actual: out.kind(),
                        });
                    }
                    cursor.write(out);
                }
                Step::Handler(func) => func(cursor)?,
            }
        }
        Ok(())
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

impl Default for PacketDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    use crate::types::{read_float, read_var_int, write_var_int};

    fn var_int_packet(id: i32, values: &[i32]) -> Packet {
        let mut body = BytesMut::new();
        for v in values {
            write_var_int(&mut body, *v);
        }
        Packet::new(id, body)
    }

    #[test]
    fn test_pass_through_reproduces_packet() {
        let descriptor = PacketDescriptor::new()
            .map(FieldType::VarInt)
            .map(FieldType::VarInt);

        let out = descriptor.remap(var_int_packet(1, &[5, 7])).unwrap();
        assert_eq!(out, vec![var_int_packet(1, &[5, 7])]);
    }

    #[test]
    fn test_transform_rewrites_value_and_type() {
        let descriptor = PacketDescriptor::new().transform(
            FieldType::VarInt,
            FieldType::Float,
            |_cursor, value| Ok(FieldValue::Float(value.as_var_int()? as f32 * 2.0)),
        );

        let out = descriptor.remap(var_int_packet(1, &[21])).unwrap();
        let mut body = BytesMut::from(out[0].body());
        assert_eq!(read_float(&mut body).unwrap(), 42.0);
    }

    #[test]
    fn test_transform_wrong_output_kind_fails() {
        let descriptor = PacketDescriptor::new().transform(
            FieldType::VarInt,
            FieldType::Float,
            |_cursor, value| Ok(value),
        );

        assert!(matches!(
            descriptor.remap(var_int_packet(1, &[5])),
            Err(RemapError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_cancel_stops_later_steps() {
        let descriptor = PacketDescriptor::new()
            .handler(|cursor| {
                cursor.cancel();
                Ok(())
            })
            // Would fail on the empty body if it ran.
            .map(FieldType::VarInt);

        let out = descriptor.remap(Packet::empty(1)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_cancelling_transform_emits_nothing() {
        let descriptor = PacketDescriptor::new().transform(
            FieldType::VarInt,
            FieldType::Float,
            |cursor, value| {
                cursor.cancel();
                // Kind no longer matters once cancelled.
                Ok(value)
            },
        );

        let out = descriptor.remap(var_int_packet(1, &[5])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_enum_shift_handler() {
        // Decrement every value above the removed index.
        const REMOVED: i32 = 2;
        let shift = || {
            PacketDescriptor::new()
                .map(FieldType::VarInt)
                .handler(|cursor| {
                    let value = cursor.get(FieldType::VarInt, 0)?.as_var_int()?;
                    if value > REMOVED {
                        cursor.set(FieldType::VarInt, 0, FieldValue::VarInt(value - 1))?;
                    }
                    Ok(())
                })
        };

        for (input, expected) in [(REMOVED + 1, REMOVED), (REMOVED, REMOVED), (0, 0)] {
            let out = shift().remap(var_int_packet(1, &[input])).unwrap();
            let mut body = BytesMut::from(out[0].body());
            assert_eq!(read_var_int(&mut body).unwrap(), expected);
        }
    }

    #[test]
    fn test_handler_error_aborts_message() {
        let descriptor = PacketDescriptor::new()
            .handler(|_cursor| Err(RemapError::InvalidData("bad state".into())));

        assert!(descriptor.remap(Packet::empty(1)).is_err());
    }

    #[test]
    fn test_handler_reads_tail_and_emits() {
        let descriptor = PacketDescriptor::new()
            .map(FieldType::VarInt)
            .handler(|cursor| {
                let extra = cursor.read(FieldType::VarInt)?.as_var_int()?;
                cursor.emit(var_int_packet(9, &[extra]));
                Ok(())
            });

        let out = descriptor.remap(var_int_packet(1, &[5, 77])).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id(), 9);
        let mut body = BytesMut::from(out[0].body());
        assert_eq!(read_var_int(&mut body).unwrap(), 77);
        assert_eq!(out[1], var_int_packet(1, &[5]));
    }

    #[test]
    fn test_mapped_id_applies_to_rewritten_only() {
        let descriptor = PacketDescriptor::new()
            .mapped_id(0x30)
            .map(FieldType::VarInt)
            .handler(|cursor| {
                cursor.emit(Packet::empty(9));
                Ok(())
            });

        let out = descriptor.remap(var_int_packet(1, &[5])).unwrap();
        assert_eq!(out[0].id(), 9);
        assert_eq!(out[1].id(), 0x30);
    }

    #[test]
    fn test_short_input_fails_step() {
        let descriptor = PacketDescriptor::new()
            .map(FieldType::VarInt)
            .map(FieldType::VarInt);

        assert!(matches!(
            descriptor.remap(var_int_packet(1, &[5])),
            Err(RemapError::ShortRead(FieldType::VarInt))
        ));
    }
}
