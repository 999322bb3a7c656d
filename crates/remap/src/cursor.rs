//! Per-message read/write state for descriptor execution.

use bytes::BytesMut;

use crate::types::{FieldType, FieldValue};
use crate::{RemapError, Result};

/// A raw protocol message: numeric id plus undecoded field bytes.
///
/// The pipeline never decodes more of a message than its descriptor names;
/// everything else stays opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    id: i32,
    body: BytesMut,
}

impl Packet {
    pub fn new(id: i32, body: BytesMut) -> Self {
        Self { id, body }
    }

    /// An empty message ready for typed writes. Synthetic messages start
    /// here.
    pub fn empty(id: i32) -> Self {
        Self {
            id,
            body: BytesMut::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Append one typed field to the body.
    pub fn write(&mut self, value: &FieldValue) {
        value.encode(&mut self.body);
    }

    pub fn into_body(self) -> BytesMut {
        self.body
    }
}

/// Read/write cursor threading one in-flight message through a
/// descriptor's steps.
///
/// Reads consume the original body front to back; writes build the
/// rewritten field sequence. The two positions advance independently, so a
/// step can read a field and simply not write it, which drops the field
/// from the output.
pub struct PacketCursor {
    id: i32,
    input: BytesMut,
    written: Vec<FieldValue>,
    pending: Vec<Packet>,
    cancelled: bool,
}

impl PacketCursor {
    pub fn new(packet: Packet) -> Self {
        Self {
            id: packet.id,
            input: packet.body,
            written: Vec::new(),
            pending: Vec::new(),
            cancelled: false,
        }
    }

    /// Id of the message being rewritten.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Consume and decode the next field from the unread input.
    pub fn read(&mut self, ty: FieldType) -> Result<FieldValue> {
        ty.read(&mut self.input)
    }

    /// Append a field to the rewritten output.
    ///
    /// Writes after a cancel are dropped; a cancelled message emits
    /// nothing.
    pub fn write(&mut self, value: FieldValue) {
        if !self.cancelled {
            self.written.push(value);
        }
    }

    /// The `index`-th written field of the given type.
    ///
    /// Indexes count per type: `get(VarInt, 1)` is the second VarInt
    /// written so far, whatever sits between.
    pub fn get(&self, ty: FieldType, index: usize) -> Result<&FieldValue> {
        self.written
            .iter()
            .filter(|value| value.kind() == ty)
            .nth(index)
            .ok_or(RemapError::NoSuchField { ty, index })
    }

    /// Replace the `index`-th written field of the given type.
    pub fn set(&mut self, ty: FieldType, index: usize, value: FieldValue) -> Result<()> {
        if value.kind() != ty {
            return Err(RemapError::TypeMismatch {
                expected: ty,
                actual: value.kind(),
            });
        }
        let slot = self
            .written
            .iter_mut()
            .filter(|value| value.kind() == ty)
            .nth(index)
            .ok_or(RemapError::NoSuchField { ty, index })?;
        *slot = value;
        Ok(())
    }

    /// Suppress the message being rewritten.
    ///
    /// Later steps do not run and nothing is emitted for the original.
    /// Synthetic messages already queued still go out.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Queue a synthetic message, sent ahead of the rewritten one.
    pub fn emit(&mut self, packet: Packet) {
        self.pending.push(packet);
    }

    /// Bytes of input no step has consumed yet.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Conclude processing: queued synthetics in emission order, then the
    /// rewritten message unless cancelled.
    ///
    /// Input bytes no step consumed are copied through unchanged, so a
    /// descriptor only has to name the fields up to the last one it
    /// touches.
    pub(crate) fn finish(self, mapped_id: Option<i32>) -> Vec<Packet> {
        let mut out = self.pending;
        if !self.cancelled {
            let mut body = BytesMut::with_capacity(self.input.len());
            for value in &self.written {
                value.encode(&mut body);
            }
            body.extend_from_slice(&self.input);
            out.push(Packet::new(mapped_id.unwrap_or(self.id), body));
        }
        out
    }
}
