//! # 1.9.3/1.10 Schema Packet Ids
//!
//! Ids for the messages the 1.11 -> 1.10 pair rewrites. Both sides of this
//! pair still use the 1.9.3 numbering, so one id set serves the old and
//! new schema alike; only payload layouts and id tables moved.
//!
//! Ids not listed here are identical in both schemas and copy through the
//! registry untouched.

/// Clientbound message ids this pair touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Clientbound {
    /// Chat message
    ///
    /// # Packet Format
    /// ```text
    /// {Component message}{Byte position}
    /// ```
    ///
    /// Position 2 renders above the hotbar; the title rewrite re-sends
    /// action-bar text through this message.
    ChatMessage = 0x0F,

    /// Named sound effect
    ///
    /// # Packet Format
    /// ```text
    /// {String sound key}{VarInt category}{Int x}{Int y}{Int z}{Float volume}{Float pitch}
    /// ```
    NamedSoundEffect = 0x19,

    /// Title
    ///
    /// # Packet Format
    /// ```text
    /// {VarInt action}{action-specific payload}
    /// ```
    ///
    /// The newer schema inserted a set-action-bar action at id 2 and
    /// shifted everything after it up by one.
    Title = 0x45,

    /// Sound effect, by numeric sound id
    ///
    /// # Packet Format
    /// ```text
    /// {VarInt sound id}{VarInt category}{Int x}{Int y}{Int z}{Float volume}{Float pitch}
    /// ```
    SoundEffect = 0x46,

    /// Collect item animation
    ///
    /// # Packet Format
    /// ```text
    /// {VarInt collected entity id}{VarInt collector entity id}{VarInt pickup count}
    /// ```
    ///
    /// The pickup count field exists only on the newer schema.
    CollectItem = 0x49,
}

impl Clientbound {
    /// The raw message id
    pub fn id(self) -> i32 {
        self as i32
    }
}

/// Serverbound message ids this pair touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Serverbound {
    /// Player block placement
    ///
    /// # Packet Format
    /// ```text
    /// {Position location}{VarInt face}{VarInt hand}{cursor x}{cursor y}{cursor z}
    /// ```
    ///
    /// The older schema sends the cursor offsets as 0-15 unsigned bytes;
    /// the newer one expects 0.0-1.0 floats.
    BlockPlacement = 0x1C,
}

impl Serverbound {
    /// The raw message id
    pub fn id(self) -> i32 {
        self as i32
    }
}
