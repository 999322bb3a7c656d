//! Packet flow direction

use serde::{Deserialize, Serialize};

/// Which way a message travels through the translation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Server to client.
    Clientbound = 0,
    /// Client to server.
    Serverbound = 1,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clientbound => "clientbound",
            Self::Serverbound => "serverbound",
        }
    }
}
