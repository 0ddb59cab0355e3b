// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::codec::Token;

/// Outcome of the coordinator's input checks, broadcast before any chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Fail,
}

/// A single carry bit crossing a chunk boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarryBit {
    #[default]
    Zero,
    One,
}

impl CarryBit {
    pub fn is_set(self) -> bool {
        self == CarryBit::One
    }

    pub fn as_u8(self) -> u8 {
        match self {
            CarryBit::Zero => 0,
            CarryBit::One => 1,
        }
    }
}

impl From<bool> for CarryBit {
    fn from(set: bool) -> Self {
        if set {
            CarryBit::One
        } else {
            CarryBit::Zero
        }
    }
}

impl TryFrom<u8> for CarryBit {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CarryBit::Zero),
            1 => Ok(CarryBit::One),
            other => Err(other),
        }
    }
}

/// Messages exchanged during one addition run.
///
/// | message            | direction                         |
/// |--------------------|-----------------------------------|
/// | `StatusBroadcast`  | coordinator -> every worker       |
/// | `ChunkAssignment`  | coordinator -> worker             |
/// | `CarrySignal`      | worker -> left (more significant) |
/// | `ResultChunk`      | worker -> coordinator             |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    StatusBroadcast {
        status: Status,
    },
    ChunkAssignment {
        chunk_length: usize,
        operand_a: Vec<Token>,
        operand_b: Vec<Token>,
    },
    CarrySignal {
        bit: u8,
    },
    /// The worker's finalized chunk plus its resolved carry-out. The carry-out
    /// of the most significant worker is the leading-digit signal.
    ResultChunk {
        tokens: Vec<Token>,
        carry_out: u8,
    },
}

impl Message {
    pub fn carry(bit: CarryBit) -> Self {
        Message::CarrySignal { bit: bit.as_u8() }
    }

    /// Message name for logs and protocol errors
    pub fn kind(&self) -> &'static str {
        match self {
            Message::StatusBroadcast { .. } => "StatusBroadcast",
            Message::ChunkAssignment { .. } => "ChunkAssignment",
            Message::CarrySignal { .. } => "CarrySignal",
            Message::ResultChunk { .. } => "ResultChunk",
        }
    }
}
