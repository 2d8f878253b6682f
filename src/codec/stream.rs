/// The stream assembler: the ordered output buffer.
///
/// Packets land here in strict emission order; the position of a packet
/// in the buffer IS its time slot, since a compliant player consumes
/// exactly one 24-byte unit per tick. Padding is therefore a
/// data-shaping operation, not a wait.

use crate::codec::packet::{self, Instruction, NO_OP, PACKET_SIZE};
use crate::error::CdgError;

/// Playback ticks per second — one packet slot each (~6.6 ms) at the
/// format's fixed 28,800 bit/s rate.
pub const TICKS_PER_SECOND: u32 = 150;

/// Append-only packet buffer for one encoding session.
#[derive(Default)]
pub struct StreamAssembler {
    buffer: Vec<u8>,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with an empty one. Idempotent.
    pub fn clear(&mut self) {
        self.buffer = Vec::new();
    }

    /// Snapshot of everything appended so far; later appends do not
    /// retroactively alter a returned copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    /// Number of packet slots emitted so far.
    pub fn packet_count(&self) -> usize {
        self.buffer.len() / PACKET_SIZE
    }

    /// Encode and append one packet.
    pub fn push(&mut self, instruction: Instruction, payload: &[u8]) -> Result<(), CdgError> {
        let packet = packet::encode_packet(instruction, payload)?;
        self.buffer.extend_from_slice(&packet);
        Ok(())
    }

    /// Append an already-encoded packet.
    pub fn push_raw(&mut self, packet: [u8; PACKET_SIZE]) {
        self.buffer.extend_from_slice(&packet);
    }

    /// Append `ticks` silent slots.
    pub fn delay_ticks(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.buffer.extend_from_slice(&NO_OP);
        }
    }

    /// Append `seconds` worth of silent slots.
    pub fn delay_seconds(&mut self, seconds: u32) {
        self.delay_ticks(seconds * TICKS_PER_SECOND);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
