use alloc::vec::Vec;

use etls_core::{EtlsError, EtlsResult};

/// Largest TLS-Message-Length a peer may declare. Bounds what a single
/// conversation can make us buffer; real certificate chains fit easily.
pub const MAX_MESSAGE_LEN: usize = 65536;

/// Accumulates the fragments of one inbound TLS message.
///
/// The peer-declared TLS-Message-Length is trusted only on the first
/// fragment; a length field reappearing on a continuation is ignored.
#[derive(Default)]
pub struct ReassemblyBuffer {
    buf: Vec<u8>,
    total_expected: usize,
    started: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReassemblyOutcome {
    /// Message incomplete; the peer owes more fragments.
    NeedMore,
    /// Message complete; the buffer is handed off and this value consumed.
    Complete(Vec<u8>),
}

impl ReassemblyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes_received(&self) -> usize {
        self.buf.len()
    }

    pub fn total_expected(&self) -> usize {
        self.total_expected
    }

    pub fn append(
        &mut self,
        payload: &[u8],
        declared_len: Option<u32>,
    ) -> EtlsResult<ReassemblyOutcome> {
        if !self.started {
            self.started = true;
            self.total_expected = match declared_len {
                Some(n) => n as usize,
                // No length field: the message is exactly this fragment.
                None => payload.len(),
            };
            if self.total_expected > MAX_MESSAGE_LEN {
                return Err(EtlsError::ReassemblyOverLength);
            }
            self.buf.reserve_exact(self.total_expected);
        }

        // No message data received at all: corrupted reassembly state.
        if self.buf.is_empty() && self.total_expected == 0 && payload.is_empty() {
            return Err(EtlsError::ReassemblyCorrupt);
        }

        self.buf.extend_from_slice(payload);

        if self.buf.len() > self.total_expected {
            return Err(EtlsError::ReassemblyOverLength);
        }
        if self.buf.len() == self.total_expected {
            return Ok(ReassemblyOutcome::Complete(core::mem::take(&mut self.buf)));
        }
        Ok(ReassemblyOutcome::NeedMore)
    }
}
