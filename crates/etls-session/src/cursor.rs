use alloc::vec::Vec;

use etls_core::{EtlsError, EtlsResult, FragmentFlags};

/// One outbound EAP fragment of a larger TLS message, plus the flag state
/// the wire encoding needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub payload: Vec<u8>,
    pub more_fragments: bool,
    pub length_included: bool,
    /// Total length of the message this fragment belongs to; only emitted
    /// on the wire when `length_included` is set.
    pub total_len: u32,
}

impl Fragment {
    /// Encode as EAP Type-Data: flags byte, optional 4-byte message length,
    /// payload. `low_bits` are the method-specific version bits.
    pub fn to_type_data(&self, low_bits: u8) -> Vec<u8> {
        let flags = FragmentFlags {
            length_included: self.length_included,
            more_fragments: self.more_fragments,
            start: false,
            low_bits,
        };
        let mut out = Vec::with_capacity(5 + self.payload.len());
        out.push(flags.encode());
        if self.length_included {
            out.extend_from_slice(&self.total_len.to_be_bytes());
        }
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Slices one outgoing TLS message into bounded fragments.
pub struct OutboundCursor {
    buf: Vec<u8>,
    sent: usize,
}

impl OutboundCursor {
    pub fn new(message: Vec<u8>) -> Self {
        Self { buf: message, sent: 0 }
    }

    pub fn is_done(&self) -> bool {
        self.sent == self.buf.len()
    }

    pub fn bytes_sent(&self) -> usize {
        self.sent
    }

    pub fn total_len(&self) -> usize {
        self.buf.len()
    }

    /// Take the next fragment of at most `limit` bytes. Calling this on an
    /// exhausted cursor, or with a zero limit, is a caller bug.
    pub fn next_fragment(
        &mut self,
        limit: usize,
        include_length_always: bool,
    ) -> EtlsResult<Fragment> {
        if limit == 0 || self.is_done() {
            return Err(EtlsError::ProtocolMisuse);
        }

        let first = self.sent == 0;
        let take = core::cmp::min(limit, self.buf.len() - self.sent);
        let payload = self.buf[self.sent..self.sent + take].to_vec();
        self.sent += take;

        Ok(Fragment {
            payload,
            more_fragments: self.sent < self.buf.len(),
            // The length field rides only on the first fragment, and only
            // when the message does not fit in one, unless forced.
            length_included: first && (self.buf.len() > limit || include_length_always),
            total_len: self.buf.len() as u32,
        })
    }
}
