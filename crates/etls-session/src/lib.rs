#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{info, warn};

use etls_core::{EtlsError, EtlsResult, FragmentFlags};
use etls_kdf::KeyMaterial;
use etls_tls::{TlsEngine, TlsOutput};

pub mod cursor;
pub mod fragment;

pub use cursor::{Fragment, OutboundCursor};
pub use fragment::{ReassemblyBuffer, ReassemblyOutcome, MAX_MESSAGE_LEN};

/// Default per-fragment TLS payload budget (fits common 1500-byte MTUs
/// under RADIUS framing).
pub const DEFAULT_FRAGMENT_LIMIT: usize = 1398;

/// Phase2 (inner tunnel) messages must also fit the outer tunnel's budget,
/// so their fragment limit is reduced by this reservation.
pub const PHASE2_FRAGMENT_RESERVE: usize = 100;

/// Outer-tunnel vs. inner-tunnel credential context (PEAP/TTLS/FAST).
/// Opaque here beyond selecting the fragment-size reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Phase1,
    Phase2,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub phase: Phase,
    pub fragment_limit: usize,
    /// Force the 4-byte TLS-Message-Length onto every first fragment even
    /// when the message fits in one. Some peers require it.
    pub include_length_always: bool,
    /// Method-specific low flag bits (e.g. PEAP version), emitted verbatim.
    pub low_bits: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            phase: Phase::Phase1,
            fragment_limit: DEFAULT_FRAGMENT_LIMIT,
            include_length_always: false,
            low_bits: 0,
        }
    }
}

/// What the outer EAP method must do next. The four cases are mutually
/// exclusive; caller bugs surface as `Err(ProtocolMisuse)` instead.
#[derive(Debug, PartialEq, Eq)]
pub enum DriverResult {
    /// Inbound message incomplete: send an ACK and wait.
    NeedMoreFragments,
    /// Transmit this fragment; call `handle` again (with an ACK or empty
    /// input) while more remain.
    SendFragment(Fragment),
    /// Handshake finished with nothing left to send.
    HandshakeComplete,
    /// Conversation is dead. A failing TLS engine may still hand us an
    /// alert to transmit before teardown.
    Fatal {
        error: EtlsError,
        alert: Option<Fragment>,
    },
}

/// One TLS-over-EAP conversation: reassembly in, TLS step, fragmentation out.
pub struct Session {
    tls: Box<dyn TlsEngine>,
    config: SessionConfig,
    reassembly: Option<ReassemblyBuffer>,
    outbound: Option<OutboundCursor>,
    done: bool,
}

impl Session {
    pub fn new(tls: Box<dyn TlsEngine>, config: SessionConfig) -> Self {
        Self {
            tls,
            config,
            reassembly: None,
            outbound: None,
            done: false,
        }
    }

    /// The fragment budget actually applied, after the Phase2 reservation.
    pub fn effective_fragment_limit(&self) -> usize {
        let limit = self.config.fragment_limit;
        if self.config.phase == Phase::Phase2 && limit > PHASE2_FRAGMENT_RESERVE {
            limit - PHASE2_FRAGMENT_RESERVE
        } else {
            limit
        }
    }

    pub fn handshake_done(&self) -> bool {
        self.done
    }

    /// Process one inbound EAP Type-Data payload (flags byte onward). An
    /// empty slice, or a bare flags byte with no payload, means "no new
    /// data" and continues any pending transmission.
    pub fn handle(&mut self, inbound: &[u8]) -> EtlsResult<DriverResult> {
        let (declared_len, payload) = match Self::parse_type_data(inbound) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Ok(DriverResult::Fatal { error: e, alert: None });
            }
        };

        if self.outbound.is_some() {
            // Single-pending-direction invariant: new inbound data while we
            // still owe the peer fragments is a bug in the outer method.
            if !payload.is_empty() {
                return Err(EtlsError::ProtocolMisuse);
            }
            return self.continue_sending();
        }

        let mut buffer = self.reassembly.take().unwrap_or_default();
        let message = match buffer.append(payload, declared_len) {
            Ok(ReassemblyOutcome::NeedMore) => {
                self.reassembly = Some(buffer);
                return Ok(DriverResult::NeedMoreFragments);
            }
            Ok(ReassemblyOutcome::Complete(message)) => message,
            Err(e) => {
                warn!("SSL: reassembly aborted: {}", e);
                return Ok(DriverResult::Fatal { error: e, alert: None });
            }
        };

        if self.outbound.take().is_some() {
            warn!("SSL: discarding leftover outbound message before handshake step");
        }

        let TlsOutput { data, failed } = self.tls.handshake(&message);
        let limit = self.effective_fragment_limit();

        if failed {
            // Carry the failure alert out, but the conversation is over.
            let alert = if data.is_empty() {
                None
            } else {
                let mut cursor = OutboundCursor::new(data);
                Some(cursor.next_fragment(limit, self.config.include_length_always)?)
            };
            return Ok(DriverResult::Fatal {
                error: EtlsError::TlsEngineFailure,
                alert,
            });
        }

        if data.is_empty() {
            info!("SSL: handshake complete");
            self.done = true;
            return Ok(DriverResult::HandshakeComplete);
        }

        let mut cursor = OutboundCursor::new(data);
        let frag = cursor.next_fragment(limit, self.config.include_length_always)?;
        if !cursor.is_done() {
            self.outbound = Some(cursor);
        }
        Ok(DriverResult::SendFragment(frag))
    }

    /// Discard any in-progress reassembly or transmission and return to the
    /// initial state (reauthentication path). TLS-level session resumption
    /// state is the engine's own business.
    pub fn reset(&mut self) {
        self.reassembly = None;
        self.outbound = None;
        self.done = false;
    }

    /// The 1-byte ACK Type-Data: a flags byte with no length and no payload.
    pub fn build_ack(&self) -> Vec<u8> {
        let flags = FragmentFlags {
            low_bits: self.config.low_bits,
            ..FragmentFlags::default()
        };
        alloc::vec![flags.encode()]
    }

    /// Export keying material; valid only after `HandshakeComplete`.
    pub fn derive_key(&self, label: &str, out_len: usize) -> EtlsResult<KeyMaterial> {
        if !self.done {
            return Err(EtlsError::KeysUnavailable);
        }
        etls_kdf::derive(self.tls.as_ref(), label, out_len)
    }

    fn continue_sending(&mut self) -> EtlsResult<DriverResult> {
        let limit = self.effective_fragment_limit();
        let mut cursor = self.outbound.take().ok_or(EtlsError::ProtocolMisuse)?;
        let frag = cursor.next_fragment(limit, self.config.include_length_always)?;
        if !cursor.is_done() {
            self.outbound = Some(cursor);
        }
        Ok(DriverResult::SendFragment(frag))
    }

    /// Split Type-Data into the peer-declared message length (first
    /// fragment only) and the raw TLS payload.
    fn parse_type_data(inbound: &[u8]) -> EtlsResult<(Option<u32>, &[u8])> {
        if inbound.is_empty() {
            return Ok((None, &[]));
        }
        let flags = FragmentFlags::decode(inbound[0]);
        if flags.length_included {
            if inbound.len() < 5 {
                return Err(EtlsError::WireFormat);
            }
            let declared = u32::from_be_bytes(
                inbound[1..5].try_into().map_err(|_| EtlsError::WireFormat)?,
            );
            Ok((Some(declared), &inbound[5..]))
        } else {
            Ok((None, &inbound[1..]))
        }
    }
}
