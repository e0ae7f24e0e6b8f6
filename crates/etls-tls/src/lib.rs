#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
use alloc::vec::Vec;

use etls_core::EtlsResult;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One handshake step's result. A failed step may still carry bytes to send
/// (a TLS alert), so the two are independent fields rather than an either/or.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsOutput {
    pub data: Vec<u8>,
    pub failed: bool,
}

impl TlsOutput {
    pub fn ok(data: Vec<u8>) -> Self {
        Self { data, failed: false }
    }

    pub fn failure(alert: Vec<u8>) -> Self {
        Self { data: alert, failed: true }
    }
}

/// Raw key-derivation inputs exposed by the engine after the handshake.
/// Engine-backed private-key sessions may expose the randoms while
/// withholding the master secret, hence per-field options.
#[derive(Zeroize, ZeroizeOnDrop, Default)]
pub struct KeySources {
    pub client_random: Option<Vec<u8>>,
    pub server_random: Option<Vec<u8>>,
    pub master_secret: Option<Vec<u8>>,
    /// Engine-computed "EAP TLS PRF" output, when the backend offers one.
    pub eap_tls_prf: Option<Vec<u8>>,
}

/// The opaque TLS record-layer/handshake collaborator. The session engine
/// never looks inside the byte blobs it shuttles across this boundary.
pub trait TlsEngine {
    /// Consume one complete reassembled handshake message and produce
    /// whatever the TLS stack wants transmitted next (possibly nothing).
    fn handshake(&mut self, input: &[u8]) -> TlsOutput;

    /// Key-derivation inputs, once the TLS session has them. None before.
    fn get_keys(&self) -> Option<KeySources>;

    /// The engine's exported PRF (TLS key expansion).
    fn prf(&self, secret: &[u8], label: &str, seed: &[u8], out_len: usize) -> EtlsResult<Vec<u8>>;
}
