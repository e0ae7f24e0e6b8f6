#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
use alloc::vec::Vec;

use etls_core::{EtlsError, EtlsResult};
use etls_tls::TlsEngine;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod prf;

/// Reserved exporter label with an engine-backed fast path.
pub const EAP_TLS_PRF_LABEL: &str = "client EAP encryption";

/// Exported keying material. Overwritten on drop.
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::ops::Deref for KeyMaterial {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

/// Derive `out_len` bytes of exported key material for `label`.
///
/// The engine-provided "EAP TLS PRF" output, when present and the label is
/// the reserved one, is used directly (truncated) instead of re-deriving.
/// Backends with hardware PRFs take that path; everything else runs the
/// engine's exported PRF over master_secret with client || server randoms
/// as the seed.
pub fn derive(engine: &dyn TlsEngine, label: &str, out_len: usize) -> EtlsResult<KeyMaterial> {
    let keys = engine.get_keys().ok_or(EtlsError::KeysUnavailable)?;

    if label == EAP_TLS_PRF_LABEL {
        if let Some(prf_out) = keys.eap_tls_prf.as_deref() {
            if out_len > prf_out.len() {
                return Err(EtlsError::KeysUnavailable);
            }
            return Ok(KeyMaterial(prf_out[..out_len].to_vec()));
        }
    }

    let client_random = keys.client_random.as_deref().ok_or(EtlsError::KeysUnavailable)?;
    let server_random = keys.server_random.as_deref().ok_or(EtlsError::KeysUnavailable)?;
    let master_secret = keys.master_secret.as_deref().ok_or(EtlsError::KeysUnavailable)?;

    let mut seed = Vec::with_capacity(client_random.len() + server_random.len());
    seed.extend_from_slice(client_random);
    seed.extend_from_slice(server_random);

    let out = engine.prf(master_secret, label, &seed, out_len)?;
    seed.zeroize();
    Ok(KeyMaterial(out))
}
