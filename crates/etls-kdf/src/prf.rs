//! TLS 1.2 PRF (RFC 5246 §5), P_SHA256 only.

use alloc::vec::Vec;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    // HMAC accepts any key length.
    let mut mac = HmacSha256::new_from_slice(key).unwrap();
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// PRF(secret, label, seed) = P_SHA256(secret, label || seed), truncated to
/// `out_len`.
pub fn tls12_prf_sha256(secret: &[u8], label: &str, seed: &[u8], out_len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(out_len + 32);

    // A(1) = HMAC(secret, label || seed); A(i) = HMAC(secret, A(i-1))
    let mut a = hmac_sha256(secret, &[label.as_bytes(), seed]);
    while out.len() < out_len {
        let block = hmac_sha256(secret, &[&a, label.as_bytes(), seed]);
        out.extend_from_slice(&block);
        a = hmac_sha256(secret, &[&a]);
    }
    a.zeroize();

    out.truncate(out_len);
    out
}
