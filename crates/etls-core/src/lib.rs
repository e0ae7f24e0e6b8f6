#![no_std]
#![forbid(unsafe_code)]
#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
use alloc::vec::Vec;

/// EAP header: code, identifier, length, type (RFC 3748 §4).
pub const EAP_HEADER_SIZE: usize = 5;

/// Method type codes for the TLS family.
pub mod eap_type {
    pub const TLS: u8 = 13;
    pub const TTLS: u8 = 21;
    pub const PEAP: u8 = 25;
    pub const FAST: u8 = 43;
}

pub const FLAG_LENGTH_INCLUDED: u8 = 0x80;
pub const FLAG_MORE_FRAGMENTS: u8 = 0x40;
pub const FLAG_START: u8 = 0x20;
pub const FLAG_LOW_MASK: u8 = 0x07;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EapCode {
    Request = 1,
    Response = 2,
    Success = 3,
    Failure = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EapHeader {
    pub code: EapCode,
    pub identifier: u8,
    pub length: u16,
    pub eap_type: u8,
}

impl EapHeader {
    pub const SIZE: usize = EAP_HEADER_SIZE;

    pub fn to_bytes(&self, buf: &mut [u8]) -> EtlsResult<()> {
        if buf.len() < Self::SIZE {
            return Err(EtlsError::WireFormat);
        }
        buf[0] = self.code as u8;
        buf[1] = self.identifier;
        buf[2..4].copy_from_slice(&self.length.to_be_bytes());
        buf[4] = self.eap_type;
        Ok(())
    }

    pub fn from_bytes(buf: &[u8]) -> EtlsResult<Self> {
        if buf.len() < Self::SIZE {
            return Err(EtlsError::WireFormat);
        }
        let code = match buf[0] {
            1 => EapCode::Request,
            2 => EapCode::Response,
            3 => EapCode::Success,
            4 => EapCode::Failure,
            _ => return Err(EtlsError::WireFormat),
        };
        Ok(Self {
            code,
            identifier: buf[1],
            length: u16::from_be_bytes(buf[2..4].try_into().map_err(|_| EtlsError::WireFormat)?),
            eap_type: buf[4],
        })
    }
}

/// Build a complete EAP frame around method Type-Data.
pub fn eap_frame(code: EapCode, identifier: u8, eap_type: u8, type_data: &[u8]) -> Vec<u8> {
    let length = (EAP_HEADER_SIZE + type_data.len()) as u16;
    let mut frame = Vec::with_capacity(length as usize);
    frame.push(code as u8);
    frame.push(identifier);
    frame.extend_from_slice(&length.to_be_bytes());
    frame.push(eap_type);
    frame.extend_from_slice(type_data);
    frame
}

/// The flags byte leading every TLS-family Type-Data (RFC 5216 §4.1).
/// Bit5 (Start) and the low method bits are carried verbatim, never
/// interpreted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FragmentFlags {
    pub length_included: bool,
    pub more_fragments: bool,
    pub start: bool,
    pub low_bits: u8,
}

impl FragmentFlags {
    pub fn decode(byte: u8) -> Self {
        Self {
            length_included: byte & FLAG_LENGTH_INCLUDED != 0,
            more_fragments: byte & FLAG_MORE_FRAGMENTS != 0,
            start: byte & FLAG_START != 0,
            low_bits: byte & FLAG_LOW_MASK,
        }
    }

    pub fn encode(&self) -> u8 {
        let mut byte = self.low_bits & FLAG_LOW_MASK;
        if self.length_included {
            byte |= FLAG_LENGTH_INCLUDED;
        }
        if self.more_fragments {
            byte |= FLAG_MORE_FRAGMENTS;
        }
        if self.start {
            byte |= FLAG_START;
        }
        byte
    }
}

pub type EtlsResult<T> = Result<T, EtlsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtlsError {
    /// Peer sent more payload bytes than its declared TLS-Message-Length.
    ReassemblyOverLength,
    /// Degenerate reassembly state (empty buffer, zero expected, empty input).
    ReassemblyCorrupt,
    /// The TLS engine reported an unrecoverable handshake failure.
    TlsEngineFailure,
    /// Caller violated the single-pending-direction invariant.
    ProtocolMisuse,
    /// Key material requested before completion, or the engine cannot supply it.
    KeysUnavailable,
    /// Truncated or malformed header/length field.
    WireFormat,
}

impl core::fmt::Display for EtlsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EtlsError {}
