use etls_core::{
    eap_frame, eap_type, EapCode, EapHeader, EtlsError, FragmentFlags, EAP_HEADER_SIZE,
};

#[test]
fn test_flags_codec() {
    let flags = FragmentFlags::decode(0xE5);
    assert!(flags.length_included);
    assert!(flags.more_fragments);
    assert!(flags.start);
    assert_eq!(flags.low_bits, 0x05);
    assert_eq!(flags.encode(), 0xE5);

    // Every bit pattern is syntactically valid; bits 3..4 are dropped.
    let flags = FragmentFlags::decode(0x1F);
    assert!(!flags.length_included);
    assert!(!flags.more_fragments);
    assert!(!flags.start);
    assert_eq!(flags.low_bits, 0x07);
    assert_eq!(flags.encode(), 0x07);

    assert_eq!(FragmentFlags::default().encode(), 0x00);
}

#[test]
fn test_header_codec() {
    let hdr = EapHeader {
        code: EapCode::Response,
        identifier: 0x42,
        length: 1024,
        eap_type: eap_type::PEAP,
    };
    let mut buf = [0u8; EAP_HEADER_SIZE];
    hdr.to_bytes(&mut buf).unwrap();
    assert_eq!(buf, [0x02, 0x42, 0x04, 0x00, 25]);
    assert_eq!(EapHeader::from_bytes(&buf).unwrap(), hdr);
}

#[test]
fn test_header_rejects_truncation_and_bad_code() {
    assert_eq!(EapHeader::from_bytes(&[1, 2, 0]), Err(EtlsError::WireFormat));
    assert_eq!(
        EapHeader::from_bytes(&[9, 0, 0, 5, 13]),
        Err(EtlsError::WireFormat)
    );
}

#[test]
fn test_eap_frame_layout() {
    let frame = eap_frame(EapCode::Request, 7, eap_type::TLS, &[0xAA, 0xBB]);
    assert_eq!(frame, [0x01, 0x07, 0x00, 0x07, 13, 0xAA, 0xBB]);

    let hdr = EapHeader::from_bytes(&frame).unwrap();
    assert_eq!(hdr.length as usize, frame.len());
}
