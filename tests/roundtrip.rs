use enough::Unstoppable;
use zenpnm::*;

fn decode_bytes(data: &[u8]) -> DecodeOutput {
    DecodeRequest::new(data).decode(Unstoppable).unwrap()
}

#[test]
fn pgm_binary_2x2() {
    let pixels = [10u16, 20, 30, 40];
    let encoded = EncodeRequest::pgm(Encoding::Binary)
        .encode(&pixels, 2, 2, Unstoppable)
        .unwrap();

    let decoded = decode_bytes(&encoded);
    assert_eq!(decoded.format(), FormatVariant::PgmBinary);
    assert_eq!(decoded.header.maxval(), Some(255));
    assert_eq!(decoded.samples(), Some(&pixels[..]));
}

#[test]
fn pbm_binary_single_pixel_payload() {
    let encoded = EncodeRequest::pbm(Encoding::Binary)
        .encode(&[1], 1, 1, Unstoppable)
        .unwrap();
    assert_eq!(encoded, b"P4\n1 1\n\x80");
}

#[test]
fn header_cursor_after_maxval() {
    let data = b"P2\n# comment\n4 3\n255\n1 2 3";
    let mut cursor = &data[..];
    let header = read_header(&mut cursor).unwrap();
    assert_eq!(header.width, 4);
    assert_eq!(header.height, 3);
    assert_eq!(header.maxval(), Some(255));
    assert_eq!(cursor, b"1 2 3");
}

#[test]
fn ppm_roundtrip_both_encodings() {
    let w = 4;
    let h = 3;
    let mut pixels = vec![0u16; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * 3;
            if (x + y) % 2 == 0 {
                pixels[off] = 255;
                pixels[off + 1] = 0;
                pixels[off + 2] = 128;
            } else {
                pixels[off] = 0;
                pixels[off + 1] = 200;
                pixels[off + 2] = 50;
            }
        }
    }

    for encoding in [Encoding::Ascii, Encoding::Binary] {
        let encoded = EncodeRequest::ppm(encoding)
            .encode(&pixels, w as u32, h as u32, Unstoppable)
            .unwrap();
        let decoded = decode_bytes(&encoded);
        assert_eq!(decoded.width(), w as u32);
        assert_eq!(decoded.height(), h as u32);
        assert_eq!(decoded.format(), FormatVariant::pnm(PnmKind::Ppm, encoding));
        assert_eq!(decoded.samples(), Some(&pixels[..]));
    }
}

#[test]
fn pbm_roundtrip_both_encodings() {
    let w = 11;
    let h = 3;
    let pixels: Vec<u16> = (0..w * h).map(|i| ((i * 7) % 3 == 0) as u16).collect();

    for encoding in [Encoding::Ascii, Encoding::Binary] {
        let encoded = EncodeRequest::pbm(encoding)
            .encode(&pixels, w as u32, h as u32, Unstoppable)
            .unwrap();
        let decoded = decode_bytes(&encoded);
        assert_eq!(decoded.header.channels(), 1);
        assert_eq!(decoded.samples(), Some(&pixels[..]));
    }
}

#[test]
fn pgm_ascii_roundtrip_with_small_maxval() {
    let pixels = vec![0u16, 3, 7, 15, 1, 9];
    let encoded = EncodeRequest::pgm(Encoding::Ascii)
        .with_maxval(15)
        .encode(&pixels, 3, 2, Unstoppable)
        .unwrap();
    assert!(encoded.starts_with(b"P2\n3 2\n15\n"));

    let decoded = decode_bytes(&encoded);
    assert_eq!(decoded.header.maxval(), Some(15));
    assert_eq!(decoded.samples(), Some(&pixels[..]));
}

#[test]
fn pgm_binary_sixteen_bit() {
    let pixels = vec![0u16, 1000, 65535, 256];
    let encoded = EncodeRequest::pgm(Encoding::Binary)
        .with_maxval(65535)
        .encode(&pixels, 2, 2, Unstoppable)
        .unwrap();
    let payload = &encoded[encoded.len() - 8..];
    assert_eq!(payload, &[0, 0, 0x03, 0xE8, 0xFF, 0xFF, 0x01, 0x00]);

    let decoded = decode_bytes(&encoded);
    assert_eq!(decoded.samples(), Some(&pixels[..]));
}

#[test]
fn pfm_roundtrip_both_byte_orders() {
    let floats: Vec<f32> = (0..24).map(|i| i as f32 / 23.0 - 0.5).collect();
    for order in [ByteOrder::Little, ByteOrder::Big] {
        let encoded = EncodeRequest::pfm_rgb()
            .with_byte_order(order)
            .encode_float(&floats, 4, 2, Unstoppable)
            .unwrap();
        let decoded = decode_bytes(&encoded);
        assert_eq!(decoded.format(), FormatVariant::PfmRgb);
        assert_eq!(decoded.header.pfm(), Some((1.0, order)));
        let out = decoded.floats().unwrap();
        assert_eq!(out.len(), floats.len());
        for (a, b) in floats.iter().zip(out) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}

#[test]
fn pfm_gray_rows_stored_bottom_up() {
    // 1x2: top row 1.0, bottom row 2.0
    let encoded = EncodeRequest::pfm_gray()
        .with_byte_order(ByteOrder::Little)
        .encode_float(&[1.0, 2.0], 1, 2, Unstoppable)
        .unwrap();
    let header = b"Pf\n1 2\n-1.0\n";
    assert_eq!(&encoded[..header.len()], header);
    let payload = &encoded[header.len()..];
    assert_eq!(&payload[..4], &2.0f32.to_le_bytes());
    assert_eq!(&payload[4..], &1.0f32.to_le_bytes());

    let decoded = decode_bytes(&encoded);
    assert_eq!(decoded.floats(), Some(&[1.0f32, 2.0][..]));
}

#[test]
fn pfm_scale_passes_through() {
    let data: Vec<u8> = b"Pf\n1 1\n4.5\n"
        .iter()
        .copied()
        .chain(0.25f32.to_be_bytes())
        .collect();
    let decoded = decode_bytes(&data);
    assert_eq!(decoded.header.pfm(), Some((4.5, ByteOrder::Big)));
    // samples are not multiplied by the scale
    assert_eq!(decoded.floats(), Some(&[0.25f32][..]));

    let reencoded = EncodeRequest::from_header(&decoded.header)
        .encode_float(decoded.floats().unwrap(), 1, 1, Unstoppable)
        .unwrap();
    assert_eq!(reencoded, data);
}

#[test]
fn from_header_reproduces_integer_formats() {
    let data = b"P3\n2 1\n100\n1 2 3 97 98 99\n";
    let decoded = decode_bytes(data);
    let reencoded = EncodeRequest::from_header(&decoded.header)
        .encode(decoded.samples().unwrap(), 2, 1, Unstoppable)
        .unwrap();
    assert_eq!(reencoded, data);
}

#[test]
fn comment_line_written_after_magic() {
    let encoded = EncodeRequest::pgm(Encoding::Ascii)
        .with_comment("out.pgm")
        .encode(&[5], 1, 1, Unstoppable)
        .unwrap();
    assert_eq!(encoded, b"P2\n# out.pgm\n1 1\n255\n5\n");

    let decoded = decode_bytes(&encoded);
    assert_eq!(decoded.samples(), Some(&[5u16][..]));
}

#[test]
fn image_info_probe() {
    let encoded = EncodeRequest::ppm(Encoding::Binary)
        .encode(&[255u16; 6], 1, 2, Unstoppable)
        .unwrap();

    let info = ImageInfo::from_bytes(&encoded).unwrap();
    assert_eq!(info.width, 1);
    assert_eq!(info.height, 2);
    assert_eq!(info.format, FormatVariant::PpmBinary);
    assert_eq!(info.channels, 3);
    assert_eq!(info.maxval, Some(255));
}

#[test]
fn limits_reject_large() {
    let encoded = EncodeRequest::ppm(Encoding::Binary)
        .encode(&[255u16; 6], 1, 2, Unstoppable)
        .unwrap();

    let limits = Limits {
        max_pixels: Some(1), // only 1 pixel allowed
        ..Default::default()
    };

    let result = DecodeRequest::new(&encoded[..])
        .with_limits(&limits)
        .decode(Unstoppable);
    match result.unwrap_err() {
        PnmError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn memory_limit_counts_decoded_samples() {
    let encoded = EncodeRequest::pfm_rgb()
        .encode_float(&[0.0; 12], 2, 2, Unstoppable)
        .unwrap();

    // 12 samples * 4 bytes
    let tight = Limits {
        max_memory_bytes: Some(47),
        ..Default::default()
    };
    assert!(matches!(
        DecodeRequest::new(&encoded[..]).with_limits(&tight).decode(Unstoppable),
        Err(PnmError::LimitExceeded(_))
    ));

    let enough_room = Limits {
        max_memory_bytes: Some(48),
        ..Default::default()
    };
    assert!(
        DecodeRequest::new(&encoded[..])
            .with_limits(&enough_room)
            .decode(Unstoppable)
            .is_ok()
    );
}

#[test]
fn file_roundtrip() {
    let dir = std::env::temp_dir().join(format!("zenpnm-roundtrip-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("ramp.ppm");

    let pixels: Vec<u16> = (0..5 * 4 * 3).map(|i| (i * 4) as u16).collect();
    EncodeRequest::ppm(Encoding::Ascii)
        .with_comment("ramp.ppm")
        .encode_file(&path, &pixels, 5, 4, Unstoppable)
        .unwrap();

    let decoded = decode_file(&path, Unstoppable).unwrap();
    assert_eq!(decoded.format(), FormatVariant::PpmAscii);
    assert_eq!(decoded.samples(), Some(&pixels[..]));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[cfg(feature = "rgb")]
#[test]
fn typed_rgb_view() {
    let encoded = EncodeRequest::ppm(Encoding::Binary)
        .encode(&[1, 2, 3, 4, 5, 6], 2, 1, Unstoppable)
        .unwrap();
    let decoded = decode_bytes(&encoded);
    let px = decoded.to_rgb16().unwrap();
    assert_eq!(px, vec![rgb::RGB16::new(1, 2, 3), rgb::RGB16::new(4, 5, 6)]);
}
