#![no_main]
use libfuzzer_sys::fuzz_target;
use zenpnm::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical samples
    let Ok(decoded) = decode(data, enough::Unstoppable) else {
        return;
    };

    let req = EncodeRequest::from_header(&decoded.header);
    let reencoded = match decoded.pixels() {
        PixelBuffer::Integer(samples) => {
            req.encode(samples, decoded.width(), decoded.height(), enough::Unstoppable)
        }
        PixelBuffer::Float(samples) => {
            req.encode_float(samples, decoded.width(), decoded.height(), enough::Unstoppable)
        }
    };

    let Ok(reencoded) = reencoded else { return };
    let Ok(decoded2) = decode(&reencoded[..], enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.width(), decoded2.width());
    assert_eq!(decoded.height(), decoded2.height());
    match (decoded.pixels(), decoded2.pixels()) {
        (PixelBuffer::Integer(a), PixelBuffer::Integer(b)) => {
            // decoded samples never exceed maxval, so every encoding is exact
            assert_eq!(a, b, "roundtrip sample mismatch");
        }
        (PixelBuffer::Float(a), PixelBuffer::Float(b)) => {
            let a_bits: Vec<u32> = a.iter().map(|f| f.to_bits()).collect();
            let b_bits: Vec<u32> = b.iter().map(|f| f.to_bits()).collect();
            assert_eq!(a_bits, b_bits, "roundtrip float mismatch");
        }
        _ => panic!("sample type changed across roundtrip"),
    }
});
