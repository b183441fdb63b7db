#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Auto-detect decode must never panic
    let _ = zenpnm::decode(data, enough::Unstoppable);

    // Neither may any explicit header routine
    for variant in [
        zenpnm::FormatVariant::PbmAscii,
        zenpnm::FormatVariant::PgmBinary,
        zenpnm::FormatVariant::PpmAscii,
        zenpnm::FormatVariant::PfmRgb,
    ] {
        let _ = zenpnm::DecodeRequest::new(data)
            .expect_format(variant)
            .decode(enough::Unstoppable);
    }
});
