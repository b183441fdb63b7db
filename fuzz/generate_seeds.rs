#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    fs::write(format!("{dir}/pbm_ascii_4x2.pbm"), b"P1\n# seed\n4 2\n0110\n1 0 0 1\n").unwrap();
    fs::write(format!("{dir}/pbm_binary_9x2.pbm"), b"P4\n9 2\n\xaa\xff\x00\x80").unwrap();
    fs::write(format!("{dir}/pgm_ascii_3x2.pgm"), b"P2\n3 2\n15\n0 3 7\n15 1 9\n").unwrap();
    fs::write(format!("{dir}/pgm_3x2.pgm"), b"P5\n3 2\n255\n\x00\x40\x80\xc0\xff\x64").unwrap();
    fs::write(format!("{dir}/pgm16_1x1.pgm"), b"P5\n1 1\n65535\n\x12\x34").unwrap();
    fs::write(format!("{dir}/ppm_ascii_1x2.ppm"), b"P3 1 2 255\n10 20 30\n40 50 60\n").unwrap();
    fs::write(
        format!("{dir}/ppm_2x2.ppm"),
        b"P6\n2 2\n255\n\xff\x00\x00\x00\xff\x00\x00\x00\xff\x80\x80\x80",
    )
    .unwrap();

    let mut pfm = b"Pf\n1 1\n-1.0\n".to_vec();
    pfm.extend_from_slice(&1.0f32.to_le_bytes());
    fs::write(format!("{dir}/pfm_gray_1x1.pfm"), pfm).unwrap();

    let mut pfm = b"PF\n1 1\n1.0\n".to_vec();
    for v in [0.25f32, 0.5, 0.75] {
        pfm.extend_from_slice(&v.to_be_bytes());
    }
    fs::write(format!("{dir}/pfm_rgb_be_1x1.pfm"), pfm).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_p6.bin"), b"P6").unwrap();
    fs::write(format!("{dir}/p2_bad_token.bin"), b"P2\n2 1\n255\n12 x4\n").unwrap();
    fs::write(format!("{dir}/pf_no_scale.bin"), b"PF\n1 1\n").unwrap();

    println!("Generated seed corpus in {dir}/");
}
