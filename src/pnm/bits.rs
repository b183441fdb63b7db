//! PBM 1-bit packing: eight pixels per byte, most significant bit first,
//! every row padded to a whole byte.

/// Packed bytes needed for one row of `width` pixels.
#[inline]
pub fn packed_row_len(width: usize) -> usize {
    width.div_ceil(8)
}

/// Expand a packed row into 0/1 samples.
///
/// `out.len()` is the row width; padding bits in the last byte are ignored.
pub fn unpack_row(packed: &[u8], out: &mut [u16]) {
    let mut in_iter = packed.iter();
    let mut out_iter = out.chunks_exact_mut(8);

    (&mut out_iter)
        .zip(&mut in_iter)
        .for_each(|(out_vals, &in_val)| {
            for (pos, out_val) in out_vals.iter_mut().enumerate() {
                *out_val = u16::from((in_val >> (7 - pos)) & 0x01);
            }
        });

    if let Some(&in_val) = in_iter.next() {
        for (pos, out_val) in out_iter.into_remainder().iter_mut().enumerate() {
            *out_val = u16::from((in_val >> (7 - pos)) & 0x01);
        }
    }
}

/// Pack a row of samples; any non-zero sample sets its bit.
///
/// `out.len()` must be `packed_row_len(samples.len())`. Padding bits are zero.
pub fn pack_row(samples: &[u16], out: &mut [u8]) {
    for (byte, chunk) in out.iter_mut().zip(samples.chunks(8)) {
        *byte = chunk
            .iter()
            .enumerate()
            .fold(0u8, |acc, (pos, &s)| acc | (u8::from(s != 0) << (7 - pos)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_set_pixel_is_msb() {
        let mut out = [0u8; 1];
        pack_row(&[1], &mut out);
        assert_eq!(out, [0x80]);
    }

    #[test]
    fn row_padding() {
        assert_eq!(packed_row_len(1), 1);
        assert_eq!(packed_row_len(8), 1);
        assert_eq!(packed_row_len(9), 2);

        let samples = [1, 0, 1, 1, 0, 0, 0, 1, 1, 1];
        let mut packed = [0u8; 2];
        pack_row(&samples, &mut packed);
        assert_eq!(packed, [0b1011_0001, 0b1100_0000]);

        let mut back = [9u16; 10];
        unpack_row(&packed, &mut back);
        assert_eq!(back, samples);
    }

    #[test]
    fn unpack_ignores_padding_bits() {
        let mut out = [0u16; 3];
        unpack_row(&[0b0101_1111], &mut out);
        assert_eq!(out, [0, 1, 0]);
    }

    #[test]
    fn all_ones_and_zeros() {
        for width in [8usize, 16, 64] {
            let ones = vec![1u16; width];
            let mut packed = vec![0u8; packed_row_len(width)];
            pack_row(&ones, &mut packed);
            assert!(packed.iter().all(|&b| b == 0xFF));

            let zeros = vec![0u16; width];
            pack_row(&zeros, &mut packed);
            assert!(packed.iter().all(|&b| b == 0x00));
        }
    }
}
