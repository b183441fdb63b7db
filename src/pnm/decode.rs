//! Raster decoders for P1-P6 and PFM.
//!
//! Every format is decoded in segments of at most [`SEGMENT_SAMPLES`]
//! samples. A growing destination is extended one segment at a time, so a
//! header that promises more pixels than the stream holds ends in
//! [`PnmError::TruncatedData`] long before the promised size is allocated.

use std::io::BufRead;

use enough::Stop;

use super::bits;
use super::header::{next_byte, parse_decimal, read_token, skip_spaces};
use crate::error::PnmError;
use crate::float::{ByteOrder, FloatCodec};
use crate::info::{HeaderParams, ImageHeader};

/// Largest number of samples decoded per step. A multiple of 8 so that
/// PBM segments inside a row start on a byte boundary.
const SEGMENT_SAMPLES: usize = 1 << 16;

/// Where decoded samples go.
pub(crate) enum Samples<'a, T> {
    /// Caller buffer, at least as long as the image.
    Fixed(&'a mut [T]),
    /// Empty vector extended as input arrives.
    Growing(&'a mut Vec<T>),
}

impl<T: Copy + Default> Samples<'_, T> {
    /// Number of samples the image holds.
    fn check_len(&self, header: &ImageHeader) -> Result<usize, PnmError> {
        if header.width == 0 || header.height == 0 {
            return Err(PnmError::InvalidDimensions {
                width: i64::from(header.width),
                height: i64::from(header.height),
            });
        }
        let needed = header.sample_count()?;
        if let Samples::Fixed(out) = self {
            if out.len() < needed {
                return Err(PnmError::BufferTooSmall {
                    needed,
                    actual: out.len(),
                });
            }
        }
        Ok(needed)
    }

    /// The next `len` samples after the first `done`.
    fn segment(&mut self, done: usize, len: usize) -> Result<&mut [T], PnmError> {
        match self {
            Samples::Fixed(out) => Ok(&mut out[done..done + len]),
            Samples::Growing(out) => {
                out.try_reserve(len).map_err(|e| {
                    PnmError::LimitExceeded(format!("cannot grow sample buffer: {e}"))
                })?;
                out.resize(done + len, T::default());
                Ok(&mut out[done..])
            }
        }
    }
}

/// Feed `total` samples to `fill` one segment at a time.
///
/// With `row_aligned`, segments never cross a row boundary.
fn for_each_segment<T: Copy + Default>(
    dst: &mut Samples<'_, T>,
    total: usize,
    row_len: usize,
    row_aligned: bool,
    stop: &dyn Stop,
    mut fill: impl FnMut(&mut [T]) -> Result<(), PnmError>,
) -> Result<(), PnmError> {
    let mut done = 0;
    let mut steps = 0usize;
    while done < total {
        if steps % 16 == 0 {
            stop.check()?;
        }
        steps += 1;
        let left = if row_aligned {
            row_len - done % row_len
        } else {
            total - done
        };
        let len = left.min(SEGMENT_SAMPLES);
        fill(dst.segment(done, len)?)?;
        done += len;
    }
    Ok(())
}

/// Decode integer samples for a PBM, PGM or PPM header.
pub(crate) fn decode_integer<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    mut dst: Samples<'_, u16>,
    stop: &dyn Stop,
) -> Result<(), PnmError> {
    let total = dst.check_len(header)?;
    let row_len = header.width as usize * header.channels();
    let mut scratch = Vec::new();

    match header.params {
        HeaderParams::PbmAscii => {
            for_each_segment(&mut dst, total, row_len, false, stop, |seg| {
                read_ascii_bits(reader, seg)
            })
        }
        HeaderParams::PbmBinary => {
            for_each_segment(&mut dst, total, row_len, true, stop, |seg| {
                read_packed_bits(reader, seg, &mut scratch)
            })
        }
        HeaderParams::PgmAscii { maxval } | HeaderParams::PpmAscii { maxval } => {
            for_each_segment(&mut dst, total, row_len, false, stop, |seg| {
                read_ascii_samples(reader, seg, maxval, &mut scratch)
            })
        }
        HeaderParams::PgmBinary { maxval } | HeaderParams::PpmBinary { maxval } => {
            for_each_segment(&mut dst, total, row_len, false, stop, |seg| {
                read_raw_samples(reader, seg, maxval, &mut scratch)
            })
        }
        HeaderParams::PfmRgb { .. } | HeaderParams::PfmGray { .. } => Err(
            PnmError::UnsupportedVariant("PFM samples decode to f32".into()),
        ),
    }
}

/// Decode PFM samples, top row first.
pub(crate) fn decode_float<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    mut dst: Samples<'_, f32>,
    codec: FloatCodec,
    stop: &dyn Stop,
) -> Result<(), PnmError> {
    let Some((_, byte_order)) = header.pfm() else {
        return Err(PnmError::UnsupportedVariant(format!(
            "{} samples decode to u16",
            header.variant().magic()
        )));
    };
    let total = dst.check_len(header)?;
    let row_len = header.width as usize * header.channels();
    let mut scratch = Vec::new();

    // file order first, bottom row leading
    for_each_segment(&mut dst, total, row_len, false, stop, |seg| {
        read_floats(reader, seg, byte_order, codec, &mut scratch)
    })?;

    let decoded = match dst {
        Samples::Fixed(out) => &mut out[..total],
        Samples::Growing(out) => &mut out[..],
    };
    flip_rows(decoded, row_len);
    Ok(())
}

/// Plain PBM: each `0` or `1` character is a sample, with or without
/// whitespace between them.
fn read_ascii_bits<R: BufRead + ?Sized>(reader: &mut R, out: &mut [u16]) -> Result<(), PnmError> {
    for sample in out.iter_mut() {
        skip_spaces(reader)?;
        *sample = match next_byte(reader)? {
            Some(b'0') => 0,
            Some(b'1') => 1,
            Some(b) => {
                return Err(PnmError::MalformedSample(format!(
                    "PBM sample must be 0 or 1, found {:?}",
                    b as char
                )));
            }
            None => return Err(PnmError::TruncatedData),
        };
    }
    Ok(())
}

/// `out` starts on a byte boundary of a packed row.
fn read_packed_bits<R: BufRead + ?Sized>(
    reader: &mut R,
    out: &mut [u16],
    packed: &mut Vec<u8>,
) -> Result<(), PnmError> {
    packed.resize(bits::packed_row_len(out.len()), 0);
    reader.read_exact(packed)?;
    bits::unpack_row(packed, out);
    Ok(())
}

fn read_ascii_samples<R: BufRead + ?Sized>(
    reader: &mut R,
    out: &mut [u16],
    maxval: u16,
    token: &mut Vec<u8>,
) -> Result<(), PnmError> {
    for sample in out.iter_mut() {
        skip_spaces(reader)?;
        read_token(reader, token)?;
        if token.is_empty() {
            return Err(PnmError::TruncatedData);
        }
        let value = parse_decimal(token).ok_or_else(|| {
            PnmError::MalformedSample(format!(
                "not a decimal sample: {:?}",
                String::from_utf8_lossy(token)
            ))
        })?;
        if value > u32::from(maxval) {
            return Err(PnmError::MalformedSample(format!(
                "sample {value} exceeds maxval {maxval}"
            )));
        }
        *sample = value as u16;
    }
    Ok(())
}

/// Binary PGM/PPM: one byte per sample, or two big-endian bytes when
/// `maxval > 255`.
fn read_raw_samples<R: BufRead + ?Sized>(
    reader: &mut R,
    out: &mut [u16],
    maxval: u16,
    raw: &mut Vec<u8>,
) -> Result<(), PnmError> {
    let wide = maxval > 255;
    raw.resize(if wide { out.len() * 2 } else { out.len() }, 0);
    reader.read_exact(raw)?;
    if wide {
        for (sample, pair) in out.iter_mut().zip(raw.chunks_exact(2)) {
            *sample = u16::from_be_bytes([pair[0], pair[1]]);
        }
    } else {
        for (sample, &byte) in out.iter_mut().zip(raw.iter()) {
            *sample = u16::from(byte);
        }
    }
    check_maxval(out, maxval)
}

/// Binary samples get the same range check as ASCII ones.
fn check_maxval(samples: &[u16], maxval: u16) -> Result<(), PnmError> {
    match samples.iter().find(|&&s| s > maxval) {
        Some(s) => Err(PnmError::MalformedSample(format!(
            "sample {s} exceeds maxval {maxval}"
        ))),
        None => Ok(()),
    }
}

fn read_floats<R: BufRead + ?Sized>(
    reader: &mut R,
    out: &mut [f32],
    byte_order: ByteOrder,
    codec: FloatCodec,
    raw: &mut Vec<u8>,
) -> Result<(), PnmError> {
    raw.resize(out.len() * 4, 0);
    reader.read_exact(raw)?;
    for (sample, quad) in out.iter_mut().zip(raw.chunks_exact(4)) {
        *sample = codec.decode([quad[0], quad[1], quad[2], quad[3]], byte_order);
    }
    Ok(())
}

/// Reverse the order of the `row_len`-sample rows in `samples`.
fn flip_rows<T>(samples: &mut [T], row_len: usize) {
    let rows = samples.len() / row_len;
    for top in 0..rows / 2 {
        let bottom = rows - 1 - top;
        let (head, tail) = samples.split_at_mut(bottom * row_len);
        head[top * row_len..(top + 1) * row_len].swap_with_slice(&mut tail[..row_len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_rows_odd_height() {
        let mut v = [1, 2, 3, 4, 5, 6];
        flip_rows(&mut v, 2);
        assert_eq!(v, [5, 6, 3, 4, 1, 2]);
    }

    #[test]
    fn segments_stay_inside_rows() {
        let mut out = Vec::new();
        let mut seen = Vec::new();
        for_each_segment(
            &mut Samples::Growing(&mut out),
            SEGMENT_SAMPLES * 2 + 20,
            SEGMENT_SAMPLES + 10,
            true,
            &enough::Unstoppable,
            |seg: &mut [u16]| {
                seen.push(seg.len());
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(seen, [SEGMENT_SAMPLES, 10, SEGMENT_SAMPLES, 10]);
        assert_eq!(out.len(), SEGMENT_SAMPLES * 2 + 20);
    }
}
