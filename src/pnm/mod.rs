//! Per-format header and raster routines: P1-P6 and PFM.
//!
//! The functions here are the low-level contract: read a header, size a
//! buffer from it, then fill that buffer from the same stream. The stream is
//! left positioned after the last sample. [`crate::DecodeRequest`] and
//! [`crate::EncodeRequest`] wrap these for the common cases.
//!
//! Credits: the token scanner and header layout follow
//! [zune-ppm](https://github.com/etemesi254/zune-image) by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib licensed).

pub mod bits;
pub(crate) mod decode;
pub(crate) mod encode;
mod header;

pub use header::{
    read_header, read_header_as, read_pbm_header, read_pfm_header, read_pgm_header,
    read_ppm_header,
};

use std::io::BufRead;

use enough::{Stop, Unstoppable};

use self::decode::Samples;
use crate::error::PnmError;
use crate::float::FloatCodec;
use crate::info::{ImageHeader, PnmKind};
use crate::pixel::PixelBuffer;

fn expect_kind(header: &ImageHeader, kind: PnmKind, expected: &'static str) -> Result<(), PnmError> {
    if header.variant().kind() != kind {
        return Err(PnmError::FormatMismatch {
            expected,
            found: header.variant().magic().into(),
        });
    }
    Ok(())
}

/// Fill `out` with `width * height` PBM samples (0 or 1).
pub fn read_pbm_data<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    out: &mut [u16],
) -> Result<(), PnmError> {
    expect_kind(header, PnmKind::Pbm, "P1 or P4")?;
    decode::decode_integer(reader, header, Samples::Fixed(out), &Unstoppable)
}

/// Fill `out` with `width * height` PGM samples.
pub fn read_pgm_data<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    out: &mut [u16],
) -> Result<(), PnmError> {
    expect_kind(header, PnmKind::Pgm, "P2 or P5")?;
    decode::decode_integer(reader, header, Samples::Fixed(out), &Unstoppable)
}

/// Fill `out` with `width * height * 3` interleaved PPM samples.
pub fn read_ppm_data<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    out: &mut [u16],
) -> Result<(), PnmError> {
    expect_kind(header, PnmKind::Ppm, "P3 or P6")?;
    decode::decode_integer(reader, header, Samples::Fixed(out), &Unstoppable)
}

/// Fill `out` with PFM samples in host float representation, top row first.
pub fn read_pfm_data<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    out: &mut [f32],
) -> Result<(), PnmError> {
    read_pfm_data_with(reader, header, out, FloatCodec::native())
}

/// [`read_pfm_data`] with an explicit float codec.
pub fn read_pfm_data_with<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    out: &mut [f32],
    codec: FloatCodec,
) -> Result<(), PnmError> {
    expect_kind(header, PnmKind::Pfm, "PF or Pf")?;
    decode::decode_float(reader, header, Samples::Fixed(out), codec, &Unstoppable)
}

/// Decode the raster into a new buffer of exactly `header.sample_count()`
/// samples.
///
/// The buffer grows with the input, so a header that claims more pixels
/// than the stream carries fails with [`PnmError::TruncatedData`].
pub fn read_data<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    stop: impl Stop,
) -> Result<PixelBuffer, PnmError> {
    read_data_with(reader, header, &stop)
}

pub(crate) fn read_data_with<R: BufRead + ?Sized>(
    reader: &mut R,
    header: &ImageHeader,
    stop: &dyn Stop,
) -> Result<PixelBuffer, PnmError> {
    stop.check()?;
    if header.variant().is_float() {
        let mut out = Vec::new();
        decode::decode_float(
            reader,
            header,
            Samples::Growing(&mut out),
            FloatCodec::native(),
            stop,
        )?;
        Ok(PixelBuffer::Float(out))
    } else {
        let mut out = Vec::new();
        decode::decode_integer(reader, header, Samples::Growing(&mut out), stop)?;
        Ok(PixelBuffer::Integer(out))
    }
}
