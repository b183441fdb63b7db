use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use enough::Stop;
use log::debug;

use crate::error::PnmError;
use crate::info::{FormatVariant, ImageHeader};
use crate::limits::Limits;
use crate::pixel::PixelBuffer;
use crate::pnm;

/// Decoded image: the header and exactly `width * height * channels` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeOutput {
    pub header: ImageHeader,
    pixels: PixelBuffer,
}

impl DecodeOutput {
    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn format(&self) -> FormatVariant {
        self.header.variant()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }

    /// Integer samples; `None` for PFM.
    pub fn samples(&self) -> Option<&[u16]> {
        self.pixels.as_integer()
    }

    /// Float samples; `None` for PBM, PGM and PPM.
    pub fn floats(&self) -> Option<&[f32]> {
        self.pixels.as_float()
    }

    /// Group PPM samples into RGB pixels.
    ///
    /// Returns [`PnmError::UnsupportedVariant`] for other formats.
    #[cfg(feature = "rgb")]
    pub fn to_rgb16(&self) -> Result<Vec<rgb::RGB16>, PnmError> {
        match (&self.pixels, self.header.channels()) {
            (PixelBuffer::Integer(v), 3) => Ok(v
                .chunks_exact(3)
                .map(|p| rgb::RGB16::new(p[0], p[1], p[2]))
                .collect()),
            _ => Err(PnmError::UnsupportedVariant(format!(
                "{} is not an integer RGB format",
                self.format().magic()
            ))),
        }
    }

    /// Group PFM RGB samples into pixels.
    #[cfg(feature = "rgb")]
    pub fn to_rgb_f32(&self) -> Result<Vec<rgb::RGB<f32>>, PnmError> {
        match (&self.pixels, self.header.channels()) {
            (PixelBuffer::Float(v), 3) => Ok(v
                .chunks_exact(3)
                .map(|p| rgb::RGB::new(p[0], p[1], p[2]))
                .collect()),
            _ => Err(PnmError::UnsupportedVariant(format!(
                "{} is not a float RGB format",
                self.format().magic()
            ))),
        }
    }

    /// PPM pixels as an [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec_rgb16(&self) -> Result<imgref::ImgVec<rgb::RGB16>, PnmError> {
        Ok(imgref::ImgVec::new(
            self.to_rgb16()?,
            self.header.width as usize,
            self.header.height as usize,
        ))
    }

    /// Single-channel samples (PBM, PGM) as an [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec_gray16(&self) -> Result<imgref::ImgVec<u16>, PnmError> {
        match (&self.pixels, self.header.channels()) {
            (PixelBuffer::Integer(v), 1) => Ok(imgref::ImgVec::new(
                v.clone(),
                self.header.width as usize,
                self.header.height as usize,
            )),
            _ => Err(PnmError::UnsupportedVariant(format!(
                "{} is not an integer single-channel format",
                self.format().magic()
            ))),
        }
    }
}

/// Decode configuration: optional limits and an optional required format.
///
/// ```
/// use zenpnm::{DecodeRequest, FormatVariant, Unstoppable};
///
/// let data = b"P2\n# comment\n2 1\n255\n7 9\n";
/// let decoded = DecodeRequest::new(&data[..])
///     .expect_format(FormatVariant::PgmAscii)
///     .decode(Unstoppable)
///     .unwrap();
/// assert_eq!(decoded.samples(), Some(&[7u16, 9][..]));
/// ```
pub struct DecodeRequest<'l, R> {
    reader: R,
    limits: Option<&'l Limits>,
    expected: Option<FormatVariant>,
}

impl<'l, R: BufRead> DecodeRequest<'l, R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            limits: None,
            expected: None,
        }
    }

    pub fn with_limits(mut self, limits: &'l Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Read the header with the routine for `variant` instead of detecting
    /// it; any other format fails with [`PnmError::FormatMismatch`].
    pub fn expect_format(mut self, variant: FormatVariant) -> Self {
        self.expected = Some(variant);
        self
    }

    /// Read the header only. The reader is left at the first pixel byte.
    pub fn read_header(&mut self) -> Result<ImageHeader, PnmError> {
        match self.expected {
            Some(variant) => pnm::read_header_as(&mut self.reader, variant),
            None => pnm::read_header(&mut self.reader),
        }
    }

    /// Read the header and the full raster.
    pub fn decode(mut self, stop: impl Stop) -> Result<DecodeOutput, PnmError> {
        let header = self.read_header()?;
        let samples = match self.limits {
            Some(limits) => limits.check_header(&header)?,
            None => header.sample_count()?,
        };
        debug!(
            "decoding {} {}x{}: {samples} samples",
            header.variant().magic(),
            header.width,
            header.height
        );
        let pixels = pnm::read_data_with(&mut self.reader, &header, &stop)?;
        Ok(DecodeOutput { header, pixels })
    }

    /// Give back the reader, positioned wherever the last call left it.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Detect, read and decode a whole image from `reader`.
pub fn decode<R: BufRead>(reader: R, stop: impl Stop) -> Result<DecodeOutput, PnmError> {
    DecodeRequest::new(reader).decode(stop)
}

/// Open `path` and decode it.
pub fn decode_file(path: impl AsRef<Path>, stop: impl Stop) -> Result<DecodeOutput, PnmError> {
    let file = File::open(path)?;
    decode(BufReader::new(file), stop)
}
