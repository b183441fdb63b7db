use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use enough::Stop;
use log::debug;

use crate::error::PnmError;
use crate::float::{ByteOrder, FloatCodec};
use crate::info::{Encoding, FormatVariant, HeaderParams, ImageHeader, PnmKind};
use crate::pnm;

/// Encoding configuration.
///
/// Built once per output file and passed to one of the `encode*` methods.
/// Every encode writes a complete header and raster, then flushes the writer
/// and drops it.
///
/// ```
/// use zenpnm::{EncodeRequest, Encoding, Unstoppable};
///
/// let out = EncodeRequest::pgm(Encoding::Binary)
///     .encode(&[10, 20, 30, 40], 2, 2, Unstoppable)
///     .unwrap();
/// assert_eq!(out, b"P5\n2 2\n255\n\x0a\x14\x1e\x28");
/// ```
#[derive(Clone, Debug)]
pub struct EncodeRequest {
    pub(crate) variant: FormatVariant,
    pub(crate) maxval: u16,
    pub(crate) scale_x: u32,
    pub(crate) scale_y: u32,
    line_wrap: Option<usize>,
    pub(crate) comment: Option<String>,
    pfm_scale: f32,
    pub(crate) byte_order: ByteOrder,
}

impl EncodeRequest {
    /// Encode as `variant` with maxval 255, no replication, the default line
    /// wrap for the format, and host byte order for PFM.
    pub fn new(variant: FormatVariant) -> Self {
        Self {
            variant,
            maxval: 255,
            scale_x: 1,
            scale_y: 1,
            line_wrap: None,
            comment: None,
            pfm_scale: 1.0,
            byte_order: ByteOrder::native(),
        }
    }

    pub fn pbm(encoding: Encoding) -> Self {
        Self::new(FormatVariant::pnm(PnmKind::Pbm, encoding))
    }

    pub fn pgm(encoding: Encoding) -> Self {
        Self::new(FormatVariant::pnm(PnmKind::Pgm, encoding))
    }

    pub fn ppm(encoding: Encoding) -> Self {
        Self::new(FormatVariant::pnm(PnmKind::Ppm, encoding))
    }

    pub fn pfm_rgb() -> Self {
        Self::new(FormatVariant::PfmRgb)
    }

    pub fn pfm_gray() -> Self {
        Self::new(FormatVariant::PfmGray)
    }

    /// Reproduce the format of a decoded header: variant, maxval, and the
    /// PFM scale and byte order.
    pub fn from_header(header: &ImageHeader) -> Self {
        let req = Self::new(header.variant());
        match header.params {
            HeaderParams::PbmAscii | HeaderParams::PbmBinary => req,
            HeaderParams::PgmAscii { maxval }
            | HeaderParams::PgmBinary { maxval }
            | HeaderParams::PpmAscii { maxval }
            | HeaderParams::PpmBinary { maxval } => req.with_maxval(maxval),
            HeaderParams::PfmRgb { scale, byte_order }
            | HeaderParams::PfmGray { scale, byte_order } => {
                req.with_pfm_scale(scale).with_byte_order(byte_order)
            }
        }
    }

    /// Maxval written to PGM/PPM headers. Above 255, binary samples take two
    /// big-endian bytes. A maxval of 0 is raised to 1.
    pub fn with_maxval(mut self, maxval: u16) -> Self {
        self.maxval = maxval.max(1);
        self
    }

    /// Replicate each source pixel into a `scale_x` by `scale_y` block.
    pub fn with_scale(mut self, scale_x: u32, scale_y: u32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Samples per line in ASCII output.
    pub fn with_line_wrap(mut self, samples: usize) -> Self {
        self.line_wrap = Some(samples);
        self
    }

    /// Name written as a `#` comment line after the magic token, usually the
    /// output file name.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// PFM scale magnitude. Zero and non-finite values are written as 1.0,
    /// since the sign of the written value carries the byte order.
    pub fn with_pfm_scale(mut self, scale: f32) -> Self {
        self.pfm_scale = scale;
        self
    }

    /// PFM payload byte order.
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    /// Samples per ASCII line: the configured value, or 32 for PBM, 16 for
    /// PGM and 12 (four pixels) for PPM.
    pub fn line_wrap(&self) -> usize {
        self.line_wrap.unwrap_or(match self.variant.kind() {
            PnmKind::Pbm => 32,
            PnmKind::Pgm => 16,
            PnmKind::Ppm => 12,
            PnmKind::Pfm => 0,
        })
    }

    pub(crate) fn scale_magnitude(&self) -> f32 {
        if self.pfm_scale.is_finite() && self.pfm_scale != 0.0 {
            self.pfm_scale.abs()
        } else {
            1.0
        }
    }

    /// Write integer samples (PBM, PGM, PPM) to `writer`.
    ///
    /// `samples` holds `width * height * channels` values; `width` and
    /// `height` are the source dimensions before replication.
    pub fn encode_to<W: Write>(
        &self,
        mut writer: W,
        samples: &[u16],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<(), PnmError> {
        debug!(
            "encoding {}x{} as {} (scale {}x{})",
            width,
            height,
            self.variant.magic(),
            self.scale_x,
            self.scale_y
        );
        pnm::encode::encode_integer(&mut writer, self, samples, width, height, &stop)?;
        writer.flush()?;
        Ok(())
    }

    /// Write PFM samples, top row first, to `writer`.
    pub fn encode_float_to<W: Write>(
        &self,
        mut writer: W,
        samples: &[f32],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<(), PnmError> {
        debug!(
            "encoding {}x{} as {} ({:?} endian)",
            width,
            height,
            self.variant.magic(),
            self.byte_order
        );
        pnm::encode::encode_float(
            &mut writer,
            self,
            samples,
            width,
            height,
            FloatCodec::native(),
            &stop,
        )?;
        writer.flush()?;
        Ok(())
    }

    /// Encode integer samples into a new buffer.
    pub fn encode(
        &self,
        samples: &[u16],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, PnmError> {
        let mut out = Vec::new();
        self.encode_to(&mut out, samples, width, height, stop)?;
        Ok(out)
    }

    /// Encode PFM samples into a new buffer.
    pub fn encode_float(
        &self,
        samples: &[f32],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, PnmError> {
        let mut out = Vec::new();
        self.encode_float_to(&mut out, samples, width, height, stop)?;
        Ok(out)
    }

    /// Create (or truncate) `path` and write integer samples to it.
    ///
    /// A failed write may leave a partial file behind.
    pub fn encode_file(
        &self,
        path: impl AsRef<Path>,
        samples: &[u16],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<(), PnmError> {
        let file = File::create(path)?;
        self.encode_to(BufWriter::new(file), samples, width, height, stop)
    }

    /// Create (or truncate) `path` and write PFM samples to it.
    pub fn encode_float_file(
        &self,
        path: impl AsRef<Path>,
        samples: &[f32],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<(), PnmError> {
        let file = File::create(path)?;
        self.encode_float_to(BufWriter::new(file), samples, width, height, stop)
    }
}
