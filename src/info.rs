use std::io::BufRead;

use crate::error::PnmError;
use crate::float::ByteOrder;

/// Sample encoding of a PNM payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Decimal text tokens (P1, P2, P3).
    Ascii,
    /// Raw bytes (P4, P5, P6).
    Binary,
}

/// Format family, without the encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PnmKind {
    Pbm,
    Pgm,
    Ppm,
    Pfm,
}

/// One of the eight formats this crate reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatVariant {
    /// P1
    PbmAscii,
    /// P4
    PbmBinary,
    /// P2
    PgmAscii,
    /// P5
    PgmBinary,
    /// P3
    PpmAscii,
    /// P6
    PpmBinary,
    /// PF: three float channels.
    PfmRgb,
    /// Pf: one float channel.
    PfmGray,
}

impl FormatVariant {
    /// Classify a two-byte magic token.
    pub fn from_magic(magic: &[u8]) -> Result<Self, PnmError> {
        match magic.get(..2) {
            Some(b"P1") => Ok(Self::PbmAscii),
            Some(b"P2") => Ok(Self::PgmAscii),
            Some(b"P3") => Ok(Self::PpmAscii),
            Some(b"P4") => Ok(Self::PbmBinary),
            Some(b"P5") => Ok(Self::PgmBinary),
            Some(b"P6") => Ok(Self::PpmBinary),
            Some(b"PF") => Ok(Self::PfmRgb),
            Some(b"Pf") => Ok(Self::PfmGray),
            _ => Err(PnmError::UnrecognizedFormat),
        }
    }

    /// Build a PNM variant from its family and encoding.
    ///
    /// PFM has no ASCII form, so `encoding` is ignored for [`PnmKind::Pfm`]
    /// and the RGB variant is returned.
    pub fn pnm(kind: PnmKind, encoding: Encoding) -> Self {
        match (kind, encoding) {
            (PnmKind::Pbm, Encoding::Ascii) => Self::PbmAscii,
            (PnmKind::Pbm, Encoding::Binary) => Self::PbmBinary,
            (PnmKind::Pgm, Encoding::Ascii) => Self::PgmAscii,
            (PnmKind::Pgm, Encoding::Binary) => Self::PgmBinary,
            (PnmKind::Ppm, Encoding::Ascii) => Self::PpmAscii,
            (PnmKind::Ppm, Encoding::Binary) => Self::PpmBinary,
            (PnmKind::Pfm, _) => Self::PfmRgb,
        }
    }

    pub fn magic(self) -> &'static str {
        match self {
            Self::PbmAscii => "P1",
            Self::PgmAscii => "P2",
            Self::PpmAscii => "P3",
            Self::PbmBinary => "P4",
            Self::PgmBinary => "P5",
            Self::PpmBinary => "P6",
            Self::PfmRgb => "PF",
            Self::PfmGray => "Pf",
        }
    }

    pub fn kind(self) -> PnmKind {
        match self {
            Self::PbmAscii | Self::PbmBinary => PnmKind::Pbm,
            Self::PgmAscii | Self::PgmBinary => PnmKind::Pgm,
            Self::PpmAscii | Self::PpmBinary => PnmKind::Ppm,
            Self::PfmRgb | Self::PfmGray => PnmKind::Pfm,
        }
    }

    /// Sample encoding. PFM payloads are always binary.
    pub fn encoding(self) -> Encoding {
        match self {
            Self::PbmAscii | Self::PgmAscii | Self::PpmAscii => Encoding::Ascii,
            _ => Encoding::Binary,
        }
    }

    /// Samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::PpmAscii | Self::PpmBinary | Self::PfmRgb => 3,
            _ => 1,
        }
    }

    pub fn is_float(self) -> bool {
        self.kind() == PnmKind::Pfm
    }

    /// In-memory bytes per decoded sample (`u16` or `f32`).
    pub(crate) fn sample_size(self) -> usize {
        if self.is_float() {
            core::mem::size_of::<f32>()
        } else {
            core::mem::size_of::<u16>()
        }
    }
}

/// Detect the format of a stream without consuming any of it.
///
/// Only the bytes already buffered are inspected. A reader whose buffer holds
/// a single byte reports [`PnmError::UnrecognizedFormat`] even for a valid
/// file, since a `BufRead` cannot be made to buffer more without consuming.
/// [`crate::read_header`] reads the magic token instead and has no such
/// restriction.
pub fn detect_format<R: BufRead + ?Sized>(reader: &mut R) -> Result<FormatVariant, PnmError> {
    let buf = reader.fill_buf()?;
    FormatVariant::from_magic(buf)
}

/// Per-variant header fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeaderParams {
    PbmAscii,
    PbmBinary,
    PgmAscii { maxval: u16 },
    PgmBinary { maxval: u16 },
    PpmAscii { maxval: u16 },
    PpmBinary { maxval: u16 },
    PfmRgb { scale: f32, byte_order: ByteOrder },
    PfmGray { scale: f32, byte_order: ByteOrder },
}

impl HeaderParams {
    pub fn variant(&self) -> FormatVariant {
        match self {
            Self::PbmAscii => FormatVariant::PbmAscii,
            Self::PbmBinary => FormatVariant::PbmBinary,
            Self::PgmAscii { .. } => FormatVariant::PgmAscii,
            Self::PgmBinary { .. } => FormatVariant::PgmBinary,
            Self::PpmAscii { .. } => FormatVariant::PpmAscii,
            Self::PpmBinary { .. } => FormatVariant::PpmBinary,
            Self::PfmRgb { .. } => FormatVariant::PfmRgb,
            Self::PfmGray { .. } => FormatVariant::PfmGray,
        }
    }
}

/// Parsed image header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub params: HeaderParams,
}

impl ImageHeader {
    pub fn variant(&self) -> FormatVariant {
        self.params.variant()
    }

    pub fn channels(&self) -> usize {
        self.variant().channels()
    }

    /// Largest sample value: 1 for PBM, the header maxval for PGM/PPM,
    /// `None` for PFM.
    pub fn maxval(&self) -> Option<u16> {
        match self.params {
            HeaderParams::PbmAscii | HeaderParams::PbmBinary => Some(1),
            HeaderParams::PgmAscii { maxval }
            | HeaderParams::PgmBinary { maxval }
            | HeaderParams::PpmAscii { maxval }
            | HeaderParams::PpmBinary { maxval } => Some(maxval),
            HeaderParams::PfmRgb { .. } | HeaderParams::PfmGray { .. } => None,
        }
    }

    /// PFM scale magnitude and byte order.
    pub fn pfm(&self) -> Option<(f32, ByteOrder)> {
        match self.params {
            HeaderParams::PfmRgb { scale, byte_order }
            | HeaderParams::PfmGray { scale, byte_order } => Some((scale, byte_order)),
            _ => None,
        }
    }

    /// `width * height * channels`, the exact decoded buffer length.
    pub fn sample_count(&self) -> Result<usize, PnmError> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|wh| wh.checked_mul(self.channels()))
            .ok_or(PnmError::InvalidDimensions {
                width: i64::from(self.width),
                height: i64::from(self.height),
            })
    }
}

/// Header summary returned by [`ImageInfo::from_bytes`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: FormatVariant,
    pub channels: usize,
    /// `None` for PFM.
    pub maxval: Option<u16>,
}

impl ImageInfo {
    /// Probe a buffer's header without decoding pixel data.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PnmError> {
        let mut cursor = data;
        let header = crate::pnm::read_header(&mut cursor)?;
        Ok(Self::from(&header))
    }
}

impl From<&ImageHeader> for ImageInfo {
    fn from(header: &ImageHeader) -> Self {
        Self {
            width: header.width,
            height: header.height,
            format: header.variant(),
            channels: header.channels(),
            maxval: header.maxval(),
        }
    }
}
