//! # zenpnm
//!
//! PBM, PGM and PPM (ASCII and binary) and PFM image decoder and encoder.
//!
//! ## Supported Formats
//!
//! - **P1 / P4** (PBM): 1 bit per pixel, MSB-first packing in binary
//! - **P2 / P5** (PGM): grayscale, maxval up to 65535 (two big-endian bytes
//!   per binary sample above 255)
//! - **P3 / P6** (PPM): interleaved RGB, same maxval rules as PGM
//! - **PF / Pf** (PFM): 32-bit float RGB / grayscale, either byte order
//!
//! ## Pipeline
//!
//! Detect the format from the magic bytes, read the header, decode the
//! raster into a buffer of `width * height * channels` samples that grows
//! with the input. Encoding writes a header and raster from an
//! [`EncodeRequest`], optionally replicating every pixel into a larger block.
//!
//! PFM rows are stored bottom-to-top in files. Decoded buffers are always
//! top-to-bottom; the encoder flips them back.
//!
//! ## Non-Goals
//!
//! - PAM (P7) and any format outside the PNM/PFM family
//! - Compression, color management, streaming or partial decode
//!
//! ## Usage
//!
//! ```
//! use zenpnm::{DecodeRequest, EncodeRequest, Encoding, Unstoppable};
//!
//! let pixels = [10u16, 20, 30, 40];
//! let encoded = EncodeRequest::pgm(Encoding::Binary)
//!     .with_comment("gradient.pgm")
//!     .encode(&pixels, 2, 2, Unstoppable)?;
//!
//! let decoded = DecodeRequest::new(&encoded[..]).decode(Unstoppable)?;
//! assert_eq!((decoded.width(), decoded.height()), (2, 2));
//! assert_eq!(decoded.samples(), Some(&pixels[..]));
//! # Ok::<(), zenpnm::PnmError>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod float;
mod info;
mod limits;
mod pixel;

pub mod pnm;

mod decode;
mod encode;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest, decode, decode_file};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::PnmError;
pub use float::{ByteOrder, FloatCodec, floats_equal, random_unit, swap_f32_bytes};
pub use info::{
    Encoding, FormatVariant, HeaderParams, ImageHeader, ImageInfo, PnmKind, detect_format,
};
pub use limits::Limits;
pub use pixel::PixelBuffer;
pub use pnm::read_header;
