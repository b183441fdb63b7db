//! Header parsing and the byte-level token scanner shared with the ASCII
//! sample decoder.

use std::io::{BufRead, ErrorKind};

use log::debug;

use crate::error::PnmError;
use crate::float::ByteOrder;
use crate::info::{Encoding, FormatVariant, HeaderParams, ImageHeader, PnmKind};

/// Longest token the scanner collects before giving up on it.
const MAX_TOKEN: usize = 64;

pub(crate) fn peek_byte<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<u8>, PnmError> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

pub(crate) fn next_byte<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<u8>, PnmError> {
    let byte = peek_byte(reader)?;
    if byte.is_some() {
        reader.consume(1);
    }
    Ok(byte)
}

/// Skip whitespace and `#` comments up to the next token or end of stream.
pub(crate) fn skip_spaces<R: BufRead + ?Sized>(reader: &mut R) -> Result<(), PnmError> {
    while let Some(byte) = peek_byte(reader)? {
        if byte == b'#' {
            skip_comment(reader)?;
        } else if byte.is_ascii_whitespace() {
            reader.consume(1);
        } else {
            break;
        }
    }
    Ok(())
}

fn skip_comment<R: BufRead + ?Sized>(reader: &mut R) -> Result<(), PnmError> {
    while let Some(byte) = next_byte(reader)? {
        if byte == b'\n' || byte == b'\r' {
            break;
        }
    }
    Ok(())
}

/// Collect bytes up to whitespace, `#` or end of stream into `token`.
///
/// The delimiter is left in the stream.
pub(crate) fn read_token<R: BufRead + ?Sized>(
    reader: &mut R,
    token: &mut Vec<u8>,
) -> Result<(), PnmError> {
    token.clear();
    while let Some(byte) = peek_byte(reader)? {
        if byte.is_ascii_whitespace() || byte == b'#' || token.len() >= MAX_TOKEN {
            break;
        }
        token.push(byte);
        reader.consume(1);
    }
    Ok(())
}

/// Parse an unsigned decimal token. `None` on empty input, stray bytes or
/// overflow.
pub(crate) fn parse_decimal(token: &[u8]) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    token.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
        } else {
            None
        }
    })
}

fn lossy(token: &[u8]) -> String {
    String::from_utf8_lossy(token).into_owned()
}

fn read_magic<R: BufRead + ?Sized>(reader: &mut R) -> Result<Vec<u8>, PnmError> {
    let mut magic = Vec::with_capacity(2);
    read_token(reader, &mut magic)?;
    Ok(magic)
}

fn expect_magic<R: BufRead + ?Sized>(
    reader: &mut R,
    variant: FormatVariant,
) -> Result<(), PnmError> {
    let magic = read_magic(reader)?;
    if magic != variant.magic().as_bytes() {
        return Err(PnmError::FormatMismatch {
            expected: variant.magic(),
            found: lossy(&magic),
        });
    }
    Ok(())
}

fn read_integer<R: BufRead + ?Sized>(
    reader: &mut R,
    token: &mut Vec<u8>,
    field: &str,
) -> Result<i64, PnmError> {
    skip_spaces(reader)?;
    read_token(reader, token)?;
    if token.is_empty() {
        return Err(PnmError::HeaderParse(format!("missing {field}")));
    }
    core::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            PnmError::HeaderParse(format!("{field} is not an integer: {:?}", lossy(token)))
        })
}

fn read_dimensions<R: BufRead + ?Sized>(
    reader: &mut R,
    token: &mut Vec<u8>,
) -> Result<(u32, u32), PnmError> {
    let width = read_integer(reader, token, "width")?;
    let height = read_integer(reader, token, "height")?;
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(PnmError::InvalidDimensions { width, height }),
    }
}

fn read_maxval<R: BufRead + ?Sized>(reader: &mut R, token: &mut Vec<u8>) -> Result<u16, PnmError> {
    let maxval = read_integer(reader, token, "maxval")?;
    match u16::try_from(maxval) {
        Ok(m) if m > 0 => Ok(m),
        _ => Err(PnmError::HeaderParse(format!(
            "maxval {maxval} outside 1..=65535"
        ))),
    }
}

/// Consume the single whitespace byte separating the header from the raster.
fn finish_header<R: BufRead + ?Sized>(reader: &mut R) -> Result<(), PnmError> {
    match peek_byte(reader)? {
        Some(b'#') => skip_comment(reader),
        Some(b) if b.is_ascii_whitespace() => {
            reader.consume(1);
            Ok(())
        }
        Some(b) => Err(PnmError::HeaderParse(format!(
            "unexpected byte {b:#04x} after header"
        ))),
        None => Ok(()),
    }
}

/// Read a PBM header (`P1` or `P4`, selected by `encoding`).
pub fn read_pbm_header<R: BufRead + ?Sized>(
    reader: &mut R,
    encoding: Encoding,
) -> Result<ImageHeader, PnmError> {
    let variant = FormatVariant::pnm(PnmKind::Pbm, encoding);
    expect_magic(reader, variant)?;
    read_fields(reader, variant)
}

/// Read a PGM header (`P2` or `P5`).
pub fn read_pgm_header<R: BufRead + ?Sized>(
    reader: &mut R,
    encoding: Encoding,
) -> Result<ImageHeader, PnmError> {
    let variant = FormatVariant::pnm(PnmKind::Pgm, encoding);
    expect_magic(reader, variant)?;
    read_fields(reader, variant)
}

/// Read a PPM header (`P3` or `P6`).
pub fn read_ppm_header<R: BufRead + ?Sized>(
    reader: &mut R,
    encoding: Encoding,
) -> Result<ImageHeader, PnmError> {
    let variant = FormatVariant::pnm(PnmKind::Ppm, encoding);
    expect_magic(reader, variant)?;
    read_fields(reader, variant)
}

/// Read a PFM header (`PF` or `Pf`).
///
/// The sign of the scale token selects the payload byte order; its magnitude
/// is kept as-is and never applied to samples.
pub fn read_pfm_header<R: BufRead + ?Sized>(reader: &mut R) -> Result<ImageHeader, PnmError> {
    let magic = read_magic(reader)?;
    let variant = match magic.as_slice() {
        b"PF" => FormatVariant::PfmRgb,
        b"Pf" => FormatVariant::PfmGray,
        _ => {
            return Err(PnmError::FormatMismatch {
                expected: "PF or Pf",
                found: lossy(&magic),
            });
        }
    };
    read_fields(reader, variant)
}

/// Read the magic token, then the header it names.
///
/// Unlike [`crate::detect_format`] this consumes the magic as it goes, so it works
/// on readers that buffer a single byte at a time.
pub fn read_header<R: BufRead + ?Sized>(reader: &mut R) -> Result<ImageHeader, PnmError> {
    let magic = read_magic(reader)?;
    let variant = FormatVariant::from_magic(&magic)?;
    if magic.len() != 2 {
        return Err(PnmError::FormatMismatch {
            expected: variant.magic(),
            found: lossy(&magic),
        });
    }
    read_fields(reader, variant)
}

/// Everything after the magic token: dimensions, then maxval or scale.
fn read_fields<R: BufRead + ?Sized>(
    reader: &mut R,
    variant: FormatVariant,
) -> Result<ImageHeader, PnmError> {
    let mut token = Vec::new();
    let (width, height) = read_dimensions(reader, &mut token)?;

    let params = match variant {
        FormatVariant::PbmAscii => HeaderParams::PbmAscii,
        FormatVariant::PbmBinary => HeaderParams::PbmBinary,
        FormatVariant::PgmAscii => HeaderParams::PgmAscii {
            maxval: read_maxval(reader, &mut token)?,
        },
        FormatVariant::PgmBinary => HeaderParams::PgmBinary {
            maxval: read_maxval(reader, &mut token)?,
        },
        FormatVariant::PpmAscii => HeaderParams::PpmAscii {
            maxval: read_maxval(reader, &mut token)?,
        },
        FormatVariant::PpmBinary => HeaderParams::PpmBinary {
            maxval: read_maxval(reader, &mut token)?,
        },
        FormatVariant::PfmRgb | FormatVariant::PfmGray => {
            let (scale, byte_order) = read_scale(reader, &mut token)?;
            if variant == FormatVariant::PfmRgb {
                HeaderParams::PfmRgb { scale, byte_order }
            } else {
                HeaderParams::PfmGray { scale, byte_order }
            }
        }
    };
    finish_header(reader)?;

    let header = ImageHeader {
        width,
        height,
        params,
    };
    debug!(
        "{} header: {width}x{height}, {:?}",
        variant.magic(),
        header.params
    );
    Ok(header)
}

fn read_scale<R: BufRead + ?Sized>(
    reader: &mut R,
    token: &mut Vec<u8>,
) -> Result<(f32, ByteOrder), PnmError> {
    skip_spaces(reader)?;
    read_token(reader, token)?;
    let signed_scale = core::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite())
        .ok_or_else(|| PnmError::HeaderParse(format!("invalid PFM scale {:?}", lossy(token))))?;
    Ok((signed_scale.abs(), ByteOrder::from_scale(signed_scale)))
}

/// Read a header with the routine for `variant`.
///
/// Fails with [`PnmError::FormatMismatch`] when the stream holds another format.
pub fn read_header_as<R: BufRead + ?Sized>(
    reader: &mut R,
    variant: FormatVariant,
) -> Result<ImageHeader, PnmError> {
    let header = match variant.kind() {
        PnmKind::Pbm => read_pbm_header(reader, variant.encoding())?,
        PnmKind::Pgm => read_pgm_header(reader, variant.encoding())?,
        PnmKind::Ppm => read_ppm_header(reader, variant.encoding())?,
        PnmKind::Pfm => read_pfm_header(reader)?,
    };
    if header.variant() != variant {
        return Err(PnmError::FormatMismatch {
            expected: variant.magic(),
            found: header.variant().magic().into(),
        });
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_between_magic_and_dimensions() {
        let data = b"P2\n# comment\n4 3\n255\n\x07";
        let mut cursor = &data[..];
        let header = read_pgm_header(&mut cursor, Encoding::Ascii).unwrap();
        assert_eq!(header.width, 4);
        assert_eq!(header.height, 3);
        assert_eq!(header.maxval(), Some(255));
        assert_eq!(cursor, b"\x07");
    }

    #[test]
    fn comment_between_dimensions_and_maxval() {
        let mut cursor = &b"P5 2 # wide\n 2 # tall\n 15\n"[..];
        let header = read_pgm_header(&mut cursor, Encoding::Binary).unwrap();
        assert_eq!((header.width, header.height), (2, 2));
        assert_eq!(header.maxval(), Some(15));
        assert!(cursor.is_empty());
    }

    #[test]
    fn decimal_parsing() {
        assert_eq!(parse_decimal(b"0"), Some(0));
        assert_eq!(parse_decimal(b"65535"), Some(65535));
        assert_eq!(parse_decimal(b""), None);
        assert_eq!(parse_decimal(b"1a"), None);
        assert_eq!(parse_decimal(b"-1"), None);
        assert_eq!(parse_decimal(b"99999999999"), None);
    }

    #[test]
    fn wrong_magic_for_reader() {
        let mut cursor = &b"P5\n1 1\n255\n\0"[..];
        match read_ppm_header(&mut cursor, Encoding::Binary) {
            Err(PnmError::FormatMismatch { expected, found }) => {
                assert_eq!(expected, "P6");
                assert_eq!(found, "P5");
            }
            other => panic!("expected FormatMismatch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_and_negative_dimensions() {
        for data in [&b"P1\n0 3\n"[..], &b"P1\n3 -2\n"[..]] {
            let mut cursor = data;
            assert!(matches!(
                read_pbm_header(&mut cursor, Encoding::Ascii),
                Err(PnmError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn rejects_missing_or_non_numeric_dimensions() {
        for data in [&b"P4\n"[..], &b"P4\n3 x\n"[..], &b"P6\n3 3\nabc\n"[..]] {
            let mut cursor = data;
            assert!(matches!(
                read_header(&mut cursor),
                Err(PnmError::HeaderParse(_))
            ));
        }
    }

    #[test]
    fn rejects_out_of_range_maxval() {
        for data in [&b"P2 1 1 0\n"[..], &b"P2 1 1 65536\n"[..]] {
            let mut cursor = data;
            assert!(matches!(
                read_header(&mut cursor),
                Err(PnmError::HeaderParse(_))
            ));
        }
    }

    #[test]
    fn pfm_scale_sign() {
        let mut cursor = &b"PF\n3 2\n-0.5\n"[..];
        let header = read_pfm_header(&mut cursor).unwrap();
        assert_eq!(header.variant(), FormatVariant::PfmRgb);
        assert_eq!(header.pfm(), Some((0.5, ByteOrder::Little)));

        let mut cursor = &b"Pf\n3 2\n2.0\n"[..];
        let header = read_pfm_header(&mut cursor).unwrap();
        assert_eq!(header.variant(), FormatVariant::PfmGray);
        assert_eq!(header.pfm(), Some((2.0, ByteOrder::Big)));
    }

    #[test]
    fn read_header_as_checks_variant() {
        let mut cursor = &b"Pf\n1 1\n-1.0\n"[..];
        assert!(matches!(
            read_header_as(&mut cursor, FormatVariant::PfmRgb),
            Err(PnmError::FormatMismatch { .. })
        ));
    }
}
