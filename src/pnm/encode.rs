//! Raster encoders for P1-P6 and PFM, with integer pixel replication.

use std::io::Write;

use enough::Stop;

use super::bits;
use crate::encode::EncodeRequest;
use crate::error::PnmError;
use crate::float::FloatCodec;
use crate::info::{Encoding, FormatVariant, PnmKind};

/// Output geometry after replication.
struct Geometry {
    src_width: usize,
    src_height: usize,
    channels: usize,
    out_width: u32,
    out_height: u32,
    scale_x: usize,
    scale_y: usize,
}

impl Geometry {
    fn new(
        req: &EncodeRequest,
        width: u32,
        height: u32,
        actual: usize,
    ) -> Result<Self, PnmError> {
        let invalid = || PnmError::InvalidDimensions {
            width: i64::from(width),
            height: i64::from(height),
        };
        if width == 0 || height == 0 || req.scale_x == 0 || req.scale_y == 0 {
            return Err(invalid());
        }
        let out_width = width.checked_mul(req.scale_x).ok_or_else(invalid)?;
        let out_height = height.checked_mul(req.scale_y).ok_or_else(invalid)?;

        let channels = req.variant.channels();
        let needed = (width as usize)
            .checked_mul(height as usize)
            .and_then(|wh| wh.checked_mul(channels))
            .ok_or_else(invalid)?;
        if actual < needed {
            return Err(PnmError::BufferTooSmall { needed, actual });
        }

        Ok(Self {
            src_width: width as usize,
            src_height: height as usize,
            channels,
            out_width,
            out_height,
            scale_x: req.scale_x as usize,
            scale_y: req.scale_y as usize,
        })
    }

    fn src_row_len(&self) -> usize {
        self.src_width * self.channels
    }

    fn out_row_len(&self) -> usize {
        self.out_width as usize * self.channels
    }

    /// Repeat every pixel of `src` `scale_x` times into `dst`.
    fn widen<T: Copy>(&self, src: &[T], dst: &mut Vec<T>) {
        dst.clear();
        if self.scale_x == 1 {
            dst.extend_from_slice(src);
            return;
        }
        for pixel in src.chunks_exact(self.channels) {
            for _ in 0..self.scale_x {
                dst.extend_from_slice(pixel);
            }
        }
    }
}

fn write_header<W: Write + ?Sized>(
    out: &mut W,
    variant: FormatVariant,
    comment: Option<&str>,
    geom: &Geometry,
    last_field: Option<String>,
) -> Result<(), PnmError> {
    writeln!(out, "{}", variant.magic())?;
    if let Some(comment) = comment {
        let single_line: String = comment
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        writeln!(out, "# {single_line}")?;
    }
    writeln!(out, "{} {}", geom.out_width, geom.out_height)?;
    if let Some(field) = last_field {
        writeln!(out, "{field}")?;
    }
    Ok(())
}

/// Decimal samples separated by single spaces, `wrap` samples per line.
struct AsciiLines {
    wrap: usize,
    in_line: usize,
}

impl AsciiLines {
    fn new(wrap: usize) -> Self {
        Self {
            wrap: wrap.max(1),
            in_line: 0,
        }
    }

    fn push(&mut self, buf: &mut Vec<u8>, value: u16) -> Result<(), PnmError> {
        if self.in_line > 0 {
            buf.push(b' ');
        }
        write!(buf, "{value}")?;
        self.in_line += 1;
        if self.in_line == self.wrap {
            buf.push(b'\n');
            self.in_line = 0;
        }
        Ok(())
    }

    fn finish(&mut self, buf: &mut Vec<u8>) {
        if self.in_line > 0 {
            buf.push(b'\n');
            self.in_line = 0;
        }
    }
}

/// Write a PBM, PGM or PPM image.
pub(crate) fn encode_integer<W: Write + ?Sized>(
    out: &mut W,
    req: &EncodeRequest,
    samples: &[u16],
    width: u32,
    height: u32,
    stop: &dyn Stop,
) -> Result<(), PnmError> {
    let kind = req.variant.kind();
    if kind == PnmKind::Pfm {
        return Err(PnmError::UnsupportedVariant(
            "PFM encodes f32 samples".into(),
        ));
    }
    let geom = Geometry::new(req, width, height, samples.len())?;
    let maxval = match kind {
        PnmKind::Pbm => None,
        _ => Some(req.maxval.to_string()),
    };
    write_header(out, req.variant, req.comment.as_deref(), &geom, maxval)?;

    let mut wide_row = Vec::with_capacity(geom.out_row_len());
    let mut line = Vec::new();
    let mut ascii = AsciiLines::new(req.line_wrap());
    let mut packed = match (kind, req.variant.encoding()) {
        (PnmKind::Pbm, Encoding::Binary) => vec![0u8; bits::packed_row_len(geom.out_row_len())],
        _ => Vec::new(),
    };

    for (row_idx, src_row) in samples
        .chunks_exact(geom.src_row_len())
        .take(geom.src_height)
        .enumerate()
    {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        geom.widen(src_row, &mut wide_row);

        line.clear();
        for _ in 0..geom.scale_y {
            match (kind, req.variant.encoding()) {
                (PnmKind::Pbm, Encoding::Ascii) => {
                    for &s in &wide_row {
                        ascii.push(&mut line, u16::from(s != 0))?;
                    }
                }
                (PnmKind::Pbm, Encoding::Binary) => {
                    bits::pack_row(&wide_row, &mut packed);
                    line.extend_from_slice(&packed);
                }
                (_, Encoding::Ascii) => {
                    for &s in &wide_row {
                        ascii.push(&mut line, s)?;
                    }
                }
                (_, Encoding::Binary) if req.maxval > 255 => {
                    for &s in &wide_row {
                        line.extend_from_slice(&s.to_be_bytes());
                    }
                }
                (_, Encoding::Binary) => {
                    line.extend(wide_row.iter().map(|&s| s as u8));
                }
            }
        }
        out.write_all(&line)?;
    }

    if req.variant.encoding() == Encoding::Ascii {
        line.clear();
        ascii.finish(&mut line);
        out.write_all(&line)?;
    }
    Ok(())
}

/// Write a PFM image; rows go out bottom-to-top.
pub(crate) fn encode_float<W: Write + ?Sized>(
    out: &mut W,
    req: &EncodeRequest,
    samples: &[f32],
    width: u32,
    height: u32,
    codec: FloatCodec,
    stop: &dyn Stop,
) -> Result<(), PnmError> {
    if req.variant.kind() != PnmKind::Pfm {
        return Err(PnmError::UnsupportedVariant(format!(
            "{} encodes u16 samples",
            req.variant.magic()
        )));
    }
    let geom = Geometry::new(req, width, height, samples.len())?;
    let signed_scale = req.byte_order.scale_sign() * req.scale_magnitude();
    write_header(
        out,
        req.variant,
        req.comment.as_deref(),
        &geom,
        Some(format!("{signed_scale:?}")),
    )?;

    let mut wide_row = Vec::with_capacity(geom.out_row_len());
    let mut line = Vec::with_capacity(geom.out_row_len() * 4);
    let used = geom.src_row_len() * geom.src_height;

    for (row_idx, src_row) in samples[..used]
        .chunks_exact(geom.src_row_len())
        .rev()
        .enumerate()
    {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        geom.widen(src_row, &mut wide_row);
        line.clear();
        for &v in &wide_row {
            line.extend_from_slice(&codec.encode(v, req.byte_order));
        }
        for _ in 0..geom.scale_y {
            out.write_all(&line)?;
        }
    }
    Ok(())
}
