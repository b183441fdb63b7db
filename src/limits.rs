use crate::error::PnmError;
use crate::info::ImageHeader;

/// Resource limits applied by [`DecodeRequest`](crate::DecodeRequest) before
/// the sample buffer is allocated.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the decoded sample buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Validate a parsed header and return the number of samples to allocate.
    pub(crate) fn check_header(&self, header: &ImageHeader) -> Result<usize, PnmError> {
        let (width, height) = (header.width, header.height);
        if self.max_width.is_some_and(|max| u64::from(width) > max) {
            return Err(PnmError::LimitExceeded(format!(
                "width {width} exceeds limit {}",
                self.max_width.unwrap_or_default()
            )));
        }
        if self.max_height.is_some_and(|max| u64::from(height) > max) {
            return Err(PnmError::LimitExceeded(format!(
                "height {height} exceeds limit {}",
                self.max_height.unwrap_or_default()
            )));
        }

        let pixels = u64::from(width) * u64::from(height);
        if let Some(max_px) = self.max_pixels {
            if pixels > max_px {
                return Err(PnmError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }

        let samples = header.sample_count()?;
        let bytes = (samples as u64).saturating_mul(header.variant().sample_size() as u64);
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes > max_mem {
                return Err(PnmError::LimitExceeded(format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(samples)
    }
}
