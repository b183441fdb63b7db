/// Decoded samples, row-major with channels interleaved (R, G, B for
/// three-channel images).
///
/// PBM, PGM and PPM decode to `Integer`; PFM decodes to `Float` with rows
/// ordered top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelBuffer {
    Integer(Vec<u16>),
    Float(Vec<f32>),
}

impl PixelBuffer {
    /// Number of samples (not pixels).
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_integer(&self) -> Option<&[u16]> {
        match self {
            Self::Integer(v) => Some(v),
            Self::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(v),
            Self::Integer(_) => None,
        }
    }

    pub fn into_integer(self) -> Option<Vec<u16>> {
        match self {
            Self::Integer(v) => Some(v),
            Self::Float(_) => None,
        }
    }

    pub fn into_float(self) -> Option<Vec<f32>> {
        match self {
            Self::Float(v) => Some(v),
            Self::Integer(_) => None,
        }
    }
}
