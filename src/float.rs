//! Float helpers for PFM: byte order, 4-byte swaps, tolerant comparison and
//! a uniform random sample for synthetic images.

use rand::Rng;

/// Byte order of 4-byte floats in a PFM payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the machine running this code, probed at runtime.
    pub fn native() -> Self {
        if 1u16.to_ne_bytes()[0] == 1 {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    /// Byte order encoded by the sign of a PFM scale token.
    ///
    /// Negative means little-endian; positive and zero mean big-endian.
    pub fn from_scale(scale: f32) -> Self {
        if scale < 0.0 {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    /// Sign written in front of the scale magnitude for this order.
    pub fn scale_sign(self) -> f32 {
        match self {
            ByteOrder::Little => -1.0,
            ByteOrder::Big => 1.0,
        }
    }
}

/// Reverse the byte order of a 4-byte float representation.
#[inline]
pub fn swap_f32_bytes(bytes: [u8; 4]) -> [u8; 4] {
    [bytes[3], bytes[2], bytes[1], bytes[0]]
}

/// Converts between file bytes and `f32` for a given host byte order.
///
/// [`FloatCodec::native`] is what the decoder and encoder use. A codec built
/// with [`FloatCodec::with_host`] behaves as if it ran on a machine of the
/// other endianness, which is how the swap path gets tested on any machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloatCodec {
    host: ByteOrder,
}

impl FloatCodec {
    pub fn native() -> Self {
        Self {
            host: ByteOrder::native(),
        }
    }

    pub fn with_host(host: ByteOrder) -> Self {
        Self { host }
    }

    pub fn host(&self) -> ByteOrder {
        self.host
    }

    /// Read one float stored in `file` order.
    #[inline]
    pub fn decode(&self, bytes: [u8; 4], file: ByteOrder) -> f32 {
        let host_bytes = if file == self.host {
            bytes
        } else {
            swap_f32_bytes(bytes)
        };
        self.read_host_order(host_bytes)
    }

    /// Write one float in `file` order.
    #[inline]
    pub fn encode(&self, value: f32, file: ByteOrder) -> [u8; 4] {
        let host_bytes = self.write_host_order(value);
        if file == self.host {
            host_bytes
        } else {
            swap_f32_bytes(host_bytes)
        }
    }

    #[inline]
    fn read_host_order(&self, bytes: [u8; 4]) -> f32 {
        match self.host {
            ByteOrder::Little => f32::from_le_bytes(bytes),
            ByteOrder::Big => f32::from_be_bytes(bytes),
        }
    }

    #[inline]
    fn write_host_order(&self, value: f32) -> [u8; 4] {
        match self.host {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }
}

impl Default for FloatCodec {
    fn default() -> Self {
        Self::native()
    }
}

/// Whether `a` and `b` differ by at most `tolerance`.
pub fn floats_equal(a: f32, b: f32, tolerance: f32) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= tolerance
}

/// Uniform random float in `[0, 1)`.
pub fn random_unit<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(0.0f32..1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn native_matches_target_endian() {
        let expected = if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        };
        assert_eq!(ByteOrder::native(), expected);
    }

    #[test]
    fn scale_sign_selects_order() {
        assert_eq!(ByteOrder::from_scale(-1.0), ByteOrder::Little);
        assert_eq!(ByteOrder::from_scale(1.0), ByteOrder::Big);
        assert_eq!(ByteOrder::from_scale(0.0), ByteOrder::Big);
        assert_eq!(ByteOrder::from_scale(-0.25), ByteOrder::Little);
    }

    #[test]
    fn decode_is_independent_of_host() {
        let le = 1.5f32.to_le_bytes();
        let be = 1.5f32.to_be_bytes();
        for host in [ByteOrder::Little, ByteOrder::Big] {
            let codec = FloatCodec::with_host(host);
            assert_eq!(codec.decode(le, ByteOrder::Little), 1.5);
            assert_eq!(codec.decode(be, ByteOrder::Big), 1.5);
            assert_eq!(codec.encode(1.5, ByteOrder::Little), le);
            assert_eq!(codec.encode(1.5, ByteOrder::Big), be);
        }
    }

    #[test]
    fn swap_reverses() {
        assert_eq!(swap_f32_bytes([1, 2, 3, 4]), [4, 3, 2, 1]);
    }

    #[test]
    fn tolerance() {
        assert!(floats_equal(1.0, 1.0005, 0.001));
        assert!(!floats_equal(1.0, 1.01, 0.001));
        assert!(floats_equal(f32::INFINITY, f32::INFINITY, 0.0));
    }

    #[test]
    fn random_unit_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_unit(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }
}
