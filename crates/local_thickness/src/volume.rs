//! Volume buffers and classification config.
//!
//! Defines [`BinaryVolume`] (the 8-bit input grid), [`FloatVolume`] (the
//! 32-bit working and output grid), and [`Config`] (threshold
//! classification plus pipeline switches). Both volume types use dense
//! slice-major, row-major storage: `index = x + width * (y + height * z)`.
use crate::error::{Error, Result};

/// Classification and pipeline configuration.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Foreground threshold in 1..=255.
    pub threshold: u8,
    /// Inverts the classification when set.
    pub inverse: bool,
    /// Zeroes output voxels whose input classifies as background.
    pub mask_trim: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 128,
            inverse: false,
            mask_trim: false,
        }
    }
}

impl Config {
    /// Creates a config with the given threshold and default switches.
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// Sets the threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the inverse classification flag.
    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    /// Sets the mask-trim flag.
    pub fn with_mask_trim(mut self, mask_trim: bool) -> Self {
        self.mask_trim = mask_trim;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(Error::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        Ok(())
    }

    /// Whether a voxel value classifies as foreground: `(value >= threshold) XOR inverse`.
    #[inline]
    pub fn is_foreground(&self, value: u8) -> bool {
        (value >= self.threshold) != self.inverse
    }

    /// Whether a voxel value classifies as background.
    #[inline]
    pub fn is_background(&self, value: u8) -> bool {
        !self.is_foreground(value)
    }
}

fn checked_len(width: usize, height: usize, depth: usize) -> Result<usize> {
    if width == 0 || height == 0 || depth == 0 {
        return Err(Error::InvalidShape {
            width,
            height,
            depth,
        });
    }
    Ok(width * height * depth)
}

/// An 8-bit voxel grid, classified against a [`Config`] into foreground and background.
///
/// Read-only for the whole pipeline; no stage mutates its input.
#[derive(Debug, Clone)]
pub struct BinaryVolume {
    width: usize,
    height: usize,
    depth: usize,
    pub(crate) data: Vec<u8>,
}

impl BinaryVolume {
    /// Creates a volume from raw bytes in slice-major, row-major order.
    pub fn new(width: usize, height: usize, depth: usize, data: Vec<u8>) -> Result<Self> {
        let expected = checked_len(width, height, depth)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            data,
        })
    }

    /// Shape as `(width, height, depth)`.
    pub fn dim(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Total voxel count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the volume holds zero voxels. Always false for a constructed volume.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Linear index of the voxel at `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.width * (y + self.height * z)
    }

    /// Byte value at `(x, y, z)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.data[self.index(x, y, z)]
    }

    /// Raw bytes in storage order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A 32-bit float voxel grid, used for all intermediate and output maps.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatVolume {
    width: usize,
    height: usize,
    depth: usize,
    pub(crate) data: Vec<f32>,
}

impl FloatVolume {
    /// Creates a zero-filled volume of the given shape.
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self> {
        Self::filled(width, height, depth, 0.0)
    }

    /// Creates a volume of the given shape with every voxel set to `value`.
    pub fn filled(width: usize, height: usize, depth: usize, value: f32) -> Result<Self> {
        let len = checked_len(width, height, depth)?;
        Ok(Self {
            width,
            height,
            depth,
            data: vec![value; len],
        })
    }

    /// Creates a volume from existing values in slice-major, row-major order.
    pub fn from_data(width: usize, height: usize, depth: usize, data: Vec<f32>) -> Result<Self> {
        let expected = checked_len(width, height, depth)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depth,
            data,
        })
    }

    /// Zero-filled volume with the same shape as `other`.
    pub(crate) fn zeros_like(other: &FloatVolume) -> Self {
        Self {
            width: other.width,
            height: other.height,
            depth: other.depth,
            data: vec![0.0; other.data.len()],
        }
    }

    /// Shape as `(width, height, depth)`.
    pub fn dim(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Total voxel count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the volume holds zero voxels. Always false for a constructed volume.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Linear index of the voxel at `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.width * (y + self.height * z)
    }

    /// Value at `(x, y, z)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[self.index(x, y, z)]
    }

    /// Sets the value at `(x, y, z)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) {
        let i = self.index(x, y, z);
        self.data[i] = value;
    }

    /// Whether `other` has the same shape.
    pub fn same_shape(&self, other: &FloatVolume) -> bool {
        self.dim() == other.dim()
    }

    /// Values in storage order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the volume, returning its values in storage order.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Maximum value over all voxels.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.threshold, 128);
        assert!(!cfg.inverse);
        assert!(!cfg.mask_trim);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_builders_compose() {
        let cfg = Config::new(10).with_inverse(true).with_mask_trim(true);
        assert_eq!(cfg.threshold, 10);
        assert!(cfg.inverse);
        assert!(cfg.mask_trim);
    }

    #[test]
    fn config_rejects_zero_threshold() {
        let cfg = Config::default().with_threshold(0);
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidThreshold { threshold: 0 })
        ));
    }

    #[test]
    fn classification_follows_threshold_and_inverse() {
        let cfg = Config::new(128);
        assert!(cfg.is_foreground(128));
        assert!(cfg.is_foreground(255));
        assert!(cfg.is_background(127));
        assert!(cfg.is_background(0));

        let inv = cfg.with_inverse(true);
        assert!(inv.is_background(128));
        assert!(inv.is_foreground(0));
    }

    #[test]
    fn binary_volume_rejects_zero_dimension() {
        assert!(matches!(
            BinaryVolume::new(0, 4, 4, Vec::new()),
            Err(Error::InvalidShape { width: 0, .. })
        ));
    }

    #[test]
    fn binary_volume_rejects_short_buffer() {
        let err = BinaryVolume::new(2, 2, 2, vec![0; 7]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSize {
                expected: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn index_is_slice_major_row_major() {
        let vol = FloatVolume::new(3, 4, 5).unwrap();
        assert_eq!(vol.index(0, 0, 0), 0);
        assert_eq!(vol.index(2, 0, 0), 2);
        assert_eq!(vol.index(0, 1, 0), 3);
        assert_eq!(vol.index(0, 0, 1), 12);
        assert_eq!(vol.index(2, 3, 4), 3 * 4 * 5 - 1);
    }

    #[test]
    fn float_volume_get_set_roundtrip() {
        let mut vol = FloatVolume::new(4, 3, 2).unwrap();
        vol.set(1, 2, 1, 7.5);
        assert_eq!(vol.get(1, 2, 1), 7.5);
        assert_eq!(vol.max_value(), 7.5);
    }

    #[test]
    fn same_shape_compares_all_dimensions() {
        let a = FloatVolume::new(4, 3, 2).unwrap();
        let b = FloatVolume::new(4, 3, 2).unwrap();
        let c = FloatVolume::new(4, 2, 3).unwrap();
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }
}
