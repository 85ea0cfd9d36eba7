//! Label maps and their one-hot channel encoding

use crate::error::{MetricError, Result};

/// Row-major map of per-pixel class identifiers for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl LabelMap {
    /// Wrap a row-major buffer of `width * height` class identifiers
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(MetricError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A map where every pixel carries `class`
    pub fn filled(width: u32, height: u32, class: u8) -> Self {
        Self {
            width,
            height,
            data: vec![class; width as usize * height as usize],
        }
    }

    /// Build a map by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Class identifier at `(x, y)`
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// The raw row-major buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// One boolean channel per class; channel 0 is background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneHotMask {
    width: u32,
    height: u32,
    channels: Vec<Vec<bool>>,
}

impl OneHotMask {
    /// Expand a label map into `n_channels` boolean channels
    ///
    /// Fails when a pixel value has no channel.
    pub fn encode(map: &LabelMap, n_channels: usize) -> Result<Self> {
        let pixels = map.data.len();
        let mut channels = vec![vec![false; pixels]; n_channels];

        for (index, &value) in map.data.iter().enumerate() {
            let class = value as usize;
            if class >= n_channels {
                let width = map.width.max(1) as usize;
                return Err(MetricError::ClassOutOfRange {
                    value,
                    x: (index % width) as u32,
                    y: (index / width) as u32,
                    n_channels,
                });
            }
            channels[class][index] = true;
        }

        Ok(Self {
            width: map.width,
            height: map.height,
            channels,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of channels, background included
    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    /// Row-major pixels of one channel
    pub fn channel(&self, index: usize) -> &[bool] {
        &self.channels[index]
    }

    /// Whether no pixel belongs to the channel
    pub fn is_channel_empty(&self, index: usize) -> bool {
        !self.channels[index].iter().any(|&set| set)
    }

    /// Fail unless `other` has the same dimensions and channel count
    pub fn check_compatible(&self, other: &OneHotMask) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(MetricError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: other.width,
                actual_height: other.height,
            });
        }
        if self.channels.len() != other.channels.len() {
            return Err(MetricError::ChannelMismatch {
                expected: self.channels.len(),
                actual: other.channels.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_checked() {
        assert!(LabelMap::new(2, 2, vec![0; 3]).is_err());
        assert!(LabelMap::new(2, 2, vec![0; 4]).is_ok());
    }

    #[test]
    fn test_encode_channels() {
        let map = LabelMap::new(2, 2, vec![0, 1, 2, 1]).unwrap();
        let mask = OneHotMask::encode(&map, 4).unwrap();

        assert_eq!(mask.n_channels(), 4);
        assert_eq!(mask.channel(0), &[true, false, false, false]);
        assert_eq!(mask.channel(1), &[false, true, false, true]);
        assert_eq!(mask.channel(2), &[false, false, true, false]);
        assert!(mask.is_channel_empty(3));
        assert!(!mask.is_channel_empty(1));
    }

    #[test]
    fn test_encode_rejects_unknown_class() {
        let map = LabelMap::new(3, 1, vec![0, 0, 7]).unwrap();
        assert_eq!(
            OneHotMask::encode(&map, 4),
            Err(MetricError::ClassOutOfRange {
                value: 7,
                x: 2,
                y: 0,
                n_channels: 4
            })
        );
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let map = LabelMap::from_fn(3, 2, |x, y| (y * 3 + x) as u8);
        assert_eq!(map.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(map.get(1, 1), 4);
    }

    #[test]
    fn test_compatibility() {
        let a = OneHotMask::encode(&LabelMap::filled(2, 2, 0), 3).unwrap();
        let b = OneHotMask::encode(&LabelMap::filled(3, 2, 0), 3).unwrap();
        let c = OneHotMask::encode(&LabelMap::filled(2, 2, 0), 4).unwrap();
        assert!(a.check_compatible(&a).is_ok());
        assert!(a.check_compatible(&b).is_err());
        assert!(a.check_compatible(&c).is_err());
    }
}
