//! Compression configuration.

/// Supported compression backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionType {
    /// Identity pass-through: accumulated bytes are emitted verbatim,
    /// with no length prefix.
    None,
    /// Brotli.
    Brotli,
    /// Zstandard.
    #[default]
    Zstd,
}

impl CompressionType {
    /// Get the backend name as a string.
    pub fn name(self) -> &'static str {
        match self {
            CompressionType::None => "none",
            CompressionType::Brotli => "brotli",
            CompressionType::Zstd => "zstd",
        }
    }
}

/// Compression level presets, mapped per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionLevel {
    /// Optimized for speed over ratio.
    Fast,
    /// Balanced speed and ratio.
    #[default]
    Default,
    /// Optimized for ratio over speed.
    Best,
    /// Backend-specific numeric level, clamped to the backend's range.
    Custom(i32),
}

impl CompressionLevel {
    /// Convert to a numeric level for the given backend.
    pub fn to_level(self, compression_type: CompressionType) -> i32 {
        match compression_type {
            CompressionType::None => 0,
            CompressionType::Brotli => match self {
                CompressionLevel::Fast => 2,
                CompressionLevel::Default => 6,
                CompressionLevel::Best => 11,
                CompressionLevel::Custom(level) => level.clamp(0, 11),
            },
            CompressionType::Zstd => match self {
                CompressionLevel::Fast => 1,
                CompressionLevel::Default => 3,
                CompressionLevel::Best => 19,
                CompressionLevel::Custom(level) => level.clamp(1, 22),
            },
        }
    }
}

/// Options selecting the backend and its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressorOptions {
    /// Which backend compresses the payload.
    pub compression_type: CompressionType,
    /// How hard the backend works.
    pub level: CompressionLevel,
}

impl CompressorOptions {
    /// Options for the given backend at the default level.
    pub fn new(compression_type: CompressionType) -> Self {
        CompressorOptions {
            compression_type,
            ..CompressorOptions::default()
        }
    }

    /// Set the compression level.
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// The numeric level for the configured backend.
    pub fn numeric_level(&self) -> i32 {
        self.level.to_level(self.compression_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zstd() {
        let options = CompressorOptions::default();
        assert_eq!(options.compression_type, CompressionType::Zstd);
        assert_eq!(options.numeric_level(), 3);
    }

    #[test]
    fn test_custom_levels_clamped() {
        let brotli = CompressorOptions::new(CompressionType::Brotli)
            .with_level(CompressionLevel::Custom(99));
        assert_eq!(brotli.numeric_level(), 11);
        let zstd = CompressorOptions::new(CompressionType::Zstd)
            .with_level(CompressionLevel::Custom(0));
        assert_eq!(zstd.numeric_level(), 1);
    }

    #[test]
    fn test_identity_level_is_zero() {
        let options = CompressorOptions::new(CompressionType::None)
            .with_level(CompressionLevel::Best);
        assert_eq!(options.numeric_level(), 0);
    }
}
