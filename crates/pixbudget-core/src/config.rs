//! Tunable settings for the budget search.
//!
//! All knobs live on [`CompressOptions`] so the WASM layer can pass a plain
//! JavaScript object through `serde-wasm-bindgen`. Missing fields fall back to
//! [`CompressOptions::default`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::format::ImageFormat;

/// JPEG quality ladder, highest first. 0.92 matches the browser canvas default.
pub const DEFAULT_JPEG_QUALITY_STEPS: [f32; 5] = [0.92, 0.8, 0.7, 0.6, 0.5];

/// PNG posterize ladder: 8, 6, 5 and 4 bits per channel.
pub const DEFAULT_PNG_QUALITY_STEPS: [f32; 4] = [1.0, 0.75, 0.625, 0.5];

/// Overshoot ratio past which the quality ladder jumps straight to its floor.
pub const DEFAULT_QUALITY_REACH: f32 = 3.0;

/// Smallest longer-edge length (pixels) the search will scale down to.
pub const DEFAULT_MIN_DIMENSION: u32 = 16;

/// Maximum encoder invocations per search.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Decoded pixel ceiling (40 megapixels).
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 40_000_000;

/// Errors from [`CompressOptions::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{format} quality ladder is empty")]
    EmptyLadder { format: ImageFormat },

    #[error("{format} quality step {value} is outside (0, 1]")]
    LadderOutOfRange { format: ImageFormat, value: f32 },

    #[error("{format} quality ladder must be strictly descending")]
    LadderNotDescending { format: ImageFormat },

    #[error("min_dimension must be at least 1")]
    InvalidMinDimension,

    #[error("max_attempts must be between 1 and {max} (got {got})")]
    InvalidAttempts { got: u32, max: u32 },

    #[error("quality_reach must be a finite value >= 1 (got {0})")]
    InvalidReach(f32),

    #[error("max_source_pixels must be non-zero")]
    InvalidPixelLimit,
}

/// Upper bound accepted for `max_attempts`.
pub const MAX_ATTEMPTS_LIMIT: u32 = 32;

/// Options controlling decode limits and the budget search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressOptions {
    /// JPEG quality rungs in `(0, 1]`, strictly descending. The last is the floor.
    pub jpeg_quality_steps: Vec<f32>,
    /// PNG quality rungs in `(0, 1]`, strictly descending. Mapped to bits per channel.
    pub png_quality_steps: Vec<f32>,
    /// Overshoot ratio at which a quality-ladder step jumps to the floor.
    pub quality_reach: f32,
    /// Longer-edge floor for downscaling, in pixels. The shorter edge may go
    /// below it, down to 1 pixel.
    pub min_dimension: u32,
    /// Maximum number of encoder invocations.
    pub max_attempts: u32,
    /// Sources with more pixels than this are rejected before full decode.
    pub max_source_pixels: u64,
    /// Resample filter used when scaling down.
    pub resize_filter: FilterType,
    /// Output format; `None` keeps the source format.
    pub output_format: Option<ImageFormat>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            jpeg_quality_steps: DEFAULT_JPEG_QUALITY_STEPS.to_vec(),
            png_quality_steps: DEFAULT_PNG_QUALITY_STEPS.to_vec(),
            quality_reach: DEFAULT_QUALITY_REACH,
            min_dimension: DEFAULT_MIN_DIMENSION,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_source_pixels: DEFAULT_MAX_SOURCE_PIXELS,
            resize_filter: FilterType::default(),
            output_format: None,
        }
    }
}

impl CompressOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Quality ladder for the given output format.
    pub fn quality_steps(&self, format: ImageFormat) -> &[f32] {
        match format {
            ImageFormat::Jpeg => &self.jpeg_quality_steps,
            ImageFormat::Png => &self.png_quality_steps,
        }
    }

    /// Format the result is encoded in for a source of `source` format.
    pub fn output_format_for(&self, source: ImageFormat) -> ImageFormat {
        self.output_format.unwrap_or(source)
    }

    /// Check every field for consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for format in [ImageFormat::Jpeg, ImageFormat::Png] {
            validate_ladder(format, self.quality_steps(format))?;
        }

        if self.min_dimension == 0 {
            return Err(ConfigError::InvalidMinDimension);
        }

        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ConfigError::InvalidAttempts {
                got: self.max_attempts,
                max: MAX_ATTEMPTS_LIMIT,
            });
        }

        if !self.quality_reach.is_finite() || self.quality_reach < 1.0 {
            return Err(ConfigError::InvalidReach(self.quality_reach));
        }

        if self.max_source_pixels == 0 {
            return Err(ConfigError::InvalidPixelLimit);
        }

        Ok(())
    }
}

fn validate_ladder(format: ImageFormat, steps: &[f32]) -> Result<(), ConfigError> {
    if steps.is_empty() {
        return Err(ConfigError::EmptyLadder { format });
    }

    if let Some(&value) = steps
        .iter()
        .find(|q| !q.is_finite() || **q <= 0.0 || **q > 1.0)
    {
        return Err(ConfigError::LadderOutOfRange { format, value });
    }

    if steps.windows(2).any(|pair| pair[1] >= pair[0]) {
        return Err(ConfigError::LadderNotDescending { format });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert_eq!(CompressOptions::new().validate(), Ok(()));
    }

    #[test]
    fn test_default_filter_is_lanczos3() {
        assert_eq!(FilterType::default(), FilterType::Lanczos3);
        assert_eq!(CompressOptions::default().resize_filter, FilterType::default());
    }

    #[test]
    fn test_quality_steps_per_format() {
        let options = CompressOptions::default();
        assert_eq!(options.quality_steps(ImageFormat::Jpeg)[0], 0.92);
        assert_eq!(options.quality_steps(ImageFormat::Png)[0], 1.0);
    }

    #[test]
    fn test_output_format_defaults_to_source() {
        let mut options = CompressOptions::default();
        assert_eq!(options.output_format_for(ImageFormat::Png), ImageFormat::Png);

        options.output_format = Some(ImageFormat::Jpeg);
        assert_eq!(options.output_format_for(ImageFormat::Png), ImageFormat::Jpeg);
    }

    #[test]
    fn test_empty_ladder_rejected() {
        let mut options = CompressOptions::default();
        options.png_quality_steps.clear();
        assert_eq!(
            options.validate(),
            Err(ConfigError::EmptyLadder {
                format: ImageFormat::Png
            })
        );
    }

    #[test]
    fn test_out_of_range_step_rejected() {
        let mut options = CompressOptions::default();
        options.jpeg_quality_steps = vec![1.2, 0.5];
        assert!(matches!(
            options.validate(),
            Err(ConfigError::LadderOutOfRange { .. })
        ));

        options.jpeg_quality_steps = vec![0.5, 0.0];
        assert!(matches!(
            options.validate(),
            Err(ConfigError::LadderOutOfRange { .. })
        ));

        options.jpeg_quality_steps = vec![f32::NAN];
        assert!(matches!(
            options.validate(),
            Err(ConfigError::LadderOutOfRange { .. })
        ));
    }

    #[test]
    fn test_non_descending_ladder_rejected() {
        let mut options = CompressOptions::default();
        options.jpeg_quality_steps = vec![0.5, 0.5];
        assert_eq!(
            options.validate(),
            Err(ConfigError::LadderNotDescending {
                format: ImageFormat::Jpeg
            })
        );
    }

    #[test]
    fn test_attempt_bounds() {
        let mut options = CompressOptions::default();
        options.max_attempts = 0;
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidAttempts { got: 0, .. })
        ));

        options.max_attempts = MAX_ATTEMPTS_LIMIT + 1;
        assert!(options.validate().is_err());

        options.max_attempts = 1;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_min_dimension_and_reach() {
        let mut options = CompressOptions::default();
        options.min_dimension = 0;
        assert_eq!(options.validate(), Err(ConfigError::InvalidMinDimension));

        let mut options = CompressOptions::default();
        options.quality_reach = 0.5;
        assert!(matches!(options.validate(), Err(ConfigError::InvalidReach(_))));
    }

    #[test]
    fn test_pixel_limit() {
        let mut options = CompressOptions::default();
        options.max_source_pixels = 0;
        assert_eq!(options.validate(), Err(ConfigError::InvalidPixelLimit));
    }
}
