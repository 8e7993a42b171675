use crate::core::errors::ConfigError;
use std::env;
use std::str::FromStr;
use tracing::Level;

/// Bubble detection configuration
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Binarization threshold separating bright bubble interiors from ink
    pub threshold: u8,
    /// Strict lower bound on candidate outline area (px^2)
    pub min_area: f64,
    /// Strict upper bound on candidate outline area (px^2)
    pub max_area: f64,
    /// Polygon simplification tolerance as a fraction of outline arc length
    pub approx_epsilon_ratio: f64,
    /// Vertical tolerance when bucketing bubbles into reading rows (px)
    pub band_tolerance: i32,
}

/// Recognition loop configuration
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// Extra pixels around each bounding rectangle when cropping
    pub crop_padding: u32,
    /// Integer enlargement factor applied before OCR
    pub upscale_factor: u32,
    /// Median filter radius used for denoising
    pub denoise_radius: u32,
    /// Pixels removed from each side per shrink attempt
    pub shrink_step: u32,
    /// Maximum shrink attempts after the initial OCR call
    pub max_retries: u32,
}

/// Text normalization configuration
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Whether digits survive the allowed-character filter
    pub allow_digits: bool,
    /// Newline-separated word list backing the dictionary capability
    pub word_list_path: String,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub detection: DetectionConfig,
    pub recognition: RecognitionConfig,
    pub normalize: NormalizeConfig,
    pub log_level: Level,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: 230,
            min_area: 4_000.0,
            max_area: 100_000.0,
            approx_epsilon_ratio: 0.0025,
            band_tolerance: 150,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            crop_padding: 0,
            upscale_factor: 2,
            denoise_radius: 1,
            shrink_step: 5,
            max_retries: 3,
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            allow_digits: true,
            word_list_path: "/usr/share/dict/words".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            recognition: RecognitionConfig::default(),
            normalize: NormalizeConfig::default(),
            log_level: Level::INFO,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Self::load_from_env();
        config.validate()?;
        Ok(config)
    }

    fn load_from_env() -> Self {
        let defaults = Self::default();

        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| match s.to_lowercase().as_str() {
                "trace" => Some(Level::TRACE),
                "debug" => Some(Level::DEBUG),
                "info" => Some(Level::INFO),
                "warn" | "warning" => Some(Level::WARN),
                "error" => Some(Level::ERROR),
                _ => None,
            })
            .unwrap_or(Level::INFO);

        Self {
            detection: DetectionConfig {
                threshold: parse_env("BUBBLE_THRESHOLD", defaults.detection.threshold),
                min_area: parse_env("MIN_BUBBLE_AREA", defaults.detection.min_area),
                max_area: parse_env("MAX_BUBBLE_AREA", defaults.detection.max_area),
                approx_epsilon_ratio: defaults.detection.approx_epsilon_ratio,
                band_tolerance: parse_env("ROW_BAND_TOLERANCE", defaults.detection.band_tolerance),
            },
            recognition: RecognitionConfig {
                crop_padding: parse_env("CROP_PADDING", defaults.recognition.crop_padding),
                upscale_factor: parse_env("OCR_UPSCALE_FACTOR", defaults.recognition.upscale_factor),
                denoise_radius: defaults.recognition.denoise_radius,
                shrink_step: parse_env("OCR_SHRINK_STEP", defaults.recognition.shrink_step),
                max_retries: parse_env("OCR_MAX_RETRIES", defaults.recognition.max_retries),
            },
            normalize: NormalizeConfig {
                allow_digits: parse_env("ALLOW_DIGITS", defaults.normalize.allow_digits),
                word_list_path: env::var("WORD_LIST_PATH")
                    .unwrap_or(defaults.normalize.word_list_path),
            },
            log_level,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let detection = &self.detection;
        if detection.min_area <= 0.0 || detection.min_area >= detection.max_area {
            return Err(ConfigError::InvalidAreaBounds {
                min: detection.min_area,
                max: detection.max_area,
            });
        }
        if detection.approx_epsilon_ratio <= 0.0 {
            return Err(ConfigError::InvalidApproxRatio(detection.approx_epsilon_ratio));
        }
        if detection.band_tolerance <= 0 {
            return Err(ConfigError::InvalidBandTolerance(detection.band_tolerance));
        }

        let recognition = &self.recognition;
        if recognition.upscale_factor < 1 {
            return Err(ConfigError::InvalidUpscaleFactor(recognition.upscale_factor));
        }
        if recognition.shrink_step == 0 {
            return Err(ConfigError::InvalidShrinkStep);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_area_bounds() {
        let mut config = Config::default();
        config.detection.min_area = 200_000.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAreaBounds { .. })
        ));
    }

    #[test]
    fn rejects_zero_band_tolerance() {
        let mut config = Config::default();
        config.detection.band_tolerance = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBandTolerance(0))
        ));
    }

    #[test]
    fn rejects_zero_upscale_factor() {
        let mut config = Config::default();
        config.recognition.upscale_factor = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUpscaleFactor(0))
        ));
    }
}
