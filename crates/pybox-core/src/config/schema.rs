//! Config structs grouped by concern, loaded from environment variables.

use super::loader::{env_bool, env_optional, env_or, env_u64, load_dotenv};
use std::path::PathBuf;

/// Interpreter and subprocess timing configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Python interpreter used both for pip and for program execution.
    pub python: PathBuf,
    /// Wall-clock bound for a single `pip install` subprocess.
    pub pip_timeout_secs: u64,
    /// Default program execution timeout when the caller passes none.
    pub default_timeout_secs: u64,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            python: PathBuf::from(env_or("PYBOX_PYTHON", || "python3".to_string())),
            pip_timeout_secs: env_u64("PYBOX_PIP_TIMEOUT_SECS", 60),
            default_timeout_secs: env_u64("PYBOX_TIMEOUT_SECS", 30),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Durable output sink for harvested artifacts.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Flat directory artifacts are copied into. May already contain
    /// unrelated files from prior requests.
    pub output_dir: PathBuf,
}

impl OutputConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        let dir = env_optional("PYBOX_OUTPUT_DIR").unwrap_or_else(|| "output".to_string());
        Self {
            output_dir: PathBuf::from(dir),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Renderer geometry written into `manim.cfg` for augmented runs.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub frame_rate: u32,
    /// Output container format (primary format for artifact selection).
    pub format: String,
}

impl RenderConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            pixel_width: env_u64("PYBOX_RENDER_WIDTH", 1280) as u32,
            pixel_height: env_u64("PYBOX_RENDER_HEIGHT", 720) as u32,
            frame_rate: env_u64("PYBOX_RENDER_FPS", 30) as u32,
            format: env_or("PYBOX_RENDER_FORMAT", || "mp4".to_string()),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Logging switches. When `quiet` is set only WARN and above are logged.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            quiet: env_bool("PYBOX_QUIET", false),
            log_level: env_or("PYBOX_LOG_LEVEL", || "pybox=info".to_string()),
            log_json: env_bool("PYBOX_LOG_JSON", false),
        }
    }
}
