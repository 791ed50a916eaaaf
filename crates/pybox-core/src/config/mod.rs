//! Environment-driven configuration.
//!
//! Split into `loader` (env access + `.env` support, unified fallback
//! logic) and `schema` (typed config structs grouped by concern).

mod loader;
mod schema;

pub use loader::{env_bool, env_optional, env_or, env_u64, load_dotenv};
pub use schema::{ObservabilityConfig, OutputConfig, RenderConfig, RuntimeConfig};
