pub mod config;
pub mod error;
pub mod logging;
pub mod params;
pub mod record;

pub use config::Config;
pub use error::*;
pub use logging::LogLevel;
pub use params::*;
pub use record::*;
