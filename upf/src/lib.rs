mod data;
mod upf;
mod userplane;

pub use data::{Config, DiagnosticsConfig, StatsConfig, load_config_file};
pub use upf::Upf;
pub use userplane::{FrameSource, VerdictStats, parse_replay};
