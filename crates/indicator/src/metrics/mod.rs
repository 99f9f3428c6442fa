/// 系统指标采样模块

pub mod collector;
pub mod procfs;
pub mod types;

pub use collector::MetricSampler;
pub use types::{DetailedStats, MetricSnapshot, NetworkRate};
