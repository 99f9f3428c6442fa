/// Btop Monitor - 公共库
/// 
/// 提供指示器共享的类型、错误处理、格式化工具函数等

pub mod errors;
pub mod models;
pub mod utils;

// 重新导出常用类型
pub use errors::{Error, Result};
pub use models::{MonitorType, PanelPosition, Severity};
