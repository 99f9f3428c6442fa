/// 共享数据模型
///
/// 定义监控类型、告警等级、面板位置等基础数据结构

use serde::{Deserialize, Serialize};

/// 监控类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MonitorType {
    Cpu,
    Memory,
    Swap,
    #[serde(alias = "network")]
    Net,
    Load,
}

impl MonitorType {
    /// 文本模式下的标签
    pub fn text_label(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Memory => "MEM",
            Self::Swap => "SWP",
            Self::Net => "NET",
            Self::Load => "LOAD",
        }
    }

    /// 图标模式下的符号图标名
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Cpu => "org.gnome.SystemMonitor-symbolic",
            Self::Memory => "drive-harddisk-solidstate-symbolic",
            Self::Swap => "drive-harddisk-system-symbolic",
            Self::Net => "network-wired-symbolic",
            Self::Load => "utilities-system-monitor-symbolic",
        }
    }
}

/// 告警等级（对应面板颜色）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// 按黄/红阈值对百分比分级
    pub fn from_percent(percent: f64, yellow_threshold: u8, red_threshold: u8) -> Self {
        if percent >= f64::from(red_threshold) {
            Self::Critical
        } else if percent >= f64::from(yellow_threshold) {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// 按上下行合计速率（MB/s）分级
    pub fn from_network_rate(rx_per_sec: f64, tx_per_sec: f64) -> Self {
        let combined_mbps = (rx_per_sec + tx_per_sec) / (1024.0 * 1024.0);
        if combined_mbps >= constants::NET_CRITICAL_MBPS {
            Self::Critical
        } else if combined_mbps >= constants::NET_WARNING_MBPS {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// 对应的样式类名
    pub fn style_class(&self) -> &'static str {
        match self {
            Self::Normal => "btop-monitor-normal",
            Self::Warning => "btop-monitor-warning",
            Self::Critical => "btop-monitor-critical",
        }
    }
}

/// 面板区域
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    Left,
    Center,
    #[default]
    Right,
}

impl PanelPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// 常量定义
pub mod constants {
    /// 默认刷新间隔（毫秒）
    pub const DEFAULT_REFRESH_RATE_MS: u64 = 1000;

    /// 默认黄色阈值（百分比）
    pub const DEFAULT_YELLOW_THRESHOLD: u8 = 50;

    /// 默认红色阈值（百分比）
    pub const DEFAULT_RED_THRESHOLD: u8 = 80;

    /// 网络告警阈值（MB/s）
    pub const NET_WARNING_MBPS: f64 = 10.0;

    /// 网络严重阈值（MB/s）
    pub const NET_CRITICAL_MBPS: f64 = 100.0;

    /// 自动检测终端的占位值
    pub const TERMINAL_AUTO: &str = "auto";

    /// 默认启动的监控程序
    pub const DEFAULT_BTOP_COMMAND: &str = "btop";

    /// 回环网卡名
    pub const LOOPBACK_INTERFACE: &str = "lo";
}
