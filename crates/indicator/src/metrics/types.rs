/// 采样数据结构

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// CPU 累计节拍（jiffies）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSample {
    pub idle_ticks: u64,
    pub total_ticks: u64,
}

/// 网络累计字节数及采样时刻（单调时钟，微秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetSample {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub timestamp_micros: i64,
}

/// 网络速率（字节/秒）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkRate {
    pub rx_per_sec: f64,
    pub tx_per_sec: f64,
}

/// 系统负载
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadAverage {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

impl fmt::Display for LoadAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} / {:.1} / {:.1}", self.load1, self.load5, self.load15)
    }
}

/// 开机时长
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Uptime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl Uptime {
    pub fn from_seconds(seconds: f64) -> Self {
        let total = if seconds.is_finite() && seconds > 0.0 {
            seconds.floor() as u64
        } else {
            0
        };
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
        }
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d {}h {}m", self.days, self.hours, self.minutes)
        } else if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

/// 单个网卡累计流量
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceTraffic {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl InterfaceTraffic {
    pub fn has_traffic(&self) -> bool {
        self.rx_bytes > 0 || self.tx_bytes > 0
    }
}

/// 内存详情（字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryDetails {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub percent: u8,
}

/// 交换分区详情（字节）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapDetails {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: u8,
}

impl SwapDetails {
    pub fn is_configured(&self) -> bool {
        self.total > 0
    }
}

/// 网络累计流量详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkDetails {
    pub rx_total: u64,
    pub tx_total: u64,
    pub interfaces: Vec<InterfaceTraffic>,
}

/// 单次 tick 的面板指标
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub cpu: Option<u8>,
    pub memory: Option<u8>,
    pub swap: Option<u8>,
    pub network: Option<NetworkRate>,
    pub load: Option<LoadAverage>,
    pub cpu_cores: Option<usize>,
}

/// 悬停详情
#[derive(Debug, Clone, Serialize)]
pub struct DetailedStats {
    pub hostname: Option<String>,
    pub sampled_at: DateTime<Utc>,
    pub cpu: Option<u8>,
    pub cpu_cores: Option<usize>,
    pub load: Option<LoadAverage>,
    pub memory: Option<MemoryDetails>,
    pub swap: Option<SwapDetails>,
    pub network: Option<NetworkDetails>,
    pub network_rate: Option<NetworkRate>,
    pub uptime: Option<Uptime>,
}
