/// 指标采样器
///
/// 从 procfs 读取累计计数器，保存上一次采样，计算百分比与速率。
/// 所有读取失败都在这里转换为 None，调用方不会看到错误。

use common::utils::round_percent;
use common::{MonitorType, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

use super::procfs::{self, ProcFs};
use super::types::{
    CpuSample, DetailedStats, InterfaceTraffic, LoadAverage, MemoryDetails, MetricSnapshot,
    NetSample, NetworkDetails, NetworkRate, SwapDetails, Uptime,
};

pub struct MetricSampler {
    procfs: ProcFs,
    /// 单调时钟起点
    epoch: Instant,
    last_cpu: Option<CpuSample>,
    last_net: Option<NetSample>,
}

impl MetricSampler {
    /// 使用自定义 procfs 根目录（测试时指向临时目录）
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::with_procfs(ProcFs::new(root))
    }

    pub fn with_procfs(procfs: ProcFs) -> Self {
        Self {
            procfs,
            epoch: Instant::now(),
            last_cpu: None,
            last_net: None,
        }
    }

    /// 当前单调时间（微秒）
    pub fn now_micros(&self) -> i64 {
        i64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(i64::MAX)
    }

    /// 清空保存的采样，下一次增量指标重新预热
    pub fn destroy(&mut self) {
        self.last_cpu = None;
        self.last_net = None;
    }

    /// 采集面板需要的指标
    pub fn sample(&mut self, monitors: &[MonitorType], now_micros: i64) -> MetricSnapshot {
        let mut snapshot = MetricSnapshot::default();
        for monitor in monitors {
            match monitor {
                MonitorType::Cpu => snapshot.cpu = self.cpu_usage(),
                MonitorType::Memory => snapshot.memory = self.memory_usage(),
                MonitorType::Swap => snapshot.swap = self.swap_usage(),
                MonitorType::Net => snapshot.network = self.network_usage_at(now_micros),
                MonitorType::Load => {
                    snapshot.load = self.load_average();
                    snapshot.cpu_cores = self.cpu_core_count();
                }
            }
        }
        snapshot
    }

    /// CPU 使用率；首次调用只记录基准，返回 None
    pub fn cpu_usage(&mut self) -> Option<u8> {
        degrade("CPU", self.try_cpu_usage()).flatten()
    }

    fn try_cpu_usage(&mut self) -> Result<Option<u8>> {
        let current = procfs::parse_cpu_sample(&self.procfs.read(procfs::STAT)?)?;
        let previous = self.last_cpu.replace(current);

        let Some(prev) = previous else {
            debug!("CPU 首次采样，等待下一次计算增量");
            return Ok(None);
        };

        let idle_delta = current.idle_ticks.saturating_sub(prev.idle_ticks);
        let total_delta = current.total_ticks.saturating_sub(prev.total_ticks);
        if total_delta == 0 {
            return Ok(Some(0));
        }

        let busy = total_delta.saturating_sub(idle_delta);
        Ok(Some(round_percent(busy as f64, total_delta as f64)))
    }

    /// 内存使用率；MemTotal 为 0 时返回 None
    pub fn memory_usage(&self) -> Option<u8> {
        degrade("内存", self.try_memory_usage()).flatten()
    }

    fn try_memory_usage(&self) -> Result<Option<u8>> {
        let content = self.procfs.read(procfs::MEMINFO)?;
        let total = procfs::meminfo_value(&content, "MemTotal:");
        let available = procfs::meminfo_value(&content, "MemAvailable:");
        if total == 0 {
            return Ok(None);
        }
        let used = total.saturating_sub(available);
        Ok(Some(round_percent(used as f64, total as f64)))
    }

    /// 交换分区使用率；未配置交换分区时为 0
    pub fn swap_usage(&self) -> Option<u8> {
        degrade("交换分区", self.try_swap_usage())
    }

    fn try_swap_usage(&self) -> Result<u8> {
        let content = self.procfs.read(procfs::MEMINFO)?;
        let total = procfs::meminfo_value(&content, "SwapTotal:");
        let free = procfs::meminfo_value(&content, "SwapFree:");
        if total == 0 {
            return Ok(0);
        }
        let used = total.saturating_sub(free);
        Ok(round_percent(used as f64, total as f64))
    }

    /// 网络速率，`now_micros` 为调用方提供的单调时间
    pub fn network_usage_at(&mut self, now_micros: i64) -> Option<NetworkRate> {
        degrade("网络", self.try_network_usage(now_micros)).flatten()
    }

    fn try_network_usage(&mut self, now_micros: i64) -> Result<Option<NetworkRate>> {
        let interfaces = procfs::parse_net_dev(&self.procfs.read(procfs::NET_DEV)?);
        let (rx_bytes, tx_bytes) = traffic_totals(&interfaces)?;

        let Some(prev) = self.last_net else {
            debug!("网络首次采样，等待下一次计算速率");
            self.last_net = Some(NetSample {
                rx_bytes,
                tx_bytes,
                timestamp_micros: now_micros,
            });
            return Ok(None);
        };

        let elapsed_micros = now_micros.saturating_sub(prev.timestamp_micros);
        if elapsed_micros <= 0 {
            // 时间戳不能回退，否则下一次的时间差可能为负
            debug!(elapsed_micros, "网络采样时间差非正，跳过本次计算");
            self.last_net = Some(NetSample {
                rx_bytes,
                tx_bytes,
                timestamp_micros: prev.timestamp_micros.max(now_micros),
            });
            return Ok(None);
        }

        if rx_bytes < prev.rx_bytes || tx_bytes < prev.tx_bytes {
            debug!("网络计数器回退（网卡重置或移除），本次速率按 0 计算");
        }

        let seconds = elapsed_micros as f64 / 1_000_000.0;
        let rate = NetworkRate {
            rx_per_sec: rx_bytes.saturating_sub(prev.rx_bytes) as f64 / seconds,
            tx_per_sec: tx_bytes.saturating_sub(prev.tx_bytes) as f64 / seconds,
        };

        self.last_net = Some(NetSample {
            rx_bytes,
            tx_bytes,
            timestamp_micros: now_micros,
        });

        Ok(Some(rate))
    }

    /// 逻辑 CPU 数
    pub fn cpu_core_count(&self) -> Option<usize> {
        let count = degrade("CPU 核心数", self.procfs.read(procfs::CPUINFO))
            .map(|content| procfs::count_processors(&content))?;
        (count > 0).then_some(count)
    }

    /// 1/5/15 分钟负载
    pub fn load_average(&self) -> Option<LoadAverage> {
        degrade(
            "负载",
            self.procfs
                .read(procfs::LOADAVG)
                .and_then(|content| procfs::parse_loadavg(&content)),
        )
    }

    /// 开机时长
    pub fn uptime(&self) -> Option<Uptime> {
        degrade(
            "开机时长",
            self.procfs
                .read(procfs::UPTIME)
                .and_then(|content| procfs::parse_uptime_seconds(&content))
                .map(Uptime::from_seconds),
        )
    }

    /// 内存详情
    pub fn memory_details(&self) -> Option<MemoryDetails> {
        let content = degrade("内存详情", self.procfs.read(procfs::MEMINFO))?;
        let bytes = |key: &str| procfs::kib_to_bytes(procfs::meminfo_value(&content, key));

        let total = bytes("MemTotal:")?;
        let available = bytes("MemAvailable:")?;
        let used = total.saturating_sub(available);

        Some(MemoryDetails {
            total,
            used,
            free: bytes("MemFree:")?,
            available,
            buffers: bytes("Buffers:")?,
            cached: bytes("Cached:")?,
            percent: round_percent(used as f64, total as f64),
        })
    }

    /// 交换分区详情
    pub fn swap_details(&self) -> Option<SwapDetails> {
        let content = degrade("交换分区详情", self.procfs.read(procfs::MEMINFO))?;
        let total = procfs::kib_to_bytes(procfs::meminfo_value(&content, "SwapTotal:"))?;
        let free = procfs::kib_to_bytes(procfs::meminfo_value(&content, "SwapFree:"))?;
        let used = total.saturating_sub(free);

        Some(SwapDetails {
            total,
            used,
            free,
            percent: round_percent(used as f64, total as f64),
        })
    }

    /// 各网卡累计流量，`active_only` 时只保留有流量的网卡
    pub fn network_details(&self, active_only: bool) -> Option<NetworkDetails> {
        let content = degrade("网络详情", self.procfs.read(procfs::NET_DEV))?;
        let interfaces = procfs::parse_net_dev(&content);

        let (rx_total, tx_total) = degrade("网络详情", traffic_totals(&interfaces))?;
        let interfaces = interfaces
            .into_iter()
            .filter(|i| !active_only || i.has_traffic())
            .collect();

        Some(NetworkDetails {
            rx_total,
            tx_total,
            interfaces,
        })
    }

    /// 悬停详情；与面板共享 CPU 和网络的上一次采样
    pub fn detailed_stats(&mut self, now_micros: i64) -> DetailedStats {
        DetailedStats {
            hostname: hostname::get().ok().and_then(|h| h.into_string().ok()),
            sampled_at: chrono::Utc::now(),
            cpu: self.cpu_usage(),
            cpu_cores: self.cpu_core_count(),
            load: self.load_average(),
            memory: self.memory_details(),
            swap: self.swap_details(),
            network: self.network_details(true),
            network_rate: self.network_usage_at(now_micros),
            uptime: self.uptime(),
        }
    }
}

/// 所有网卡的收发字节合计
fn traffic_totals(interfaces: &[InterfaceTraffic]) -> Result<(u64, u64)> {
    let rx: Vec<u64> = interfaces.iter().map(|i| i.rx_bytes).collect();
    let tx: Vec<u64> = interfaces.iter().map(|i| i.tx_bytes).collect();
    Ok((procfs::checked_sum(&rx)?, procfs::checked_sum(&tx)?))
}

/// 读取失败降级为 None 并记录日志
fn degrade<T>(metric: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("读取{}失败: {}", metric, e);
            None
        }
    }
}
