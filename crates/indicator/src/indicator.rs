/// 面板指示器
///
/// 按刷新间隔驱动采样器并输出面板内容，收到 SIGHUP 时重新加载配置

use common::{Error, Result};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::metrics::{DetailedStats, MetricSampler};
use crate::panel::{render_cells, render_line, PanelCell};

/// 面板输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct Indicator<W: Write> {
    sampler: MetricSampler,
    settings: Settings,
    /// 重新加载时使用的配置文件
    config_path: Option<PathBuf>,
    format: OutputFormat,
    out: W,
}

impl<W: Write> Indicator<W> {
    pub fn new(
        sampler: MetricSampler,
        settings: Settings,
        config_path: Option<PathBuf>,
        format: OutputFormat,
        out: W,
    ) -> Self {
        Self {
            sampler,
            settings,
            config_path,
            format,
            out,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// 采样一次并输出面板内容
    pub fn update_display(&mut self) -> Result<Vec<PanelCell>> {
        let now = self.sampler.now_micros();
        let snapshot = self.sampler.sample(&self.settings.active_monitors(), now);
        debug!(?snapshot, "采样完成");

        let cells = render_cells(&snapshot, &self.settings);
        self.write_cells(&cells)?;
        Ok(cells)
    }

    fn write_cells(&mut self, cells: &[PanelCell]) -> Result<()> {
        let line = match self.format {
            OutputFormat::Text => render_line(cells),
            OutputFormat::Json => serde_json::to_string(cells)?,
        };
        writeln!(self.out, "{}", line)
            .and_then(|_| self.out.flush())
            .map_err(|e| Error::Other(e.into()))
    }

    /// 重新加载配置，失败时保留旧配置
    pub fn reload_settings(&mut self) -> bool {
        match Settings::load(self.config_path.as_deref()) {
            Ok(settings) => {
                info!("🔄 配置已重新加载");
                self.settings = settings;
                true
            }
            Err(e) => {
                warn!("重新加载配置失败，继续使用旧配置: {}", e);
                false
            }
        }
    }

    /// 处理 SIGHUP：刷新间隔变化时重建 ticker，否则立即刷新一次
    fn on_hangup(&mut self, refresh: &mut Duration, ticker: &mut Interval) -> Result<()> {
        if !self.reload_settings() {
            return Ok(());
        }
        let new_refresh = self.settings.refresh_interval();
        if new_refresh != *refresh {
            info!("⏱️ 刷新间隔变更为 {} ms", new_refresh.as_millis());
            *refresh = new_refresh;
            // 新的 ticker 会立即触发一次刷新
            *ticker = new_ticker(new_refresh);
        } else {
            self.update_display()?;
        }
        Ok(())
    }

    /// 运行刷新循环，直到收到停止信号或达到 `max_ticks`
    pub async fn run(&mut self, shutdown: CancellationToken, max_ticks: Option<u64>) -> Result<()> {
        let mut refresh = self.settings.refresh_interval();
        let mut ticker = new_ticker(refresh);
        let mut hangup = signal(SignalKind::hangup()).map_err(|e| Error::Other(e.into()))?;
        let mut ticks = 0u64;

        info!("⏱️ 开始采样，刷新间隔 {} ms", refresh.as_millis());

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("🛑 停止采样");
                    break;
                }
                _ = hangup.recv() => {
                    self.on_hangup(&mut refresh, &mut ticker)?;
                }
                _ = ticker.tick() => {
                    self.update_display()?;
                    ticks += 1;
                    if max_ticks.is_some_and(|max| ticks >= max) {
                        break;
                    }
                }
            }
        }

        self.sampler.destroy();
        Ok(())
    }
}

fn new_ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// 预热一次后等待 `warmup`，返回第二次采集的详细统计
pub async fn collect_detailed(sampler: &mut MetricSampler, warmup: Duration) -> DetailedStats {
    let _ = sampler.detailed_stats(sampler.now_micros());
    tokio::time::sleep(warmup).await;
    sampler.detailed_stats(sampler.now_micros())
}
