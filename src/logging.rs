//! 日志初始化模块.
//!
//! 双输出:
//! - console: 彩色, 可关闭
//! - file: 无色, 按天滚动, 输出到 `{directory}/{prefix}.{date}.log`
//!
//! 级别取自 `LoggingConfig::level`, `LC3FX_LOG` 环境变量可覆盖.
//! 各子 crate 通过 `log` 宏输出, 由 tracing-subscriber 的 log 桥接统一收集.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// 覆盖日志级别的环境变量
pub const LOG_ENV: &str = "LC3FX_LOG";

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 日志级别 (EnvFilter 语法)
    #[serde(default = "default_level")]
    pub level: String,
    /// 日志目录
    #[serde(default = "default_directory")]
    pub directory: String,
    /// 日志文件前缀
    #[serde(default = "default_prefix")]
    pub file_prefix: String,
    /// 是否同时输出到控制台
    #[serde(default = "default_true")]
    pub console: bool,
}

fn default_level() -> String {
    "info".into()
}

fn default_directory() -> String {
    "logs".into()
}

fn default_prefix() -> String {
    "lc3fx".into()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: default_directory(),
            file_prefix: default_prefix(),
            console: default_true(),
        }
    }
}

impl LoggingConfig {
    /// 按 -v 次数生成配置: 0=info, 1=debug, 2+=trace
    pub fn with_verbosity(verbosity: u8) -> Self {
        Self {
            level: level_for_verbosity(verbosity).into(),
            ..Self::default()
        }
    }
}

/// -v 次数对应的级别
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// 初始化全局日志. 全局订阅器只能设置一次, 重复调用返回错误.
pub fn init(config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory)
        .with_context(|| format!("创建日志目录失败, path={}", config.directory))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(&config.directory)
        .context("创建日志文件失败")?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    LOG_GUARD.set(guard).ok();

    let make_filter =
        || EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));
    let file_layer = fmt::Layer::default()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(LineFormatter { ansi: false })
        .with_filter(make_filter());

    let console_layer = config.console.then(|| {
        fmt::Layer::default()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .event_format(LineFormatter { ansi: true })
            .with_filter(make_filter())
    });

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("全局日志订阅器已存在")?;
    Ok(())
}

/// 单行格式: 时间戳、级别、源码位置与字段
struct LineFormatter {
    ansi: bool,
}

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let meta = event.metadata();
        write!(
            writer,
            "[{:02}-{:02} {:02}:{:02}:{:02}.{:03}] ",
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis()
        )?;
        if self.ansi {
            let color = match *meta.level() {
                tracing::Level::ERROR => "\x1b[31m",
                tracing::Level::WARN => "\x1b[33m",
                tracing::Level::INFO => "\x1b[32m",
                _ => "\x1b[34m",
            };
            write!(writer, "{}{:5}\x1b[0m ", color, meta.level().to_string())?;
        } else {
            write!(writer, "{:5} ", meta.level().to_string())?;
        }
        write!(
            writer,
            "{}:{} > ",
            meta.file().unwrap_or("unknown"),
            meta.line().unwrap_or(0)
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
