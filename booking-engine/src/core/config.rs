use shared::models::Locale;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// 预约引擎配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，设置后按天滚动写文件 |
/// | BOOKING_LOCALE | en | 界面语言 (en / ar) |
/// | PACKAGE_COMMIT_MAX_RETRIES | 2 | 套餐提交失败后的重试次数 |
/// | PACKAGE_COMMIT_RETRY_DELAY_MS | 0 | 两次尝试之间的等待(毫秒) |
/// | RECONCILE_STAGGER_MS | 40 | 分阶段套餐同步时每阶段之间的间隔(毫秒) |
///
/// # 示例
///
/// ```ignore
/// LOG_LEVEL=debug BOOKING_LOCALE=ar cargo run -p booking-engine
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 界面语言
    pub locale: Locale,
    /// 套餐提交重试次数 (总尝试次数 = 重试次数 + 1)
    pub package_commit_max_retries: u32,
    /// 重试间隔 (毫秒)
    pub package_commit_retry_delay_ms: u64,
    /// 分阶段同步间隔 (毫秒)
    pub reconcile_stagger_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            log_dir: None,
            locale: Locale::En,
            package_commit_max_retries: 2,
            package_commit_retry_delay_ms: 0,
            reconcile_stagger_ms: 40,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            locale: std::env::var("BOOKING_LOCALE")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(defaults.locale),
            package_commit_max_retries: std::env::var("PACKAGE_COMMIT_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.package_commit_max_retries),
            package_commit_retry_delay_ms: std::env::var("PACKAGE_COMMIT_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.package_commit_retry_delay_ms),
            reconcile_stagger_ms: std::env::var("RECONCILE_STAGGER_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.reconcile_stagger_ms),
        }
    }

    /// 分阶段同步间隔
    pub fn reconcile_stagger(&self) -> Duration {
        Duration::from_millis(self.reconcile_stagger_ms)
    }

    /// 套餐提交使用的重试策略 (不含回调)
    pub fn package_commit_retry_policy<E>(&self) -> RetryPolicy<E> {
        RetryPolicy::new(self.package_commit_max_retries)
            .with_delay(Duration::from_millis(self.package_commit_retry_delay_ms))
    }
}
