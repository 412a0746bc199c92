use std::time::Duration;

/// 服务配置 - 预订协调核心的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 文件由 [`Config::load`] 读取)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/venue/edge | 工作目录 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，存在时写滚动日志文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | EXPIRY_SWEEP_INTERVAL_SECS | 60 | 超时检查周期(秒) |
/// | EXPIRY_THRESHOLD_MINUTES | 30 | 预计到店后多少分钟视为超时 |
/// | DEFAULT_PARTY_SIZE | 2 | 新建预订默认人数 |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 超时检查周期
    pub expiry_sweep_interval: Duration,
    /// 超时阈值 (分钟)
    pub expiry_threshold_minutes: i64,
    /// 新建预订默认人数
    pub default_party_size: u32,
}

impl Config {
    /// 读取 `.env` 后从环境变量加载配置
    pub fn load() -> Self {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Self::from_env()
    }

    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/venue/edge".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            expiry_sweep_interval: Duration::from_secs(
                std::env::var("EXPIRY_SWEEP_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|secs: &u64| *secs > 0)
                    .unwrap_or(60),
            ),
            expiry_threshold_minutes: std::env::var("EXPIRY_THRESHOLD_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            default_party_size: std::env::var("DEFAULT_PARTY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &u32| *n > 0)
                .unwrap_or(2),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    /// 固定默认值，不读取环境变量 (测试用)
    fn default() -> Self {
        Self {
            work_dir: "/var/lib/venue/edge".into(),
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
            expiry_sweep_interval: Duration::from_secs(60),
            expiry_threshold_minutes: 30,
            default_party_size: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.expiry_sweep_interval, Duration::from_secs(60));
        assert_eq!(config.expiry_threshold_minutes, 30);
        assert_eq!(config.default_party_size, 2);
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
