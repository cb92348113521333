// ==========================================
// TB CareMap - 配置层
// ==========================================
// 职责: 驾驶舱运行参数的读取与校验
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod dashboard_config_trait;
pub mod error;
pub mod settings;

// 重导出核心配置管理器
pub use config_manager::{config_defaults, config_keys, ConfigManager};
pub use dashboard_config_trait::DashboardConfigReader;
pub use error::{ConfigError, ConfigResult};
pub use settings::DashboardSettings;
