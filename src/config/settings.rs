// ==========================================
// TB CareMap - 驾驶舱运行参数
// ==========================================
// 一次性从 DashboardConfigReader 汇总,运行期只读
// ==========================================

use crate::config::config_manager::config_defaults;
use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::config::error::ConfigResult;
use crate::domain::types::FetchMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    pub risk_threshold: f64,
    pub cache_ttl_secs: u64,
    pub warning_display_limit: usize,
    pub fetch_mode: FetchMode,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            risk_threshold: config_defaults::RISK_THRESHOLD,
            cache_ttl_secs: config_defaults::CACHE_TTL_SECS,
            warning_display_limit: config_defaults::WARNING_DISPLAY_LIMIT,
            fetch_mode: FetchMode::default(),
        }
    }
}

impl DashboardSettings {
    /// 从配置读取器加载全部参数
    pub async fn load(reader: &dyn DashboardConfigReader) -> ConfigResult<Self> {
        Ok(Self {
            risk_threshold: reader.get_risk_threshold().await?,
            cache_ttl_secs: reader.get_cache_ttl_secs().await?,
            warning_display_limit: reader.get_warning_display_limit().await?,
            fetch_mode: reader.get_fetch_mode().await?,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
