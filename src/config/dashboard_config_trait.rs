// ==========================================
// TB CareMap - 驾驶舱配置读取 Trait
// ==========================================
// 职责: 定义驾驶舱所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::domain::types::FetchMode;
use async_trait::async_trait;

// ==========================================
// DashboardConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait DashboardConfigReader: Send + Sync {
    /// 获取高风险阈值
    ///
    /// # 返回
    /// - f64: programmatic_risk >= 阈值 的行计为高风险
    ///
    /// # 默认值
    /// - 8.0（合法区间 [0, 10]）
    async fn get_risk_threshold(&self) -> ConfigResult<f64>;

    /// 获取数据缓存时长（秒）
    ///
    /// # 默认值
    /// - 600
    async fn get_cache_ttl_secs(&self) -> ConfigResult<u64>;

    /// 获取预警列表展示条数
    ///
    /// # 默认值
    /// - 10
    async fn get_warning_display_limit(&self) -> ConfigResult<usize>;

    /// 获取取数模式
    ///
    /// # 默认值
    /// - STRICT
    async fn get_fetch_mode(&self) -> ConfigResult<FetchMode>;
}
