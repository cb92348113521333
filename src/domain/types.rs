// ==========================================
// TB CareMap - 领域类型定义
// ==========================================
// 职责: 告警分层、严重度标签等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 告警分层 (Alert Tier)
// ==========================================
// 每一行快照恰好落入一个分层
// 顺序: Adequate < Warning < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertTier {
    Adequate, // 库存充足
    Warning,  // 预警: 已标记风险,但尚未越过提前期
    Critical, // 严重: 到货前即会断货
}

impl AlertTier {
    /// 驾驶舱状态分布图使用的展示名称
    pub fn status_label(&self) -> &'static str {
        match self {
            AlertTier::Critical => "Critical Stockout",
            AlertTier::Warning => "Warning Level",
            AlertTier::Adequate => "Adequate Supply",
        }
    }
}

impl fmt::Display for AlertTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTier::Adequate => write!(f, "ADEQUATE"),
            AlertTier::Warning => write!(f, "WARNING"),
            AlertTier::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 严重告警子标签 (Severity Label)
// ==========================================
// 仅用于 Critical 分层: 缺口 > 7 天为 CRITICAL,否则 URGENT
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityLabel {
    Urgent,   // 紧急
    Critical, // 严重
}

impl fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityLabel::Urgent => write!(f, "URGENT"),
            SeverityLabel::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 取数模式 (Fetch Mode)
// ==========================================
// Strict: 任一数据集不可用即终止本次请求
// BestEffort: 不可用的数据集以空集合代替
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchMode {
    #[default]
    Strict,
    BestEffort,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Strict => write!(f, "STRICT"),
            FetchMode::BestEffort => write!(f, "BEST_EFFORT"),
        }
    }
}

impl FetchMode {
    /// 从字符串解析取数模式（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "STRICT" => Some(FetchMode::Strict),
            "BEST_EFFORT" | "BESTEFFORT" => Some(FetchMode::BestEffort),
            _ => None,
        }
    }
}

// ==========================================
// 数据集 (Dataset)
// ==========================================
// 对应数仓中的四张表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dataset {
    Inventory,
    Cascade,
    Providers,
    Depots,
}

impl Dataset {
    /// 数仓表名
    pub fn table_name(&self) -> &'static str {
        match self {
            Dataset::Inventory => "TB_INVENTORY",
            Dataset::Cascade => "TB_CARE_CASCADE",
            Dataset::Providers => "TB_PROVIDERS",
            Dataset::Depots => "TB_DEPOTS",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}
