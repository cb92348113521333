// ==========================================
// TB CareMap - 核心库
// ==========================================
// 技术栈: Rust + SQLite + CSV/Excel
// 系统定位: 结核病药品库存风险决策支持 (人工最终控制权)
// 流水线: 库存观测 → 最新快照 → 派生指标 → 告警分层 → 报表
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 公共工具
pub mod common;

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 指标派生与告警
pub mod engine;

// 文件读取层 - 外部数据
pub mod importer;

// 数据源适配层
pub mod source;

// 配置层 - 运行参数
pub mod config;

// 报表层 - 汇总与导出
pub mod report;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AlertTier, Dataset, FetchMode, SeverityLabel};

// 领域实体
pub use domain::{
    CascadeRecord, DepotRecord, DerivedMetrics, InventoryObservation, ProviderRecord, SnapshotRow,
};

// 引擎
pub use engine::{
    classify_alerts, compute_snapshot, AlertClassifier, AlertReport, CriticalAlert,
    LatestSnapshotSelector, RowMetricCalculator, SnapshotFilter,
};

// API
pub use api::{DashboardApi, DashboardRequest};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "TB CareMap";
