// ==========================================
// 门窗型材引擎 - 核心库
// ==========================================
// 职责: 推拉门窗的型材选型与下料尺寸计算
// 技术栈: Rust + SQLite (本地目录快照) + tokio
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 目录访问 + 缓存
pub mod repository;

// 引擎层 - 选型与计算
pub mod engine;

// 配置层 - 引擎配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{roles, Position, SystemType, WindKind};

// 领域实体
pub use domain::{
    Color, Detail, DetailSet, Element, ExtraPart, Frame, Profile, ProfileSystem,
    SelectedProfile, StockItem, Wind,
};

// 仓储
pub use repository::{
    CachedCatalogRepository, CatalogRepository, RepositoryError, SqliteCatalogRepository,
};

// 引擎
pub use engine::{
    CalculationOutcome, DimensionCalculator, EngineError, ProfileSelector, SelectionProblem,
    SelectionRequest, SelectionResult,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "门窗型材引擎";
