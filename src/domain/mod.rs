// ==========================================
// 门窗型材引擎 - 领域层
// ==========================================
// 职责: 目录实体与门窗单元模型，不含数据访问
// ==========================================

pub mod catalog;
pub mod element;
pub mod types;

// 重导出核心实体
pub use catalog::{
    Color, Profile, ProfileStructure, ProfileSystem, SelectedProfile, StockItem,
    SystemAvailableColor, SystemProfileListItem,
};
pub use element::{Detail, DetailSet, Element, ElementError, ExtraPart, Frame, Wind};
pub use types::{roles, Position, SystemType, WindKind};
