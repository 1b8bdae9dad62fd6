// ==========================================
// 门窗型材引擎 - 引擎层
// ==========================================
// 职责: 型材选型 + 尺寸计算，不拼 SQL
// 红线: Engine 不持有会话状态，业务缺口必须输出原因
// ==========================================

pub mod dimension_calculator;
pub mod error;
pub mod profile_selector;

// 重导出核心引擎
pub use dimension_calculator::{CalculationOutcome, DimensionCalculator, SlidingDimensions};
pub use error::{EngineError, EngineResult};
pub use profile_selector::{
    ProfileSelector, SelectionProblem, SelectionRequest, SelectionResult,
};
