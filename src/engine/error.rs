// ==========================================
// 门窗型材引擎 - 引擎层错误类型
// ==========================================
// 约定:
// - 业务缺口（无系统/无色/无库存）不是错误，走 SelectionProblem
// - 尺寸非正为硬错误，必须携带全部输入量
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入校验 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("缺少角色型材: role={role}, 用途={purpose}")]
    MissingRole { role: String, purpose: String },

    // ===== 尺寸计算 =====
    #[error(
        "扇高计算无效: computed={computed:.2}, element_height={element_height:.2}, \
         top_h2={top_h2:.2}, top_overlap={top_overlap:.2}, \
         bottom_overlap={bottom_overlap:.2}, bottom_h2={bottom_h2:.2}"
    )]
    InvalidPanelHeight {
        computed: f64,
        element_height: f64,
        top_h2: f64,
        top_overlap: f64,
        bottom_overlap: f64,
        bottom_h2: f64,
    },

    #[error(
        "框内净宽计算无效: computed={computed:.2}, element_width={element_width:.2}, \
         side_h2_left={side_h2_left:.2}, side_h2_right={side_h2_right:.2}"
    )]
    InvalidFrameGap {
        computed: f64,
        element_width: f64,
        side_h2_left: f64,
        side_h2_right: f64,
    },

    #[error(
        "扇宽计算无效: computed={computed:.2}, frame_gap_width={frame_gap_width:.2}, \
         active_panels={active_panels}, meeting_overlap={meeting_overlap:.2}, \
         side_overlap={side_overlap:.2}"
    )]
    InvalidPanelWidth {
        computed: f64,
        frame_gap_width: f64,
        active_panels: usize,
        meeting_overlap: f64,
        side_overlap: f64,
    },

    // ===== 目录访问 =====
    #[error("目录访问失败: operation={operation}, keys={keys}: {source}")]
    Catalog {
        operation: &'static str,
        keys: String,
        #[source]
        source: RepositoryError,
    },
}

impl EngineError {
    /// 包装目录错误并附带操作名与查询键
    pub fn catalog(operation: &'static str, keys: impl Into<String>, source: RepositoryError) -> Self {
        EngineError::Catalog {
            operation,
            keys: keys.into(),
            source,
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
