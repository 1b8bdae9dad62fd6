// ==========================================
// 门窗型材引擎 - 领域类型定义
// ==========================================
// 职责: 系统类型 / 扇类型 / 位置 / 功能角色
// 约定: 序列化格式 SCREAMING_SNAKE_CASE (与目录库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 系统类型 (System / Element Type)
// ==========================================
// 对应 profile_systems.type 字段
// 红线: 只有 Sliding 路径有完整计算规则，其余类型只记录不计算
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemType {
    Sliding,  // 推拉
    Casement, // 平开
    Other(String),
}

impl SystemType {
    /// 目录库中的存储值
    pub fn as_str(&self) -> &str {
        match self {
            SystemType::Sliding => "SLIDING",
            SystemType::Casement => "CASEMENT",
            SystemType::Other(raw) => raw.as_str(),
        }
    }

    /// 从目录库字符串解析（大小写不敏感，未知值原样保留）
    pub fn from_db_str(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "SLIDING" => SystemType::Sliding,
            "CASEMENT" => SystemType::Casement,
            _ => SystemType::Other(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 扇类型 (Wind Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindKind {
    SlidingSash,  // 推拉活动扇
    CasementSash, // 平开扇
    FixedPane,    // 固定扇
}

impl WindKind {
    /// 是否计入推拉活动扇数量
    pub fn is_active_sliding(&self) -> bool {
        matches!(self, WindKind::SlidingSash)
    }
}

impl fmt::Display for WindKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindKind::SlidingSash => write!(f, "SLIDING_SASH"),
            WindKind::CasementSash => write!(f, "CASEMENT_SASH"),
            WindKind::FixedPane => write!(f, "FIXED_PANE"),
        }
    }
}

// ==========================================
// 型材位置 (Position)
// ==========================================
// 固定四个位置，用作 DetailSet 的数组下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Top,
    Bottom,
    Left,
    Right,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Top,
        Position::Bottom,
        Position::Left,
        Position::Right,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Position::Top => 0,
            Position::Bottom => 1,
            Position::Left => 2,
            Position::Right => 3,
        }
    }

    /// 竖向位置（左右）取扇高，横向位置（上下）取扇宽
    pub fn is_vertical(self) -> bool {
        matches!(self, Position::Left | Position::Right)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Top => write!(f, "TOP"),
            Position::Bottom => write!(f, "BOTTOM"),
            Position::Left => write!(f, "LEFT"),
            Position::Right => write!(f, "RIGHT"),
        }
    }
}

// ==========================================
// 功能角色 (Element Part Role)
// ==========================================
// 对应 system_profile_list.element_part_role
// 说明: 角色是目录库里的开放标签，这里只列出推拉系统用到的
pub mod roles {
    // ===== 框 =====
    pub const FRAME_TOP_SLIDING: &str = "FRAME_PERIMETER_TOP_SLIDING";
    pub const FRAME_BOTTOM_SLIDING: &str = "FRAME_PERIMETER_BOTTOM_SLIDING";
    pub const FRAME_SIDE_SLIDING: &str = "FRAME_PERIMETER_SIDE_SLIDING";

    // ===== 扇 =====
    pub const WIND_JAMB_SIDE_SLIDING: &str = "WIND_JAMB_SIDE_SLIDING";
    pub const WIND_JAMB_MEETING_SLIDING: &str = "WIND_JAMB_MEETING_SLIDING";
    pub const WIND_RAIL_TOP_SLIDING: &str = "WIND_RAIL_TOP_SLIDING";
    pub const WIND_RAIL_BOTTOM_SLIDING: &str = "WIND_RAIL_BOTTOM_SLIDING";

    // 附加搭接料（由对接竖梃的 uses_overlap 触发，调用方无需显式请求）
    pub const WIND_VERTICAL_OVERLAP_SLIDING: &str = "WIND_VERTICAL_OVERLAP_SLIDING";

    /// 推拉窗默认所需角色
    pub const SLIDING_DEFAULT_ROLES: [&str; 7] = [
        FRAME_TOP_SLIDING,
        FRAME_BOTTOM_SLIDING,
        FRAME_SIDE_SLIDING,
        WIND_JAMB_SIDE_SLIDING,
        WIND_JAMB_MEETING_SLIDING,
        WIND_RAIL_TOP_SLIDING,
        WIND_RAIL_BOTTOM_SLIDING,
    ];
}
