// ==========================================
// 门窗型材引擎 - 目录实体
// ==========================================
// 职责: 型材 / 型材系统 / 颜色 / 库存项 / 系统可用色 / 系统角色清单
// 红线: 可空数值字段用 Option 表达，不得用 0 冒充缺失
// ==========================================

use crate::domain::types::SystemType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ProfileSystem - 型材系统
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSystem {
    pub system_id: i64,
    pub name: String,
    pub system_type: SystemType,

    // ===== 搭接余量 (mm) =====
    pub top_overlap_mm: f64,    // 扇压框（上）
    pub bottom_overlap_mm: f64, // 扇压框（下）
    pub side_overlap_mm: f64,   // 扇边进入侧框槽的深度

    /// 优先级，越小越优先；None 排在最后
    pub primacy: Option<i64>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ==========================================
// Profile - 型材
// ==========================================
// H: 可视面高/宽（取决于安装方向）
// W: 型材深度
// H2: 嵌入/缩口深度，用于扣减洞口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: i64,
    pub profile_sku: String,
    pub profile_name: String,
    pub profile_h: Option<f64>,
    pub profile_w: Option<f64>,
    pub profile_h2: Option<f64>,
    /// 对接竖梃是否需要附加搭接料
    pub uses_overlap: Option<bool>,
    /// 结构分类（框 / 扇）
    pub profile_structure: Option<ProfileStructure>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// uses_overlap 缺失按 false 处理
    pub fn requires_overlap(&self) -> bool {
        self.uses_overlap.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileStructure {
    Frame,
    Wind,
}

impl ProfileStructure {
    pub fn from_db_str(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "FRAME" => Some(ProfileStructure::Frame),
            "WIND" => Some(ProfileStructure::Wind),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStructure::Frame => "FRAME",
            ProfileStructure::Wind => "WIND",
        }
    }
}

// ==========================================
// Color - 颜色
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub color_id: i64,
    pub name: String,
    pub hex_code: Option<String>,
}

// ==========================================
// StockItem - 库存项
// ==========================================
// 存在即可订：(profile, color) 有记录才算可采购
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub stock_item_id: i64,
    pub profile_id: i64,
    pub color_id: i64,
    pub item_sku: String,
    pub profile_price: f64,
    pub profile_length_mm: Option<f64>,
}

// ==========================================
// SystemAvailableColor - 系统可用色白名单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemAvailableColor {
    pub system_id: i64,
    pub color_id: i64,
    pub color_code_suffix: Option<String>,
}

// ==========================================
// SystemProfileListItem - 系统角色候选型材
// ==========================================
// 顺序由目录库给出（primacy 降序, profile_id 升序），选型不得重排
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemProfileListItem {
    pub system_id: i64,
    pub profile_id: i64,
    pub primacy: Option<i64>,
    pub element_part_role: String,
}

// ==========================================
// SelectedProfile - 选型结果（型材 + 对应颜色的库存项）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedProfile {
    pub profile: Profile,
    pub stock_item: StockItem,
}

impl SelectedProfile {
    pub fn sku(&self) -> &str {
        &self.profile.profile_sku
    }
}
