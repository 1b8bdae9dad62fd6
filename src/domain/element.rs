// ==========================================
// 门窗型材引擎 - 门窗单元模型
// ==========================================
// 职责: Element / Frame / Wind / Detail
// 说明: Detail 按位置固定四项，用枚举下标数组代替字符串 Map
// ==========================================

use crate::domain::types::{Position, SystemType, WindKind};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use thiserror::Error;
use uuid::Uuid;

/// 默认切角（直角切）
pub const SQUARE_CUT_ANGLE: f64 = 90.0;

// ==========================================
// Detail - 单根型材明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub position: Position,
    pub profile_sku: Option<String>,
    pub color_id: Option<i64>,
    /// 成品长度 (mm)，0 表示未计算
    pub dimension: f64,
    pub angle_left: f64,
    pub angle_right: f64,
}

impl Detail {
    pub fn empty(position: Position) -> Self {
        Self {
            position,
            profile_sku: None,
            color_id: None,
            dimension: 0.0,
            angle_left: 0.0,
            angle_right: 0.0,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.profile_sku.is_some() && self.dimension > 0.0
    }
}

// ==========================================
// DetailSet - 四位置明细集合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailSet {
    details: [Detail; 4],
}

impl Default for DetailSet {
    fn default() -> Self {
        Self {
            details: Position::ALL.map(Detail::empty),
        }
    }
}

impl DetailSet {
    pub fn iter(&self) -> impl Iterator<Item = &Detail> {
        self.details.iter()
    }
}

impl Index<Position> for DetailSet {
    type Output = Detail;

    fn index(&self, position: Position) -> &Detail {
        &self.details[position.index()]
    }
}

impl IndexMut<Position> for DetailSet {
    fn index_mut(&mut self, position: Position) -> &mut Detail {
        &mut self.details[position.index()]
    }
}

// ==========================================
// ExtraPart - 附加料（如对接处的搭接料）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPart {
    pub role: String,
    pub profile_sku: String,
    pub color_id: Option<i64>,
    pub dimension: f64,
    pub angle_left: f64,
    pub angle_right: f64,
}

// ==========================================
// Frame - 外框
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailSet>,
}

impl Frame {
    /// 懒初始化明细
    pub fn details_mut(&mut self) -> &mut DetailSet {
        self.details.get_or_insert_with(DetailSet::default)
    }
}

// ==========================================
// Wind - 扇（活动扇或固定扇）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub id: String,
    pub name: String,
    pub kind: WindKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DetailSet>,
    #[serde(default)]
    pub extra_parts: Vec<ExtraPart>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Wind {
    pub fn new(name: impl Into<String>, kind: WindKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            details: None,
            extra_parts: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// 懒初始化明细
    pub fn details_mut(&mut self) -> &mut DetailSet {
        self.details.get_or_insert_with(DetailSet::default)
    }

    /// 清空上次计算留下的附加料与问题记录
    pub fn reset_calculation_notes(&mut self) {
        self.extra_parts.clear();
        self.warnings.clear();
        self.errors.clear();
    }
}

// ==========================================
// Element - 门窗单元
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    /// 外形宽 (mm)
    pub width: f64,
    /// 外形高 (mm)
    pub height: f64,
    pub element_type: SystemType,
    pub area_m2: f64,
    pub perimeter_m: f64,
    pub frame: Frame,
    #[serde(default)]
    pub winds: Vec<Wind>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ElementError {
    #[error("门窗尺寸必须为有限正数: width={width}, height={height}")]
    NonPositiveSize { width: f64, height: f64 },

    #[error("扇名称重复: element_id={element_id}, name={name}")]
    DuplicateWindName { element_id: String, name: String },
}

/// 有限且大于 0；NaN 与无穷均不合法
pub fn is_positive_length(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Element {
    /// 创建门窗单元，面积 (m²) 与周长 (m) 由外形尺寸派生
    pub fn new(width: f64, height: f64, element_type: SystemType) -> Result<Self, ElementError> {
        if !is_positive_length(width) || !is_positive_length(height) {
            return Err(ElementError::NonPositiveSize { width, height });
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            width,
            height,
            element_type,
            area_m2: width * height / 1_000_000.0,
            perimeter_m: 2.0 * (width + height) / 1000.0,
            frame: Frame {
                name: "主框".to_string(),
                details: None,
            },
            winds: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// 追加扇，同一单元内扇名称不得重复
    pub fn add_wind(&mut self, wind: Wind) -> Result<(), ElementError> {
        if self.winds.iter().any(|w| w.name == wind.name) {
            return Err(ElementError::DuplicateWindName {
                element_id: self.id.clone(),
                name: wind.name,
            });
        }
        self.winds.push(wind);
        Ok(())
    }

    /// 推拉活动扇数量（固定扇不计）
    pub fn active_sliding_count(&self) -> usize {
        self.winds
            .iter()
            .filter(|w| w.kind.is_active_sliding())
            .count()
    }
}
