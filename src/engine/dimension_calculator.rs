// ==========================================
// 门窗型材引擎 - 尺寸计算引擎
// ==========================================
// 职责: 根据系统参数与选型结果，为框和活动扇写入型材明细
// 输入: Element (原地修改) + ProfileSystem + 角色→型材映射
// 输出: CalculationOutcome (扇高/净宽/扇宽等中间量)
// 红线:
// - 计算结果 ≤ 0 或非有限值必须报错，不得钳位
// - H2 缺失按 0 处理并告警，不得静默
// - 已写入的明细不回滚，错误返回即视为单元不完整
// ==========================================

use crate::domain::catalog::{ProfileSystem, SelectedProfile};
use crate::domain::element::{
    is_positive_length, Detail, DetailSet, Element, ExtraPart, SQUARE_CUT_ANGLE,
};
use crate::domain::types::{roles, Position, SystemType};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// 计算结果
// ==========================================

/// 推拉路径的中间量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidingDimensions {
    pub panel_height: f64,
    pub frame_gap_width: f64,
    pub panel_width: f64,
    pub active_panels: usize,
    pub meeting_overlap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationOutcome {
    Computed(SlidingDimensions),
    /// 没有活动扇，只写框明细
    NoActivePanels {
        panel_height: f64,
        frame_gap_width: f64,
    },
    /// 非推拉系统，未计算
    Unsupported { system_type: SystemType },
}

// ==========================================
// DimensionCalculator - 尺寸计算引擎
// ==========================================
// 无状态，每次调用独立
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionCalculator;

impl DimensionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 计算并写入型材明细
    ///
    /// # 参数
    /// - element: 门窗单元，原地写入框/扇明细
    /// - system: 选定型材系统（提供搭接余量）
    /// - profiles: 角色→型材映射（来自 ProfileSelector）
    ///
    /// # 返回
    /// - Ok(CalculationOutcome): 计算完成或按类型跳过
    /// - Err(EngineError): 输入无效、缺少必需角色或尺寸 ≤ 0
    #[instrument(
        skip(self, element, system, profiles),
        fields(element_id = %element.id, system_id = system.system_id)
    )]
    pub fn calculate_details(
        &self,
        element: &mut Element,
        system: &ProfileSystem,
        profiles: &HashMap<String, SelectedProfile>,
    ) -> EngineResult<CalculationOutcome> {
        // === 前置校验（任何修改之前）===
        if !is_positive_length(element.width) || !is_positive_length(element.height) {
            return Err(EngineError::InvalidInput(format!(
                "门窗尺寸必须为有限正数: width={}, height={}",
                element.width, element.height
            )));
        }
        if profiles.is_empty() {
            return Err(EngineError::InvalidInput("角色型材映射为空".to_string()));
        }

        match &system.system_type {
            SystemType::Sliding => self.calculate_sliding(element, system, profiles),
            other => {
                info!(system_type = %other, "该系统类型暂无计算规则，跳过");
                Ok(CalculationOutcome::Unsupported {
                    system_type: other.clone(),
                })
            }
        }
    }

    // ==========================================
    // 推拉路径
    // ==========================================

    fn calculate_sliding(
        &self,
        element: &mut Element,
        system: &ProfileSystem,
        profiles: &HashMap<String, SelectedProfile>,
    ) -> EngineResult<CalculationOutcome> {
        let frame_top = require_role(profiles, roles::FRAME_TOP_SLIDING, "扇高计算")?;
        let frame_bottom = require_role(profiles, roles::FRAME_BOTTOM_SLIDING, "扇高计算")?;
        let frame_side = require_role(profiles, roles::FRAME_SIDE_SLIDING, "框内净宽计算")?;

        // 必需角色齐全后才开始修改 element
        element.warnings.clear();

        // === 步骤 1: 扇高 ===
        let top_h2 = h2_or_zero(frame_top, roles::FRAME_TOP_SLIDING, &mut element.warnings);
        let bottom_h2 = h2_or_zero(frame_bottom, roles::FRAME_BOTTOM_SLIDING, &mut element.warnings);

        let panel_height = element.height
            - top_h2
            - system.top_overlap_mm
            - system.bottom_overlap_mm
            - bottom_h2;
        if !is_positive_length(panel_height) {
            error!(panel_height, element_height = element.height, "扇高计算结果非正");
            return Err(EngineError::InvalidPanelHeight {
                computed: panel_height,
                element_height: element.height,
                top_h2,
                top_overlap: system.top_overlap_mm,
                bottom_overlap: system.bottom_overlap_mm,
                bottom_h2,
            });
        }
        debug!(panel_height, "扇高");

        // === 步骤 2: 框内净宽（左右共用侧框型材）===
        let side_h2 = h2_or_zero(frame_side, roles::FRAME_SIDE_SLIDING, &mut element.warnings);

        let frame_gap_width = element.width - 2.0 * side_h2;
        if !is_positive_length(frame_gap_width) {
            error!(frame_gap_width, element_width = element.width, "框内净宽计算结果非正");
            return Err(EngineError::InvalidFrameGap {
                computed: frame_gap_width,
                element_width: element.width,
                side_h2_left: side_h2,
                side_h2_right: side_h2,
            });
        }
        debug!(frame_gap_width, "框内净宽");

        self.assign_frame_details(element, frame_top, frame_bottom, frame_side);

        // === 步骤 3/4: 活动扇数量 ===
        let active_panels = element.active_sliding_count();
        if active_panels == 0 {
            info!("没有推拉活动扇，跳过扇计算");
            return Ok(CalculationOutcome::NoActivePanels {
                panel_height,
                frame_gap_width,
            });
        }

        // === 步骤 5: 对接搭接量 ===
        let meeting = if active_panels > 1 {
            profiles.get(roles::WIND_JAMB_MEETING_SLIDING)
        } else {
            None
        };
        let meeting_overlap = match (active_panels > 1, meeting) {
            (false, _) => 0.0,
            (true, Some(selected)) => match selected.profile.profile_h {
                Some(h) => h,
                None => {
                    let msg = format!("对接竖梃 {} 缺少 H 值，搭接量按 0 计算", selected.sku());
                    warn!(sku = %selected.sku(), "{}", msg);
                    element.warnings.push(msg);
                    0.0
                }
            },
            (true, None) => {
                let msg = format!(
                    "未选定角色 {} 的型材，搭接量按 0 计算",
                    roles::WIND_JAMB_MEETING_SLIDING
                );
                warn!("{}", msg);
                element.warnings.push(msg);
                0.0
            }
        };

        // === 步骤 6: 扇宽 ===
        let n = active_panels as f64;
        let panel_width =
            (frame_gap_width + (n - 1.0) * meeting_overlap + 2.0 * system.side_overlap_mm) / n;
        if !is_positive_length(panel_width) {
            error!(panel_width, active_panels, "扇宽计算结果非正");
            return Err(EngineError::InvalidPanelWidth {
                computed: panel_width,
                frame_gap_width,
                active_panels,
                meeting_overlap,
                side_overlap: system.side_overlap_mm,
            });
        }
        info!(panel_height, panel_width, active_panels, meeting_overlap, "推拉扇尺寸");

        if active_panels > 2 {
            warn!(active_panels, "三扇及以上: 外侧边用侧边竖梃，内侧边用对接竖梃");
        }

        // === 步骤 7/8: 逐扇写入明细 ===
        let overlap_needed = meeting.map_or(false, |m| m.profile.requires_overlap());
        let overlap = profiles.get(roles::WIND_VERTICAL_OVERLAP_SLIDING);

        let sizes = PanelSizes {
            height: panel_height,
            width: panel_width,
        };
        let mut panel_index = 0usize;
        for wind in element.winds.iter_mut() {
            if !wind.kind.is_active_sliding() {
                continue;
            }
            wind.reset_calculation_notes();

            let details = wind.details_mut();
            let mut warnings = Vec::new();
            assign_panel_details(details, profiles, panel_index, active_panels, sizes, &mut warnings);
            for w in &warnings {
                warn!(wind_index = panel_index, wind = %wind.name, "{}", w);
            }
            wind.warnings.extend(warnings);

            if overlap_needed {
                match overlap {
                    Some(overlap) => {
                        debug!(wind_index = panel_index, sku = %overlap.sku(), "写入搭接料");
                        wind.extra_parts.push(ExtraPart {
                            role: roles::WIND_VERTICAL_OVERLAP_SLIDING.to_string(),
                            profile_sku: overlap.sku().to_string(),
                            color_id: Some(overlap.stock_item.color_id),
                            dimension: panel_height,
                            angle_left: SQUARE_CUT_ANGLE,
                            angle_right: SQUARE_CUT_ANGLE,
                        });
                    }
                    None => {
                        let sku = meeting.map(|m| m.sku()).unwrap_or_default();
                        let msg = format!(
                            "扇 {}: 对接竖梃 {} 需要搭接料，但未选定角色 {} 的型材",
                            panel_index,
                            sku,
                            roles::WIND_VERTICAL_OVERLAP_SLIDING
                        );
                        error!(wind_index = panel_index, "{}", msg);
                        wind.errors.push(msg);
                    }
                }
            }

            panel_index += 1;
        }

        Ok(CalculationOutcome::Computed(SlidingDimensions {
            panel_height,
            frame_gap_width,
            panel_width,
            active_panels,
            meeting_overlap,
        }))
    }

    /// 框四边: 上下取外形宽，左右取外形高，直角切
    fn assign_frame_details(
        &self,
        element: &mut Element,
        top: &SelectedProfile,
        bottom: &SelectedProfile,
        side: &SelectedProfile,
    ) {
        let width = element.width;
        let height = element.height;
        let details = element.frame.details_mut();

        for position in Position::ALL {
            let (profile, dimension) = match position {
                Position::Top => (top, width),
                Position::Bottom => (bottom, width),
                Position::Left | Position::Right => (side, height),
            };
            details[position] = square_cut_detail(position, profile, dimension);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PanelSizes {
    height: f64,
    width: f64,
}

/// 第 index 个活动扇（共 count 个）的边角色：最外侧为侧边，其余为对接
fn edge_role(position: Position, index: usize, count: usize) -> &'static str {
    let outer = match position {
        Position::Left => index == 0,
        Position::Right => index + 1 == count,
        Position::Top => return roles::WIND_RAIL_TOP_SLIDING,
        Position::Bottom => return roles::WIND_RAIL_BOTTOM_SLIDING,
    };
    if outer {
        roles::WIND_JAMB_SIDE_SLIDING
    } else {
        roles::WIND_JAMB_MEETING_SLIDING
    }
}

fn assign_panel_details(
    details: &mut DetailSet,
    profiles: &HashMap<String, SelectedProfile>,
    index: usize,
    count: usize,
    sizes: PanelSizes,
    warnings: &mut Vec<String>,
) {
    for position in Position::ALL {
        let role = edge_role(position, index, count);
        let dimension = if position.is_vertical() {
            sizes.height
        } else {
            sizes.width
        };

        details[position] = match profiles.get(role) {
            Some(profile) => square_cut_detail(position, profile, dimension),
            None => {
                warnings.push(format!("扇 {} 的 {} 位置缺少角色 {} 的型材", index, position, role));
                Detail::empty(position)
            }
        };
    }
}

fn square_cut_detail(position: Position, profile: &SelectedProfile, dimension: f64) -> Detail {
    Detail {
        position,
        profile_sku: Some(profile.sku().to_string()),
        color_id: Some(profile.stock_item.color_id),
        dimension,
        angle_left: SQUARE_CUT_ANGLE,
        angle_right: SQUARE_CUT_ANGLE,
    }
}

fn require_role<'a>(
    profiles: &'a HashMap<String, SelectedProfile>,
    role: &str,
    purpose: &str,
) -> EngineResult<&'a SelectedProfile> {
    profiles.get(role).ok_or_else(|| {
        error!(role, purpose, "缺少必需角色");
        EngineError::MissingRole {
            role: role.to_string(),
            purpose: purpose.to_string(),
        }
    })
}

fn h2_or_zero(profile: &SelectedProfile, role: &str, warnings: &mut Vec<String>) -> f64 {
    match profile.profile.profile_h2 {
        Some(h2) => h2,
        None => {
            let msg = format!("角色 {} 的型材 {} 缺少 H2，按 0 计算", role, profile.sku());
            warn!(role, sku = %profile.sku(), "{}", msg);
            warnings.push(msg);
            0.0
        }
    }
}
