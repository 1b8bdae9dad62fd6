// ==========================================
// 门窗型材引擎 - 型材选型引擎
// ==========================================
// 职责: 选默认型材系统 → 校验颜色 → 按角色选可订型材
// 输入: 系统类型 + 期望颜色 + 所需角色列表
// 输出: 系统 / 颜色 / 角色→型材映射 / 问题清单
// 红线:
// - 候选顺序以目录为准，不得重排
// - 无库存候选跳过而非失败
// - 业务缺口进问题清单；目录传输错误立即上抛
// ==========================================

use crate::domain::catalog::{Color, ProfileSystem, SelectedProfile, SystemProfileListItem};
use crate::domain::types::{roles, SystemType};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::CatalogRepository;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// 列举备选型材时的并发度
const ALTERNATIVES_CONCURRENCY: usize = 4;

// ==========================================
// 选型请求 / 结果
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub element_type: SystemType,
    pub desired_color_id: i64,
    pub required_roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub system: Option<ProfileSystem>,
    pub color: Option<Color>,
    pub profiles: HashMap<String, SelectedProfile>,
    pub problems: Vec<SelectionProblem>,
}

impl SelectionResult {
    pub fn is_complete(&self) -> bool {
        self.system.is_some() && self.color.is_some() && self.problems.is_empty()
    }
}

/// 选型过程中的业务缺口（非致命）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionProblem {
    NoSystemForType {
        element_type: String,
    },
    ColorUnavailableForSystem {
        color_id: i64,
        system_id: i64,
        system_name: String,
    },
    ColorDetailsUnavailable {
        color_id: i64,
        reason: Option<String>,
    },
    NoCandidates {
        role: String,
        system_id: i64,
    },
    NoStockedCandidate {
        role: String,
        system_id: i64,
        color_id: i64,
    },
}

impl SelectionProblem {
    /// 与角色相关的缺口返回角色名
    pub fn role(&self) -> Option<&str> {
        match self {
            SelectionProblem::NoCandidates { role, .. }
            | SelectionProblem::NoStockedCandidate { role, .. } => Some(role),
            _ => None,
        }
    }
}

impl fmt::Display for SelectionProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionProblem::NoSystemForType { element_type } => {
                write!(f, "未找到类型为 '{}' 的型材系统", element_type)
            }
            SelectionProblem::ColorUnavailableForSystem {
                color_id,
                system_id,
                system_name,
            } => write!(
                f,
                "颜色 {} 不在系统 '{}' (ID {}) 的可用色中",
                color_id, system_name, system_id
            ),
            SelectionProblem::ColorDetailsUnavailable { color_id, reason } => match reason {
                Some(reason) => write!(f, "无法获取颜色 {} 的详情: {}", color_id, reason),
                None => write!(f, "颜色 {} 不存在", color_id),
            },
            SelectionProblem::NoCandidates { role, system_id } => {
                write!(f, "系统 {} 中角色 '{}' 没有候选型材", system_id, role)
            }
            SelectionProblem::NoStockedCandidate {
                role,
                system_id,
                color_id,
            } => write!(
                f,
                "系统 {} 中角色 '{}' 没有颜色 {} 的可订型材",
                system_id, role, color_id
            ),
        }
    }
}

/// 单角色解析结果
enum RoleResolution {
    Selected(SelectedProfile),
    Gap(SelectionProblem),
}

// ==========================================
// ProfileSelector - 型材选型引擎
// ==========================================
// 红线: 无会话状态，每次调用独立
pub struct ProfileSelector<R>
where
    R: CatalogRepository,
{
    repo: Arc<R>,
}

impl<R> ProfileSelector<R>
where
    R: CatalogRepository,
{
    /// 创建新的 ProfileSelector 实例
    ///
    /// # 参数
    /// - repo: 目录仓储（通常为 CachedCatalogRepository）
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 选择默认系统、颜色及各角色型材
    ///
    /// # 返回
    /// - Ok(SelectionResult): 可能是部分结果，缺口见 problems
    /// - Err: 目录传输错误（不返回部分结果）
    #[instrument(
        skip(self, request),
        fields(element_type = %request.element_type, color_id = request.desired_color_id)
    )]
    pub async fn select_default_system_and_profiles(
        &self,
        request: &SelectionRequest,
    ) -> EngineResult<SelectionResult> {
        let mut output = SelectionResult::default();

        // === 步骤 1: 选默认系统（目录已按 primacy 升序, system_id 升序排列）===
        let element_type = request.element_type.as_str();
        let systems = self
            .repo
            .get_profile_systems_by_type(element_type)
            .await
            .map_err(|e| {
                EngineError::catalog("get_profile_systems_by_type", format!("type={}", element_type), e)
            })?;

        let system = match systems.into_iter().next() {
            Some(system) => system,
            None => {
                warn!("未找到该类型的型材系统");
                output.problems.push(SelectionProblem::NoSystemForType {
                    element_type: element_type.to_string(),
                });
                return Ok(output);
            }
        };
        info!(system_id = system.system_id, system_name = %system.name, "选定型材系统");

        // === 步骤 2: 校验颜色白名单 ===
        let color_id = request.desired_color_id;
        let available = self
            .repo
            .get_system_available_colors(system.system_id)
            .await
            .map_err(|e| {
                EngineError::catalog(
                    "get_system_available_colors",
                    format!("system_id={}", system.system_id),
                    e,
                )
            })?;

        if !available.iter().any(|c| c.color_id == color_id) {
            warn!(system_id = system.system_id, "颜色不在系统可用色中");
            output.problems.push(SelectionProblem::ColorUnavailableForSystem {
                color_id,
                system_id: system.system_id,
                system_name: system.name.clone(),
            });
            output.system = Some(system);
            return Ok(output);
        }

        // === 步骤 3: 颜色详情 ===
        let color = match self.repo.get_color_by_id(color_id).await {
            Ok(Some(color)) => color,
            Ok(None) => {
                warn!("颜色记录不存在");
                output.problems.push(SelectionProblem::ColorDetailsUnavailable {
                    color_id,
                    reason: None,
                });
                output.system = Some(system);
                return Ok(output);
            }
            Err(e) => {
                warn!(error = %e, "获取颜色详情失败");
                output.problems.push(SelectionProblem::ColorDetailsUnavailable {
                    color_id,
                    reason: Some(e.to_string()),
                });
                output.system = Some(system);
                return Ok(output);
            }
        };
        info!(color_name = %color.name, "选定颜色");

        // === 步骤 4/5: 逐角色选型（去重，首次出现为准）===
        if request.required_roles.is_empty() {
            warn!("未指定任何角色");
        }

        let mut processed: HashSet<String> = HashSet::new();
        for role in &request.required_roles {
            if !processed.insert(role.clone()) {
                debug!(role = %role, "角色重复，跳过");
                continue;
            }
            self.resolve_role_pipeline(&system, role, color_id, &mut processed, &mut output)
                .await?;
        }

        if output.problems.is_empty() {
            info!(resolved = output.profiles.len(), "选型完成");
        } else {
            let summary: Vec<String> = output.problems.iter().map(|p| p.to_string()).collect();
            warn!(
                resolved = output.profiles.len(),
                problems = output.problems.len(),
                "选型完成，存在问题: {}",
                summary.join("; ")
            );
        }

        output.system = Some(system);
        output.color = Some(color);
        Ok(output)
    }

    /// 列出某角色在指定颜色下全部可订型材（手工替换用）
    ///
    /// # 返回
    /// - Ok(Vec<SelectedProfile>): 保持目录顺序
    /// - Err(InvalidInput): role 为空
    #[instrument(skip(self))]
    pub async fn list_alternatives_for_slot(
        &self,
        system_id: i64,
        role: &str,
        desired_color_id: i64,
    ) -> EngineResult<Vec<SelectedProfile>> {
        if role.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "列举备选型材需要指定角色".to_string(),
            ));
        }

        let items = self.fetch_role_candidates(system_id, role).await?;
        if items.is_empty() {
            warn!("角色没有候选型材");
            return Ok(Vec::new());
        }

        // buffered 保持输入顺序
        let checked: Vec<Option<SelectedProfile>> = stream::iter(items.iter())
            .map(|item| self.check_candidate(item, desired_color_id))
            .buffered(ALTERNATIVES_CONCURRENCY)
            .try_collect()
            .await?;

        let alternatives: Vec<SelectedProfile> = checked.into_iter().flatten().collect();
        info!(count = alternatives.len(), "可订备选型材");
        Ok(alternatives)
    }

    // ==========================================
    // 内部: 角色解析
    // ==========================================

    /// 主角色 → 检查 uses_overlap → 按需解析搭接角色
    async fn resolve_role_pipeline(
        &self,
        system: &ProfileSystem,
        role: &str,
        color_id: i64,
        processed: &mut HashSet<String>,
        output: &mut SelectionResult,
    ) -> EngineResult<()> {
        let primary = self.resolve_role(system.system_id, role, color_id).await?;

        let needs_overlap = match &primary {
            RoleResolution::Selected(selected) => {
                role == roles::WIND_JAMB_MEETING_SLIDING && selected.profile.requires_overlap()
            }
            RoleResolution::Gap(_) => false,
        };
        self.record(role, primary, output);

        if !needs_overlap {
            return Ok(());
        }

        let overlap_role = roles::WIND_VERTICAL_OVERLAP_SLIDING;
        if !processed.insert(overlap_role.to_string()) {
            debug!(role = overlap_role, "搭接角色已处理");
            return Ok(());
        }

        info!(role = overlap_role, "对接竖梃需要搭接料，解析搭接角色");
        let overlap = self
            .resolve_role(system.system_id, overlap_role, color_id)
            .await?;
        self.record(overlap_role, overlap, output);
        Ok(())
    }

    fn record(&self, role: &str, resolution: RoleResolution, output: &mut SelectionResult) {
        match resolution {
            RoleResolution::Selected(selected) => {
                output.profiles.insert(role.to_string(), selected);
            }
            RoleResolution::Gap(problem) => output.problems.push(problem),
        }
    }

    /// 按目录顺序取第一个有库存的候选
    async fn resolve_role(
        &self,
        system_id: i64,
        role: &str,
        color_id: i64,
    ) -> EngineResult<RoleResolution> {
        let items = self.fetch_role_candidates(system_id, role).await?;
        if items.is_empty() {
            warn!(role, system_id, "角色没有候选型材");
            return Ok(RoleResolution::Gap(SelectionProblem::NoCandidates {
                role: role.to_string(),
                system_id,
            }));
        }

        for item in &items {
            if let Some(selected) = self.check_candidate(item, color_id).await? {
                info!(
                    role,
                    profile_id = selected.profile.profile_id,
                    sku = %selected.profile.profile_sku,
                    item_sku = %selected.stock_item.item_sku,
                    "选定型材"
                );
                return Ok(RoleResolution::Selected(selected));
            }
        }

        warn!(role, system_id, color_id, candidates = items.len(), "没有可订候选");
        Ok(RoleResolution::Gap(SelectionProblem::NoStockedCandidate {
            role: role.to_string(),
            system_id,
            color_id,
        }))
    }

    async fn fetch_role_candidates(
        &self,
        system_id: i64,
        role: &str,
    ) -> EngineResult<Vec<SystemProfileListItem>> {
        self.repo
            .get_system_profile_list_items(system_id, role)
            .await
            .map_err(|e| {
                EngineError::catalog(
                    "get_system_profile_list_items",
                    format!("system_id={}, role={}", system_id, role),
                    e,
                )
            })
    }

    /// 校验单个候选：型材详情缺失/失败跳过；库存不存在跳过；库存查询失败上抛
    async fn check_candidate(
        &self,
        item: &SystemProfileListItem,
        color_id: i64,
    ) -> EngineResult<Option<SelectedProfile>> {
        let profile = match self.repo.get_profile_by_id(item.profile_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(profile_id = item.profile_id, role = %item.element_part_role, "候选型材不存在，跳过");
                return Ok(None);
            }
            Err(e) => {
                warn!(profile_id = item.profile_id, error = %e, "获取候选型材失败，跳过");
                return Ok(None);
            }
        };

        let stock_item = self
            .repo
            .get_stock_item(profile.profile_id, color_id)
            .await
            .map_err(|e| {
                EngineError::catalog(
                    "get_stock_item",
                    format!("profile_id={}, color_id={}", profile.profile_id, color_id),
                    e,
                )
            })?;

        match stock_item {
            Some(stock_item) => Ok(Some(SelectedProfile {
                profile,
                stock_item,
            })),
            None => {
                warn!(
                    profile_id = profile.profile_id,
                    sku = %profile.profile_sku,
                    color_id,
                    "候选型材无该颜色库存，跳过"
                );
                Ok(None)
            }
        }
    }
}
