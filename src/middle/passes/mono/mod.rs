//! 单态化器
//!
//! 把泛型函数与泛型结构体展开为一族具体声明，每组不同的类型实参对应一个，
//! 并把所有引用改写为指向对应的具体声明。
//!
//! 流程分四个阶段，数据只向前流动：
//! 1. 收集：登记泛型声明与实例化点，区分依赖外层形参的子实例化
//! 2. 继承解析：按父声明的每个实例化展开其子实例化
//! 3. 声明展开：为每个实例化克隆声明、替换形参并改名
//! 4. 引用改写：把带类型实参的引用改写为修饰名
//!
//! 生成的声明不会再被扫描。一个 `Monomorphizer` 只服务一个编译单元，`run` 会消耗它。

pub mod collect;
pub mod error;
pub mod expand;
pub mod inherit;
pub mod instance;
pub mod rewrite;
pub mod subst;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

pub use self::error::{MonoError, MonoResult};
pub use self::instance::{
    mangle_name, ChildUsage, DeclKind, Declaration, TypeArg, Usage, UsageRegistry,
};

use self::collect::Collector;
use self::expand::Expander;
use self::inherit::InheritanceResolver;
use self::rewrite::{verify_concrete, ReferenceRewriter};
use crate::frontend::ast::File;
use crate::util::config::TransformConfig;

/// 单次运行的统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MonoStats {
    /// 泛型声明数
    pub declarations: usize,
    /// 收集阶段登记的实例化数
    pub collected: usize,
    /// 继承解析新增的实例化数
    pub propagated: usize,
    /// 生成的具体声明数
    pub generated: usize,
    /// 因无实例化被丢弃的泛型声明
    pub dropped: Vec<String>,
    /// 替换的形参引用数
    pub substituted: usize,
    /// 改写的引用数
    pub rewritten: usize,
}

/// 实例化计划中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub name: String,
    pub kind: DeclKind,
    pub formal_params: Vec<String>,
    /// 将生成的具体声明名，按生成顺序
    pub instances: Vec<String>,
}

/// 实例化计划：只运行收集与继承解析，不改动语法树
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstantiationPlan {
    pub declarations: Vec<PlanEntry>,
    /// 引用了本编译单元之外的泛型声明的实例化
    pub external: Vec<String>,
}

/// 单态化会话
#[derive(Debug, Default)]
pub struct Monomorphizer {
    config: TransformConfig,
    decls: IndexMap<String, Declaration>,
    registry: UsageRegistry,
}

impl Monomorphizer {
    /// 使用默认配置创建会话
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定配置创建会话
    pub fn with_config(config: TransformConfig) -> Self {
        Monomorphizer {
            config,
            decls: IndexMap::new(),
            registry: UsageRegistry::new(),
        }
    }

    /// 运行完整的四阶段变换
    pub fn run(
        mut self,
        file: File,
    ) -> MonoResult<(File, MonoStats)> {
        let mut stats = MonoStats::default();

        self.discover(&file, &mut stats)?;

        let (file, expanded) = Expander::new(&self.decls, &self.registry).expand(file)?;
        stats.generated = expanded.generated;
        stats.dropped = expanded.dropped;
        stats.substituted = expanded.substituted;

        let (file, rewritten) = ReferenceRewriter::new().rewrite(file)?;
        stats.rewritten = rewritten;

        if self.config.verify_output {
            verify_concrete(&file)?;
        }

        info!(
            declarations = stats.declarations,
            instances = stats.generated,
            dropped = stats.dropped.len(),
            "monomorphized {}",
            file.package.name
        );
        Ok((file, stats))
    }

    /// 只计算实例化计划
    pub fn plan(
        mut self,
        file: &File,
    ) -> MonoResult<InstantiationPlan> {
        let mut stats = MonoStats::default();
        self.discover(file, &mut stats)?;

        let declarations = self
            .decls
            .values()
            .map(|d| PlanEntry {
                name: d.name.clone(),
                kind: d.kind,
                formal_params: d.formal_params.clone(),
                instances: self.registry.get(&d.name).iter().map(Usage::signature).collect(),
            })
            .collect();
        let external = self
            .registry
            .iter()
            .filter(|(name, _)| !self.decls.contains_key(*name))
            .flat_map(|(_, usages)| usages.iter().map(Usage::signature))
            .collect();

        Ok(InstantiationPlan {
            declarations,
            external,
        })
    }

    /// 收集 + 继承解析
    fn discover(
        &mut self,
        file: &File,
        stats: &mut MonoStats,
    ) -> MonoResult<()> {
        Collector::new(&mut self.decls, &mut self.registry).collect(file)?;
        stats.declarations = self.decls.len();
        stats.collected = self.registry.len();

        stats.propagated = InheritanceResolver::new(
            &self.decls,
            &mut self.registry,
            self.config.max_instantiations,
        )
        .resolve()?;
        Ok(())
    }
}

/// 使用默认配置单态化一个编译单元
pub fn monomorphize(file: File) -> MonoResult<File> {
    Monomorphizer::new().run(file).map(|(file, _)| file)
}
