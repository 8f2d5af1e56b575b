//! 继承解析阶段
//!
//! 子实例化只有在父声明的形参被绑定后才变得具体，而父声明每个不同的实例化都会绑定一次，
//! 所以子实例化要按父实例化逐一展开，而不是只展开一次。
//!
//! 新产生的实例化可能本身又是某个带子实例化的声明（`Outer -> Middle -> Inner`），
//! 因此用工作队列迭代到不动点；每个 (声明, 签名) 只处理一次。

use indexmap::IndexMap;
use std::collections::VecDeque;
use tracing::{debug, trace};

use super::error::{MonoError, MonoResult};
use super::instance::{Declaration, Usage, UsageRegistry};
use crate::util::span::Span;

/// 继承解析器
pub struct InheritanceResolver<'a> {
    decls: &'a IndexMap<String, Declaration>,
    registry: &'a mut UsageRegistry,
    max_instantiations: usize,
}

impl<'a> InheritanceResolver<'a> {
    pub fn new(
        decls: &'a IndexMap<String, Declaration>,
        registry: &'a mut UsageRegistry,
        max_instantiations: usize,
    ) -> Self {
        InheritanceResolver {
            decls,
            registry,
            max_instantiations,
        }
    }

    /// 展开全部子实例化，返回新增的实例化数量
    pub fn resolve(self) -> MonoResult<usize> {
        self.check_limit(Span::dummy())?;

        let mut queue: VecDeque<Usage> = self
            .registry
            .iter()
            .filter(|(name, _)| self.decls.get(*name).is_some_and(Declaration::has_children))
            .flat_map(|(_, usages)| usages.iter().cloned())
            .collect();

        let mut propagated = 0;
        while let Some(parent) = queue.pop_front() {
            let Some(decl) = self.decls.get(&parent.name) else {
                continue;
            };
            if !decl.has_children() {
                continue;
            }
            let mapping = decl.substitution(&parent.concrete_args, parent.span)?;
            for child in decl.children.values().flatten() {
                let resolved = child.resolve(&mapping);
                trace!(parent = %parent, child = %child, resolved = %resolved, "propagate");
                if self.registry.insert(resolved.clone()) {
                    propagated += 1;
                    self.check_limit(resolved.span)?;
                    queue.push_back(resolved);
                }
            }
        }

        debug!(propagated, total = self.registry.len(), "resolved inherited usages");
        Ok(propagated)
    }

    fn check_limit(
        &self,
        span: Span,
    ) -> MonoResult<()> {
        if self.registry.len() > self.max_instantiations {
            return Err(MonoError::InstantiationLimit {
                limit: self.max_instantiations,
                span,
            });
        }
        Ok(())
    }
}
