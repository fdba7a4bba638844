//! 模型别名表
//!
//! 将简写的模型族名改写为固定的 `-latest` 版本。

use std::collections::HashMap;

use super::ModelId;

/// 内置别名
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("gemini-1.5-pro", "gemini-1.5-pro-latest"),
    ("gemini-1.5-flash", "gemini-1.5-flash-latest"),
];

/// 模型别名表
///
/// 不变量: `normalize` 幂等，对已规范化的标识原样返回。
#[derive(Debug, Clone, Default)]
pub struct ModelAliasTable {
    aliases: HashMap<String, String>,
}

impl ModelAliasTable {
    /// 空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置别名表
    pub fn builtin() -> Self {
        BUILTIN_ALIASES
            .iter()
            .fold(Self::new(), |table, (alias, target)| {
                table.with_alias(*alias, *target)
            })
    }

    /// 添加或覆盖一条别名
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.insert(alias, target);
        self
    }

    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        let alias = alias.into();
        let target = target.into();
        if alias != target {
            self.aliases.insert(alias, target);
        }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// 规范化模型标识
    ///
    /// 沿别名链一直解析到不再命中为止；落入环中的标识原样返回。
    pub fn normalize(&self, model: &ModelId) -> ModelId {
        match self.resolve(model.as_str()) {
            Some(resolved) => ModelId::new(resolved).unwrap_or_else(|_| model.clone()),
            None => model.clone(),
        }
    }

    /// 第一个落入环中的别名
    pub fn find_cycle(&self) -> Option<&str> {
        let mut aliases: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases.into_iter().find(|alias| self.resolve(alias).is_none())
    }

    /// 链长超过表大小即为环，返回 None
    fn resolve<'a>(&'a self, model: &'a str) -> Option<&'a str> {
        let mut current = model;
        for _ in 0..=self.aliases.len() {
            match self.aliases.get(current) {
                Some(next) => current = next.as_str(),
                None => return Some(current),
            }
        }
        None
    }
}
