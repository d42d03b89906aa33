//! Build Manifest - 前端打包声明
//!
//! 描述 Web UI 的构建输入：源码路径别名、框架插件，以及生产打包时的分组。
//! 只做声明与校验，不执行任何打包。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// 构建清单错误
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Bundle group '{0}' has no modules")]
    EmptyGroup(String),

    #[error("Module '{module}' is assigned to both '{first}' and '{second}'")]
    Overlap {
        module: String,
        first: String,
        second: String,
    },
}

/// 构建清单
///
/// ```toml
/// plugins = ["vue"]
///
/// [alias]
/// "@" = "./src"
///
/// [chunks]
/// vue = ["vue", "vue-router"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildManifest {
    /// 框架插件
    pub plugins: Vec<String>,
    /// 路径别名 -> 实际路径
    pub alias: BTreeMap<String, String>,
    /// 打包分组名 -> 模块列表
    pub chunks: BTreeMap<String, Vec<String>>,
}

impl Default for BuildManifest {
    fn default() -> Self {
        let alias = BTreeMap::from([("@".to_string(), "./src".to_string())]);
        let chunks = BTreeMap::from([
            ("vue".to_string(), strings(&["vue", "vue-router"])),
            (
                "element".to_string(),
                strings(&["element-plus", "@element-plus/icons-vue"]),
            ),
            ("audio".to_string(), strings(&["@liripeng/vue-audio-player"])),
        ]);

        Self {
            plugins: strings(&["vue"]),
            alias,
            chunks,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl BuildManifest {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(source: &str) -> Result<Self, ManifestError> {
        let manifest: BuildManifest = toml::from_str(source)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// 从文件加载并校验
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// 校验分组：每组非空，且任一模块只属于一个分组
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();

        for (group, modules) in &self.chunks {
            if modules.is_empty() {
                return Err(ManifestError::EmptyGroup(group.clone()));
            }
            for module in modules {
                if let Some(first) = owners.insert(module.as_str(), group.as_str()) {
                    return Err(ManifestError::Overlap {
                        module: module.clone(),
                        first: first.to_string(),
                        second: group.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// 模块所属的打包分组
    pub fn group_of(&self, module: &str) -> Option<&str> {
        self.chunks
            .iter()
            .find(|(_, modules)| modules.iter().any(|m| m == module))
            .map(|(group, _)| group.as_str())
    }

    /// 展开路径别名，多个别名匹配时取最长的
    pub fn resolve_alias(&self, path: &str) -> String {
        let matched = self
            .alias
            .iter()
            .filter(|(key, _)| {
                path == key.as_str()
                    || path
                        .strip_prefix(key.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .max_by_key(|(key, _)| key.len());

        match matched {
            Some((key, target)) => format!("{}{}", target, &path[key.len()..]),
            None => path.to_string(),
        }
    }
}
