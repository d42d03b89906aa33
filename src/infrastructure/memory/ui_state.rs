//! Shared UI State
//!
//! 界面共享状态：已导入的文本语言、语音语言、后端设置。
//! 显式创建并注入使用者，克隆得到的句柄共享同一份数据。

use serde_json::{Map, Value};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::application::ports::{LanguageMap, QueryError, QueryServicePort};
use crate::domain::Settings;

/// 状态快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiSnapshot {
    pub languages: LanguageMap,
    pub voice_languages: LanguageMap,
    pub config: Map<String, Value>,
}

/// 共享 UI 状态句柄
///
/// 每次赋值整体替换对应字段，后写覆盖先写
#[derive(Debug, Clone, Default)]
pub struct UiState {
    inner: Arc<RwLock<UiSnapshot>>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    // 字段整体替换，poison 后数据仍然完整
    fn read(&self) -> RwLockReadGuard<'_, UiSnapshot> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UiSnapshot> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn languages(&self) -> LanguageMap {
        self.read().languages.clone()
    }

    pub fn voice_languages(&self) -> LanguageMap {
        self.read().voice_languages.clone()
    }

    pub fn config(&self) -> Map<String, Value> {
        self.read().config.clone()
    }

    pub fn snapshot(&self) -> UiSnapshot {
        self.read().clone()
    }

    pub fn set_languages(&self, languages: LanguageMap) {
        self.write().languages = languages;
    }

    pub fn set_voice_languages(&self, voice_languages: LanguageMap) {
        self.write().voice_languages = voice_languages;
    }

    pub fn set_config(&self, config: Map<String, Value>) {
        self.write().config = config;
    }

    /// 以 [`Settings`] 读取 config，字段缺失时使用默认值
    pub fn settings(&self) -> Result<Settings, serde_json::Error> {
        serde_json::from_value(Value::Object(self.config()))
    }

    /// 从后端拉取语言列表与设置并写入状态
    ///
    /// config 保存后端返回的原始设置对象。
    /// 三个请求全部成功后才写入，任一失败时状态保持不变
    pub async fn refresh(&self, service: &dyn QueryServicePort) -> Result<(), QueryError> {
        let languages = service.get_imported_text_languages().await?;
        let voice_languages = service.get_imported_voice_languages().await?;
        let config = service.get_settings_raw().await?;

        tracing::info!(
            languages = languages.len(),
            voice_languages = voice_languages.len(),
            "UI state refreshed"
        );

        let mut snapshot = self.write();
        snapshot.languages = languages;
        snapshot.voice_languages = voice_languages;
        snapshot.config = config;
        Ok(())
    }
}
