//! Fake Query Client - 用于测试的检索客户端
//!
//! 不访问网络，返回预设数据；检索类接口把请求体原样回显为 `data`

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{LanguageMap, QueryError, QueryServicePort};
use crate::domain::{
    AssetDirUpdate, AvatarQuery, BaiduQuery, KeywordExplanation, KeywordQuery, NameQuery,
    QuestQuery, ReadableQuery, Settings, SettingsUpdate, StartupStatus, SubtitleContextQuery,
    TalkContent, TalkFromHashQuery, TextEntry, Timed, VoiceOver, VoiceRequest,
};

/// Fake Query Client
pub struct FakeQueryClient {
    languages: LanguageMap,
    voice_languages: LanguageMap,
    settings: Mutex<Settings>,
    voice: VoiceOver,
    settings_failure: Option<(i64, String)>,
    calls: AtomicUsize,
}

impl FakeQueryClient {
    pub fn new(languages: LanguageMap, voice_languages: LanguageMap, settings: Settings) -> Self {
        Self {
            languages,
            voice_languages,
            settings: Mutex::new(settings),
            voice: VoiceOver::Empty,
            settings_failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// 设置 `get_voice_over` 的返回值
    pub fn with_voice(mut self, voice: VoiceOver) -> Self {
        self.voice = voice;
        self
    }

    /// 让设置接口返回业务错误
    pub fn with_settings_failure(mut self, code: i64, msg: impl Into<String>) -> Self {
        self.settings_failure = Some((code, msg.into()));
        self
    }

    /// 已处理的请求数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn echo<T: Serialize>(&self, query: &T) -> Result<Value, QueryError> {
        self.record();
        serde_json::to_value(query).map_err(|e| QueryError::InvalidResponse(e.to_string()))
    }

    fn current_settings(&self) -> Result<Settings, QueryError> {
        if let Some((code, msg)) = &self.settings_failure {
            return Err(QueryError::Service {
                code: *code,
                msg: msg.clone(),
            });
        }
        self.settings
            .lock()
            .map(|s| s.clone())
            .map_err(|_| QueryError::Config("settings lock poisoned".to_string()))
    }
}

impl Default for FakeQueryClient {
    fn default() -> Self {
        Self::new(LanguageMap::new(), LanguageMap::new(), Settings::default())
    }
}

#[async_trait]
impl QueryServicePort for FakeQueryClient {
    async fn query_baidu(&self, _query: BaiduQuery) -> Result<KeywordExplanation, QueryError> {
        self.record();
        Ok(KeywordExplanation::placeholder())
    }

    async fn query_by_keyword(
        &self,
        query: KeywordQuery,
    ) -> Result<Timed<Vec<TextEntry>>, QueryError> {
        self.record();
        let entry = TextEntry {
            origin: query.speaker,
            content: Some(query.keyword),
            ..Default::default()
        };
        Ok(Timed {
            contents: vec![entry],
            time: 0.0,
        })
    }

    async fn get_voice_over(&self, _request: VoiceRequest) -> Result<VoiceOver, QueryError> {
        self.record();
        Ok(self.voice.clone())
    }

    async fn get_talk_from_hash(
        &self,
        query: TalkFromHashQuery,
    ) -> Result<Timed<TalkContent>, QueryError> {
        self.record();
        Ok(Timed {
            contents: TalkContent {
                talk_id: query.text_hash,
                ..Default::default()
            },
            time: 0.0,
        })
    }

    async fn get_subtitle_context(
        &self,
        query: SubtitleContextQuery,
    ) -> Result<Value, QueryError> {
        self.echo(&query)
    }

    async fn search_by_name(&self, query: NameQuery) -> Result<Value, QueryError> {
        self.echo(&query)
    }

    async fn search_avatar(&self, query: NameQuery) -> Result<Value, QueryError> {
        self.echo(&query)
    }

    async fn get_avatar_voices(&self, query: AvatarQuery) -> Result<Value, QueryError> {
        self.echo(&query)
    }

    async fn get_avatar_stories(&self, query: AvatarQuery) -> Result<Value, QueryError> {
        self.echo(&query)
    }

    async fn get_readable_content(&self, query: ReadableQuery) -> Result<Value, QueryError> {
        self.echo(&query)
    }

    async fn get_quest_dialogues(&self, query: QuestQuery) -> Result<Value, QueryError> {
        self.echo(&query)
    }

    async fn get_imported_text_languages(&self) -> Result<LanguageMap, QueryError> {
        self.record();
        Ok(self.languages.clone())
    }

    async fn get_imported_voice_languages(&self) -> Result<LanguageMap, QueryError> {
        self.record();
        Ok(self.voice_languages.clone())
    }

    async fn get_settings(&self) -> Result<Settings, QueryError> {
        self.record();
        self.current_settings()
    }

    async fn get_settings_raw(&self) -> Result<Map<String, Value>, QueryError> {
        self.record();
        match serde_json::to_value(self.current_settings()?) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(QueryError::InvalidResponse(other.to_string())),
            Err(e) => Err(QueryError::InvalidResponse(e.to_string())),
        }
    }

    async fn save_settings(&self, update: SettingsUpdate) -> Result<Settings, QueryError> {
        self.record();
        let mut settings = self
            .settings
            .lock()
            .map_err(|_| QueryError::Config("settings lock poisoned".to_string()))?;
        if let Some(lang) = update.default_search_language {
            settings.default_search_language = lang;
        }
        if let Some(langs) = update.result_languages {
            settings.result_languages = langs;
        }
        if let Some(lang) = update.source_language {
            settings.source_language = lang;
        }
        if let Some(is_male) = update.is_male {
            settings.is_male = is_male;
        }
        Ok(settings.clone())
    }

    async fn startup_status(&self) -> Result<StartupStatus, QueryError> {
        self.record();
        let settings = self.current_settings()?;
        Ok(StartupStatus {
            asset_dir_valid: !settings.asset_dir.is_empty(),
            asset_dir: settings.asset_dir,
        })
    }

    async fn set_asset_dir(&self, asset_dir: &str) -> Result<AssetDirUpdate, QueryError> {
        self.record();
        let mut settings = self
            .settings
            .lock()
            .map_err(|_| QueryError::Config("settings lock poisoned".to_string()))?;
        settings.asset_dir = asset_dir.to_string();
        Ok(AssetDirUpdate {
            cancel: None,
            asset_dir: settings.asset_dir.clone(),
            asset_dir_valid: !asset_dir.is_empty(),
        })
    }

    async fn pick_asset_dir(&self) -> Result<AssetDirUpdate, QueryError> {
        self.record();
        let settings = self.current_settings()?;
        Ok(AssetDirUpdate {
            cancel: Some(true),
            asset_dir_valid: !settings.asset_dir.is_empty(),
            asset_dir: settings.asset_dir,
        })
    }
}
