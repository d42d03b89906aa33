//! Query Service Port - 文本/语音检索服务抽象
//!
//! 定义检索后端的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{
    AssetDirUpdate, AvatarQuery, BaiduQuery, IntoLangCode, KeywordExplanation, KeywordQuery,
    LangCode, LangCodeError, NameQuery, QuestQuery, ReadableQuery, Settings, SettingsUpdate,
    StartupStatus, SubtitleContextQuery, TalkContent, TalkFromHashQuery, TextEntry, Timed,
    VoiceOver, VoiceRequest,
};

/// 检索错误
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request timeout: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Service error {code}: {msg}")]
    Service { code: i64, msg: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid language code: {0}")]
    InvalidLangCode(String),

    #[error("Client configuration error: {0}")]
    Config(String),
}

impl From<LangCodeError> for QueryError {
    fn from(err: LangCodeError) -> Self {
        QueryError::InvalidLangCode(err.0)
    }
}

/// 语言代码 -> 语言名称
pub type LanguageMap = BTreeMap<LangCode, String>;

/// Query Service Port
///
/// 每个方法对应后端的一个接口，只发起一次请求，不做重试与缓存
#[async_trait]
pub trait QueryServicePort: Send + Sync {
    /// 关键词释义
    async fn query_baidu(&self, query: BaiduQuery) -> Result<KeywordExplanation, QueryError>;

    /// 关键词全文检索
    async fn query_by_keyword(
        &self,
        query: KeywordQuery,
    ) -> Result<Timed<Vec<TextEntry>>, QueryError>;

    /// 获取语音音频
    async fn get_voice_over(&self, request: VoiceRequest) -> Result<VoiceOver, QueryError>;

    /// 根据文本哈希获取整段对话
    async fn get_talk_from_hash(
        &self,
        query: TalkFromHashQuery,
    ) -> Result<Timed<TalkContent>, QueryError>;

    async fn get_subtitle_context(&self, query: SubtitleContextQuery)
        -> Result<Value, QueryError>;

    /// 按任务名、书名检索
    async fn search_by_name(&self, query: NameQuery) -> Result<Value, QueryError>;

    /// 按角色名检索
    async fn search_avatar(&self, query: NameQuery) -> Result<Value, QueryError>;

    async fn get_avatar_voices(&self, query: AvatarQuery) -> Result<Value, QueryError>;

    async fn get_avatar_stories(&self, query: AvatarQuery) -> Result<Value, QueryError>;

    async fn get_readable_content(&self, query: ReadableQuery) -> Result<Value, QueryError>;

    async fn get_quest_dialogues(&self, query: QuestQuery) -> Result<Value, QueryError>;

    /// 已导入的文本语言
    async fn get_imported_text_languages(&self) -> Result<LanguageMap, QueryError>;

    /// 已加载的语音包语言
    async fn get_imported_voice_languages(&self) -> Result<LanguageMap, QueryError>;

    async fn get_settings(&self) -> Result<Settings, QueryError>;

    /// 后端返回的原始设置对象，不补默认值也不丢弃未知字段
    async fn get_settings_raw(&self) -> Result<Map<String, Value>, QueryError>;

    /// 保存设置，返回保存后的完整设置
    async fn save_settings(&self, update: SettingsUpdate) -> Result<Settings, QueryError>;

    async fn startup_status(&self) -> Result<StartupStatus, QueryError>;

    async fn set_asset_dir(&self, asset_dir: &str) -> Result<AssetDirUpdate, QueryError>;

    /// 由后端弹出目录选择对话框
    async fn pick_asset_dir(&self) -> Result<AssetDirUpdate, QueryError>;
}

/// 获取语音，语言代码在发送前被强制转换为整数
pub async fn fetch_voice_over(
    service: &dyn QueryServicePort,
    voice_path: &str,
    lang_code: impl IntoLangCode,
) -> Result<VoiceOver, QueryError> {
    let request = VoiceRequest::new(voice_path, lang_code)?;
    service.get_voice_over(request).await
}
