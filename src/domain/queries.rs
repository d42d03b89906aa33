//! Query Requests
//!
//! 每个后端接口对应一个请求体，字段与线上格式一一对应（camelCase）。
//! 可选字段始终被序列化（缺省为 `null`），保证请求体字段集合固定。

use serde::Serialize;

use super::language::{IntoLangCode, LangCode, LangCodeError};
use super::results::SettingsUpdate;

/// POST /api/baiduQuery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaiduQuery {
    pub keyword: String,
}

/// POST /api/keywordQuery
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordQuery {
    pub keyword: String,
    pub lang_code: LangCode,
    /// 限定说话者（角色名等）
    pub speaker: Option<String>,
}

/// POST /api/getVoiceOver
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceRequest {
    pub voice_path: String,
    pub lang_code: LangCode,
}

impl VoiceRequest {
    /// 构造语音请求，`lang_code` 在这里被强制转换为整数
    pub fn new(
        voice_path: impl Into<String>,
        lang_code: impl IntoLangCode,
    ) -> Result<Self, LangCodeError> {
        Ok(Self {
            voice_path: voice_path.into(),
            lang_code: lang_code.into_lang_code()?,
        })
    }
}

/// POST /api/getTalkFromHash
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkFromHashQuery {
    pub text_hash: u64,
    pub search_lang: Option<LangCode>,
}

/// POST /api/getSubtitleContext
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleContextQuery {
    pub file_name: Option<String>,
    pub subtitle_id: Option<u64>,
    pub search_lang: Option<LangCode>,
}

/// POST /api/nameSearch, /api/avatarSearch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameQuery {
    pub keyword: String,
    pub lang_code: LangCode,
}

/// POST /api/avatarVoice, /api/avatarStory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarQuery {
    pub avatar_id: u64,
    pub search_lang: Option<LangCode>,
}

/// POST /api/getReadableContent
///
/// `readable_id` 与 `file_name` 二选一即可，后端优先使用 `readable_id`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadableQuery {
    pub readable_id: Option<u64>,
    pub file_name: Option<String>,
    pub search_lang: Option<LangCode>,
}

/// POST /api/getQuestDialogues
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestQuery {
    pub quest_id: u64,
    pub search_lang: Option<LangCode>,
}

/// POST /api/saveSettings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveSettingsRequest {
    pub config: SettingsUpdate,
}

/// POST /api/setAssetDir
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDirRequest {
    pub asset_dir: String,
}
