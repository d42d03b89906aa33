//! HTTP Query Client - 调用检索后端 HTTP 服务
//!
//! 实现 QueryServicePort trait，每个方法对应一个 `/api/...` 接口
//!
//! 后端 API:
//! POST {base_url}/api/keywordQuery
//! Request: {"keyword": "...", "langCode": 1, "speaker": null}  (JSON)
//! Response: {"data": {"contents": [...], "time": 1.2}, "code": 200, "msg": "ok"}
//!
//! 语音接口返回二进制音频，失败时响应头带 `Error`

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use super::envelope::{decode, decode_timed, ApiEnvelope};
use crate::application::ports::{LanguageMap, QueryError, QueryServicePort};
use crate::domain::{
    AssetDirRequest, AssetDirUpdate, AvatarQuery, BaiduQuery, KeywordExplanation, KeywordQuery,
    NameQuery, QuestQuery, ReadableQuery, SaveSettingsRequest, Settings, SettingsUpdate,
    StartupStatus, SubtitleContextQuery, TalkContent, TalkFromHashQuery, TextEntry, Timed,
    VoiceOver, VoiceRequest,
};

/// 接口路径
pub mod endpoints {
    pub const BAIDU_QUERY: &str = "/api/baiduQuery";
    pub const KEYWORD_QUERY: &str = "/api/keywordQuery";
    pub const GET_VOICE_OVER: &str = "/api/getVoiceOver";
    pub const GET_TALK_FROM_HASH: &str = "/api/getTalkFromHash";
    pub const GET_SUBTITLE_CONTEXT: &str = "/api/getSubtitleContext";
    pub const NAME_SEARCH: &str = "/api/nameSearch";
    pub const AVATAR_SEARCH: &str = "/api/avatarSearch";
    pub const AVATAR_VOICE: &str = "/api/avatarVoice";
    pub const AVATAR_STORY: &str = "/api/avatarStory";
    pub const GET_READABLE_CONTENT: &str = "/api/getReadableContent";
    pub const GET_QUEST_DIALOGUES: &str = "/api/getQuestDialogues";
    pub const IMPORTED_TEXT_LANGUAGES: &str = "/api/getImportedTextLanguages";
    pub const IMPORTED_VOICE_LANGUAGES: &str = "/api/getImportedVoiceLanguages";
    pub const GET_SETTINGS: &str = "/api/getSettings";
    pub const SAVE_SETTINGS: &str = "/api/saveSettings";
    pub const STARTUP_STATUS: &str = "/api/startupStatus";
    pub const SET_ASSET_DIR: &str = "/api/setAssetDir";
    pub const PICK_ASSET_DIR: &str = "/api/pickAssetDir";
}

/// 语音接口的失败标记响应头
pub const ERROR_HEADER: &str = "error";

/// HTTP 检索客户端配置
#[derive(Debug, Clone)]
pub struct HttpQueryClientConfig {
    /// 后端基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 是否真正调用关键词释义接口；关闭时返回占位数据
    pub baidu_enabled: bool,
}

impl Default for HttpQueryClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
            baidu_enabled: false,
        }
    }
}

impl HttpQueryClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_baidu(mut self, enabled: bool) -> Self {
        self.baidu_enabled = enabled;
        self
    }
}

/// HTTP 检索客户端
pub struct HttpQueryClient {
    client: Client,
    config: HttpQueryClientConfig,
}

impl HttpQueryClient {
    /// 创建新的 HTTP 检索客户端
    pub fn new(config: HttpQueryClientConfig) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QueryError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, QueryError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Sending query request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        read_envelope(response).await
    }

    async fn get_json(&self, path: &str) -> Result<Value, QueryError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Sending query request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        read_envelope(response).await
    }
}

fn map_transport_error(e: reqwest::Error) -> QueryError {
    if e.is_timeout() {
        QueryError::Timeout(e)
    } else {
        if e.is_connect() {
            tracing::warn!(error = %e, "Cannot connect to query service");
        }
        QueryError::Network(e)
    }
}

async fn read_envelope(response: Response) -> Result<Value, QueryError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(QueryError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.bytes().await.map_err(map_transport_error)?;
    ApiEnvelope::parse(&body)?.into_data()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[async_trait]
impl QueryServicePort for HttpQueryClient {
    async fn query_baidu(&self, query: BaiduQuery) -> Result<KeywordExplanation, QueryError> {
        if !self.config.baidu_enabled {
            tracing::debug!(keyword = %query.keyword, "Baidu lookup disabled, returning placeholder");
            return Ok(KeywordExplanation::placeholder());
        }
        decode(self.post_json(endpoints::BAIDU_QUERY, &query).await?)
    }

    async fn query_by_keyword(
        &self,
        query: KeywordQuery,
    ) -> Result<Timed<Vec<TextEntry>>, QueryError> {
        let data = self.post_json(endpoints::KEYWORD_QUERY, &query).await?;
        let result: Timed<Vec<TextEntry>> = decode_timed(data)?;
        tracing::debug!(
            keyword = %query.keyword,
            lang_code = %query.lang_code,
            hits = result.contents.len(),
            time_ms = result.time,
            "Keyword query completed"
        );
        Ok(result)
    }

    async fn get_voice_over(&self, request: VoiceRequest) -> Result<VoiceOver, QueryError> {
        let url = self.url(endpoints::GET_VOICE_OVER);
        tracing::debug!(
            url = %url,
            voice_path = %request.voice_path,
            lang_code = %request.lang_code,
            "Requesting voice over"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.headers().contains_key(ERROR_HEADER) {
            let reason = response.text().await.unwrap_or_default();
            tracing::warn!(
                voice_path = %request.voice_path,
                reason = %reason,
                "Voice over unavailable"
            );
            return Ok(VoiceOver::Unavailable { reason });
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Http {
                status: status.as_u16(),
                body,
            });
        }

        // 参数错误时后端返回 JSON 包装而不是音频
        if is_json(&response) {
            let body = response.bytes().await.map_err(map_transport_error)?;
            let envelope = ApiEnvelope::parse(&body)?;
            return match envelope.into_data() {
                Err(QueryError::Service { code, msg }) => {
                    tracing::warn!(code = code, msg = %msg, "Voice over rejected");
                    Ok(VoiceOver::Unavailable { reason: msg })
                }
                Err(e) => Err(e),
                Ok(_) => Err(QueryError::InvalidResponse(
                    "Expected audio payload, got JSON".to_string(),
                )),
            };
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(map_transport_error)?
            .to_vec();

        tracing::info!(
            voice_path = %request.voice_path,
            audio_size = audio_data.len(),
            "Voice over fetched"
        );

        if audio_data.is_empty() {
            Ok(VoiceOver::Empty)
        } else {
            Ok(VoiceOver::Audio(audio_data))
        }
    }

    async fn get_talk_from_hash(
        &self,
        query: TalkFromHashQuery,
    ) -> Result<Timed<TalkContent>, QueryError> {
        decode(self.post_json(endpoints::GET_TALK_FROM_HASH, &query).await?)
    }

    async fn get_subtitle_context(
        &self,
        query: SubtitleContextQuery,
    ) -> Result<Value, QueryError> {
        self.post_json(endpoints::GET_SUBTITLE_CONTEXT, &query).await
    }

    async fn search_by_name(&self, query: NameQuery) -> Result<Value, QueryError> {
        self.post_json(endpoints::NAME_SEARCH, &query).await
    }

    async fn search_avatar(&self, query: NameQuery) -> Result<Value, QueryError> {
        self.post_json(endpoints::AVATAR_SEARCH, &query).await
    }

    async fn get_avatar_voices(&self, query: AvatarQuery) -> Result<Value, QueryError> {
        self.post_json(endpoints::AVATAR_VOICE, &query).await
    }

    async fn get_avatar_stories(&self, query: AvatarQuery) -> Result<Value, QueryError> {
        self.post_json(endpoints::AVATAR_STORY, &query).await
    }

    async fn get_readable_content(&self, query: ReadableQuery) -> Result<Value, QueryError> {
        self.post_json(endpoints::GET_READABLE_CONTENT, &query).await
    }

    async fn get_quest_dialogues(&self, query: QuestQuery) -> Result<Value, QueryError> {
        self.post_json(endpoints::GET_QUEST_DIALOGUES, &query).await
    }

    async fn get_imported_text_languages(&self) -> Result<LanguageMap, QueryError> {
        decode(self.get_json(endpoints::IMPORTED_TEXT_LANGUAGES).await?)
    }

    async fn get_imported_voice_languages(&self) -> Result<LanguageMap, QueryError> {
        decode(self.get_json(endpoints::IMPORTED_VOICE_LANGUAGES).await?)
    }

    async fn get_settings(&self) -> Result<Settings, QueryError> {
        decode(self.get_json(endpoints::GET_SETTINGS).await?)
    }

    async fn get_settings_raw(&self) -> Result<Map<String, Value>, QueryError> {
        match self.get_json(endpoints::GET_SETTINGS).await? {
            Value::Object(map) => Ok(map),
            other => Err(QueryError::InvalidResponse(format!(
                "Settings payload is not an object: {}",
                other
            ))),
        }
    }

    async fn save_settings(&self, update: SettingsUpdate) -> Result<Settings, QueryError> {
        let request = SaveSettingsRequest { config: update };
        let settings: Settings = decode(self.post_json(endpoints::SAVE_SETTINGS, &request).await?)?;
        tracing::info!("Settings saved");
        Ok(settings)
    }

    async fn startup_status(&self) -> Result<StartupStatus, QueryError> {
        decode(self.get_json(endpoints::STARTUP_STATUS).await?)
    }

    async fn set_asset_dir(&self, asset_dir: &str) -> Result<AssetDirUpdate, QueryError> {
        let request = AssetDirRequest {
            asset_dir: asset_dir.to_string(),
        };
        decode(self.post_json(endpoints::SET_ASSET_DIR, &request).await?)
    }

    async fn pick_asset_dir(&self) -> Result<AssetDirUpdate, QueryError> {
        decode(
            self.post_json(endpoints::PICK_ASSET_DIR, &Map::new())
                .await?,
        )
    }
}
