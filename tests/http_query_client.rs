//! HttpQueryClient 与本地 axum 模拟后端的集成测试

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use textmap_query::application::{fetch_voice_over, QueryError, QueryServicePort};
use textmap_query::domain::{
    AvatarQuery, BaiduQuery, GenderFilter, KeywordExplanation, KeywordQuery, LangCode, NameQuery,
    QuestQuery, ReadableQuery, SettingsUpdate, SubtitleContextQuery, TalkFromHashQuery,
    VoiceOver, VoiceRequest,
};
use textmap_query::infrastructure::{HttpQueryClient, HttpQueryClientConfig, UiState};

const AUDIO: &[u8] = b"RIFF\x00\x01\x02wem";

/// 记录收到的请求 (path, body)
#[derive(Clone, Default)]
struct MockBackend {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
    settings: Arc<Mutex<Option<Value>>>,
}

impl MockBackend {
    /// 替换 getSettings 返回的 data
    fn serve_settings(&self, data: Value) {
        *self.settings.lock().unwrap() = Some(data);
    }

    fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }

    fn last_body(&self, path: &str) -> Value {
        self.requests()
            .into_iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, body)| body)
            .unwrap_or_else(|| panic!("no request recorded for {}", path))
    }
}

fn envelope(data: Value) -> Response {
    Json(json!({"data": data, "code": 200, "msg": "ok"})).into_response()
}

fn failure(code: i64, msg: &str) -> Response {
    Json(json!({"data": null, "code": code, "msg": msg})).into_response()
}

async fn handle(State(backend): State<MockBackend>, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    backend
        .requests
        .lock()
        .unwrap()
        .push((path.clone(), body.clone()));
    let settings_override = backend.settings.lock().unwrap().clone();

    match path.as_str() {
        "/api/keywordQuery" => {
            if body["keyword"].as_str().map(str::trim) == Some("") {
                return envelope(json!([]));
            }
            envelope(json!({
                "contents": [{
                    "type": "Dialogue",
                    "origin": "TASK NAME",
                    "voicePaths": ["VO_AQ/vo_1.wem"],
                    "translates": {"1": "你好", "4": "Hello"},
                    "hash": 42,
                    "isTalk": true
                }],
                "time": 1.5
            }))
        }
        "/api/getVoiceOver" => match body["voicePath"].as_str() {
            Some("missing.wem") => (
                [("access-control-expose-headers", "Error"), ("error", "True")],
                "Audio File Not Found",
            )
                .into_response(),
            Some("empty.wem") => (
                [(header::CONTENT_TYPE, "application/octet-stream")],
                Vec::<u8>::new(),
            )
                .into_response(),
            Some("bad-lang.wem") => failure(400, "Invalid langCode"),
            _ => (
                [(header::CONTENT_TYPE, "application/octet-stream")],
                AUDIO.to_vec(),
            )
                .into_response(),
        },
        "/api/getTalkFromHash" => envelope(json!({
            "contents": {
                "talkQuestName": "Prologue",
                "talkId": 7001,
                "dialogues": [{"translates": {"1": "你好"}, "voicePaths": [], "talker": "派蒙", "dialogueId": 1}]
            },
            "time": 0.3
        })),
        "/api/getQuestDialogues" if body["questId"] == json!(0) => {
            failure(114, "quest not found")
        }
        "/api/avatarStory" if body["avatarId"] == json!(500) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
        }
        "/api/getImportedTextLanguages" => envelope(json!({"1": "CHS", "4": "EN"})),
        "/api/getImportedVoiceLanguages" => envelope(json!({"1": "Chinese", "2": "English"})),
        "/api/getSettings" if settings_override.is_some() => {
            envelope(settings_override.unwrap_or(Value::Null))
        }
        "/api/getSettings" | "/api/saveSettings" => envelope(json!({
            "resultLanguages": [1, 4],
            "defaultSearchLanguage": 1,
            "assetDir": "/games/gi",
            "sourceLanguage": 1,
            "isMale": "both"
        })),
        "/api/startupStatus" => envelope(json!({"assetDirValid": false, "assetDir": ""})),
        "/api/setAssetDir" => envelope(json!({
            "assetDir": body["assetDir"],
            "assetDirValid": true
        })),
        "/api/pickAssetDir" => envelope(json!({
            "cancel": true,
            "assetDir": "",
            "assetDirValid": false
        })),
        "/api/baiduQuery" => envelope(json!({"k": body["keyword"], "v": "explained"})),
        _ => envelope(json!({"echo": body})),
    }
}

async fn spawn_backend() -> (HttpQueryClient, MockBackend) {
    spawn_backend_with(|config| config).await
}

async fn spawn_backend_with(
    customize: impl FnOnce(HttpQueryClientConfig) -> HttpQueryClientConfig,
) -> (HttpQueryClient, MockBackend) {
    let backend = MockBackend::default();
    let app = Router::new().fallback(handle).with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = customize(HttpQueryClientConfig::new(format!("http://{}", addr)).with_timeout(5));
    (HttpQueryClient::new(config).unwrap(), backend)
}

#[tokio::test]
async fn test_keyword_query_sends_fields_unmodified() {
    let (client, backend) = spawn_backend().await;

    let result = client
        .query_by_keyword(KeywordQuery {
            keyword: "  Paimon ".to_string(),
            lang_code: LangCode::new(4),
            speaker: Some("Traveler".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(
        backend.last_body("/api/keywordQuery"),
        json!({"keyword": "  Paimon ", "langCode": 4, "speaker": "Traveler"})
    );
    assert_eq!(result.contents.len(), 1);
    assert_eq!(result.time, 1.5);
    let entry = &result.contents[0];
    assert_eq!(entry.kind.as_deref(), Some("Dialogue"));
    assert_eq!(entry.voice_paths, vec!["VO_AQ/vo_1.wem".to_string()]);
    assert_eq!(
        entry.translates.get(&LangCode::new(4)).map(String::as_str),
        Some("Hello")
    );
}

#[tokio::test]
async fn test_keyword_query_empty_keyword_yields_empty_results() {
    let (client, _backend) = spawn_backend().await;

    let result = client
        .query_by_keyword(KeywordQuery {
            keyword: " ".to_string(),
            lang_code: LangCode::new(1),
            speaker: None,
        })
        .await
        .unwrap();

    assert!(result.contents.is_empty());
}

#[tokio::test]
async fn test_request_bodies_mirror_parameters() {
    let (client, backend) = spawn_backend().await;
    let lang = Some(LangCode::new(1));

    client
        .get_talk_from_hash(TalkFromHashQuery {
            text_hash: 3_141_592_653,
            search_lang: lang,
        })
        .await
        .unwrap();
    client
        .get_subtitle_context(SubtitleContextQuery {
            file_name: Some("Cs_Intro.srt".to_string()),
            subtitle_id: Some(12),
            search_lang: lang,
        })
        .await
        .unwrap();
    client
        .search_by_name(NameQuery {
            keyword: "Mondstadt".to_string(),
            lang_code: LangCode::new(4),
        })
        .await
        .unwrap();
    client
        .search_avatar(NameQuery {
            keyword: "Venti".to_string(),
            lang_code: LangCode::new(4),
        })
        .await
        .unwrap();
    client
        .get_avatar_voices(AvatarQuery {
            avatar_id: 10000022,
            search_lang: lang,
        })
        .await
        .unwrap();
    client
        .get_avatar_stories(AvatarQuery {
            avatar_id: 10000022,
            search_lang: None,
        })
        .await
        .unwrap();
    client
        .get_readable_content(ReadableQuery {
            readable_id: Some(100),
            file_name: None,
            search_lang: lang,
        })
        .await
        .unwrap();
    client
        .get_quest_dialogues(QuestQuery {
            quest_id: 1001,
            search_lang: lang,
        })
        .await
        .unwrap();

    assert_eq!(
        backend.last_body("/api/getTalkFromHash"),
        json!({"textHash": 3_141_592_653u64, "searchLang": 1})
    );
    assert_eq!(
        backend.last_body("/api/getSubtitleContext"),
        json!({"fileName": "Cs_Intro.srt", "subtitleId": 12, "searchLang": 1})
    );
    assert_eq!(
        backend.last_body("/api/nameSearch"),
        json!({"keyword": "Mondstadt", "langCode": 4})
    );
    assert_eq!(
        backend.last_body("/api/avatarSearch"),
        json!({"keyword": "Venti", "langCode": 4})
    );
    assert_eq!(
        backend.last_body("/api/avatarVoice"),
        json!({"avatarId": 10000022, "searchLang": 1})
    );
    assert_eq!(
        backend.last_body("/api/avatarStory"),
        json!({"avatarId": 10000022, "searchLang": null})
    );
    assert_eq!(
        backend.last_body("/api/getReadableContent"),
        json!({"readableId": 100, "fileName": null, "searchLang": 1})
    );
    assert_eq!(
        backend.last_body("/api/getQuestDialogues"),
        json!({"questId": 1001, "searchLang": 1})
    );
}

#[tokio::test]
async fn test_untyped_payload_is_passed_through() {
    let (client, _backend) = spawn_backend().await;

    let data = client
        .search_by_name(NameQuery {
            keyword: "Liyue".to_string(),
            lang_code: LangCode::new(1),
        })
        .await
        .unwrap();

    assert_eq!(data, json!({"echo": {"keyword": "Liyue", "langCode": 1}}));
}

#[tokio::test]
async fn test_talk_from_hash_decodes_dialogues() {
    let (client, _backend) = spawn_backend().await;

    let talk = client
        .get_talk_from_hash(TalkFromHashQuery {
            text_hash: 1,
            search_lang: None,
        })
        .await
        .unwrap();

    assert_eq!(talk.contents.talk_id, 7001);
    assert_eq!(talk.contents.talk_quest_name.as_deref(), Some("Prologue"));
    assert_eq!(talk.contents.dialogues[0].talker.as_deref(), Some("派蒙"));
}

#[tokio::test]
async fn test_voice_over_coerces_lang_and_returns_audio() {
    let (client, backend) = spawn_backend().await;

    let voice = fetch_voice_over(&client, "VO_AQ/vo_1.wem", "2").await.unwrap();

    assert_eq!(voice, VoiceOver::Audio(AUDIO.to_vec()));
    assert_eq!(
        backend.last_body("/api/getVoiceOver"),
        json!({"voicePath": "VO_AQ/vo_1.wem", "langCode": 2})
    );
}

#[tokio::test]
async fn test_voice_over_error_header_is_unavailable() {
    let (client, _backend) = spawn_backend().await;

    let voice = client
        .get_voice_over(VoiceRequest::new("missing.wem", 1u32).unwrap())
        .await
        .unwrap();

    assert_eq!(
        voice,
        VoiceOver::Unavailable {
            reason: "Audio File Not Found".to_string()
        }
    );
    assert!(voice.audio().is_none());
}

#[tokio::test]
async fn test_voice_over_empty_payload() {
    let (client, _backend) = spawn_backend().await;

    let voice = client
        .get_voice_over(VoiceRequest::new("empty.wem", 1u32).unwrap())
        .await
        .unwrap();

    assert_eq!(voice, VoiceOver::Empty);
}

#[tokio::test]
async fn test_voice_over_invalid_lang_never_reaches_backend() {
    let (client, backend) = spawn_backend().await;

    let err = fetch_voice_over(&client, "VO_AQ/vo_1.wem", "chinese")
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::InvalidLangCode(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_voice_over_json_rejection_is_unavailable() {
    let (client, _backend) = spawn_backend().await;

    let voice = client
        .get_voice_over(VoiceRequest::new("bad-lang.wem", 1u32).unwrap())
        .await
        .unwrap();

    assert_eq!(
        voice,
        VoiceOver::Unavailable {
            reason: "Invalid langCode".to_string()
        }
    );
}

#[tokio::test]
async fn test_service_error_code_surfaces() {
    let (client, _backend) = spawn_backend().await;

    let err = client
        .get_quest_dialogues(QuestQuery {
            quest_id: 0,
            search_lang: None,
        })
        .await
        .unwrap_err();

    match err {
        QueryError::Service { code, msg } => {
            assert_eq!(code, 114);
            assert_eq!(msg, "quest not found");
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_status_error_surfaces() {
    let (client, _backend) = spawn_backend().await;

    let err = client
        .get_avatar_stories(AvatarQuery {
            avatar_id: 500,
            search_lang: None,
        })
        .await
        .unwrap_err();

    match err {
        QueryError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let client =
        HttpQueryClient::new(HttpQueryClientConfig::new("http://127.0.0.1:1").with_timeout(2))
            .unwrap();

    let err = client
        .search_avatar(NameQuery {
            keyword: "Venti".to_string(),
            lang_code: LangCode::new(1),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Network(_) | QueryError::Timeout(_)));
    let source = std::error::Error::source(&err).expect("transport error keeps its source");
    assert!(source.downcast_ref::<reqwest::Error>().is_some());
}

#[tokio::test]
async fn test_baidu_disabled_never_calls_backend() {
    let (client, backend) = spawn_backend().await;

    let result = client
        .query_baidu(BaiduQuery {
            keyword: "anything".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result, KeywordExplanation::placeholder());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_baidu_enabled_calls_endpoint() {
    let (client, backend) = spawn_backend_with(|config| config.with_baidu(true)).await;

    let result = client
        .query_baidu(BaiduQuery {
            keyword: "Anemo".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.k, "Anemo");
    assert_eq!(result.v, "explained");
    assert_eq!(backend.last_body("/api/baiduQuery"), json!({"keyword": "Anemo"}));
}

#[tokio::test]
async fn test_settings_round_trip() {
    let (client, backend) = spawn_backend().await;

    let settings = client.get_settings().await.unwrap();
    assert_eq!(settings.asset_dir, "/games/gi");
    assert_eq!(settings.is_male, GenderFilter::Both);

    client
        .save_settings(SettingsUpdate {
            result_languages: Some(vec![LangCode::new(1), LangCode::new(9)]),
            is_male: Some(GenderFilter::Male),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(
        backend.last_body("/api/saveSettings"),
        json!({"config": {"resultLanguages": [1, 9], "isMale": true}})
    );
}

#[tokio::test]
async fn test_asset_dir_endpoints() {
    let (client, backend) = spawn_backend().await;

    let status = client.startup_status().await.unwrap();
    assert!(!status.asset_dir_valid);

    let update = client.set_asset_dir("/games/gi").await.unwrap();
    assert_eq!(update.asset_dir, "/games/gi");
    assert!(update.asset_dir_valid);
    assert_eq!(
        backend.last_body("/api/setAssetDir"),
        json!({"assetDir": "/games/gi"})
    );

    let picked = client.pick_asset_dir().await.unwrap();
    assert_eq!(picked.cancel, Some(true));
}

#[tokio::test]
async fn test_ui_state_refresh_from_backend() {
    let (client, _backend) = spawn_backend().await;

    let state = UiState::new();
    state.refresh(&client).await.unwrap();

    let snapshot = state.snapshot();
    assert_eq!(
        snapshot.languages.get(&LangCode::new(4)).map(String::as_str),
        Some("EN")
    );
    assert_eq!(snapshot.voice_languages.len(), 2);
    assert_eq!(snapshot.config.get("isMale"), Some(&json!("both")));
}

#[tokio::test]
async fn test_ui_state_keeps_backend_settings_verbatim() {
    let (client, backend) = spawn_backend().await;
    backend.serve_settings(json!({"assetDir": "/x", "theme": "dark"}));

    let state = UiState::new();
    state.refresh(&client).await.unwrap();

    let config = state.config();
    assert_eq!(
        Value::Object(config),
        json!({"assetDir": "/x", "theme": "dark"})
    );

    // 类型化视图对缺失字段补默认值，但不回写 config
    let settings = state.settings().unwrap();
    assert_eq!(settings.asset_dir, "/x");
    assert_eq!(settings.is_male, GenderFilter::Both);
    assert!(!state.config().contains_key("isMale"));
}
