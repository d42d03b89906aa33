//! textmap - 游戏文本与语音检索命令行
//!
//! 每个子命令对应后端的一个接口，JSON 结果输出到 stdout，日志输出到 stderr

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use textmap_query::application::{fetch_voice_over, QueryServicePort};
use textmap_query::config::{load_config_from_path, print_config, AppConfig};
use textmap_query::domain::{
    AvatarQuery, BaiduQuery, BuildManifest, GenderFilter, KeywordQuery, LangCode, NameQuery,
    QuestQuery, ReadableQuery, SettingsUpdate, SubtitleContextQuery, TalkFromHashQuery, VoiceOver,
};
use textmap_query::infrastructure::{HttpQueryClient, UiState};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// 配置文件路径（默认搜索 textmap.toml / textmap.local.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 关键词释义
    Baidu { keyword: String },
    /// 关键词检索
    Keyword {
        keyword: String,
        #[arg(long)]
        lang: LangCode,
        #[arg(long)]
        speaker: Option<String>,
    },
    /// 下载语音
    Voice {
        voice_path: String,
        /// 语言代码，按整数解析
        #[arg(long)]
        lang: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// 根据文本哈希获取整段对话
    Talk {
        text_hash: u64,
        #[arg(long)]
        lang: Option<LangCode>,
    },
    /// 字幕上下文
    Subtitle {
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        id: Option<u64>,
        #[arg(long)]
        lang: Option<LangCode>,
    },
    /// 按任务名、书名检索
    Name {
        keyword: String,
        #[arg(long)]
        lang: LangCode,
    },
    /// 按角色名检索
    Avatar {
        keyword: String,
        #[arg(long)]
        lang: LangCode,
    },
    /// 角色语音列表
    AvatarVoices {
        avatar_id: u64,
        #[arg(long)]
        lang: Option<LangCode>,
    },
    /// 角色故事
    AvatarStories {
        avatar_id: u64,
        #[arg(long)]
        lang: Option<LangCode>,
    },
    /// 书籍内容
    Readable {
        #[arg(long)]
        id: Option<u64>,
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        lang: Option<LangCode>,
    },
    /// 任务对话
    Quest {
        quest_id: u64,
        #[arg(long)]
        lang: Option<LangCode>,
    },
    /// 已导入的文本/语音语言及当前设置
    Languages,
    /// 查看或修改设置（未给出任何修改项时只查看）
    Settings {
        #[arg(long)]
        search_lang: Option<LangCode>,
        #[arg(long)]
        source_lang: Option<LangCode>,
        #[arg(long, value_delimiter = ',')]
        result_langs: Option<Vec<LangCode>>,
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,
    },
    /// 后端启动状态
    Status,
    /// 设置游戏资源目录
    SetAssetDir { dir: String },
    /// 由后端弹出目录选择对话框
    PickAssetDir,
    /// 校验并输出前端构建清单
    Manifest {
        /// 查询模块所属分组
        #[arg(long)]
        module: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GenderArg {
    Male,
    Female,
    Both,
}

impl From<GenderArg> for GenderFilter {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => GenderFilter::Male,
            GenderArg::Female => GenderFilter::Female,
            GenderArg::Both => GenderFilter::Both,
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},textmap_query={},textmap={}",
        config.log.level, config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_manifest(config: &AppConfig) -> anyhow::Result<BuildManifest> {
    let manifest = match &config.bundle.manifest {
        Some(path) => BuildManifest::from_path(path)
            .with_context(|| format!("Failed to load manifest {}", path.display()))?,
        None => BuildManifest::default(),
    };
    manifest.validate()?;
    Ok(manifest)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config_from_path(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    print_config(&config);

    let client = HttpQueryClient::new(config.client.http_config())?;

    match args.command {
        Command::Baidu { keyword } => {
            print_json(&client.query_baidu(BaiduQuery { keyword }).await?)?;
        }
        Command::Keyword {
            keyword,
            lang,
            speaker,
        } => {
            let query = KeywordQuery {
                keyword,
                lang_code: lang,
                speaker,
            };
            print_json(&client.query_by_keyword(query).await?)?;
        }
        Command::Voice {
            voice_path,
            lang,
            out,
        } => match fetch_voice_over(&client, &voice_path, &lang).await? {
            VoiceOver::Audio(data) => {
                tokio::fs::write(&out, &data)
                    .await
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                tracing::info!(path = %out.display(), bytes = data.len(), "Voice saved");
            }
            VoiceOver::Empty => {
                tracing::warn!(voice_path = %voice_path, "Voice payload is empty, nothing written");
            }
            VoiceOver::Unavailable { reason } => {
                anyhow::bail!("Voice {} unavailable: {}", voice_path, reason);
            }
        },
        Command::Talk { text_hash, lang } => {
            let query = TalkFromHashQuery {
                text_hash,
                search_lang: lang,
            };
            print_json(&client.get_talk_from_hash(query).await?)?;
        }
        Command::Subtitle { file, id, lang } => {
            let query = SubtitleContextQuery {
                file_name: file,
                subtitle_id: id,
                search_lang: lang,
            };
            print_json(&client.get_subtitle_context(query).await?)?;
        }
        Command::Name { keyword, lang } => {
            let query = NameQuery {
                keyword,
                lang_code: lang,
            };
            print_json(&client.search_by_name(query).await?)?;
        }
        Command::Avatar { keyword, lang } => {
            let query = NameQuery {
                keyword,
                lang_code: lang,
            };
            print_json(&client.search_avatar(query).await?)?;
        }
        Command::AvatarVoices { avatar_id, lang } => {
            let query = AvatarQuery {
                avatar_id,
                search_lang: lang,
            };
            print_json(&client.get_avatar_voices(query).await?)?;
        }
        Command::AvatarStories { avatar_id, lang } => {
            let query = AvatarQuery {
                avatar_id,
                search_lang: lang,
            };
            print_json(&client.get_avatar_stories(query).await?)?;
        }
        Command::Readable { id, file, lang } => {
            let query = ReadableQuery {
                readable_id: id,
                file_name: file,
                search_lang: lang,
            };
            print_json(&client.get_readable_content(query).await?)?;
        }
        Command::Quest { quest_id, lang } => {
            let query = QuestQuery {
                quest_id,
                search_lang: lang,
            };
            print_json(&client.get_quest_dialogues(query).await?)?;
        }
        Command::Languages => {
            let state = UiState::new();
            state.refresh(&client).await?;
            let snapshot = state.snapshot();
            print_json(&serde_json::json!({
                "languages": snapshot.languages,
                "voiceLanguages": snapshot.voice_languages,
                "config": snapshot.config,
            }))?;
        }
        Command::Settings {
            search_lang,
            source_lang,
            result_langs,
            gender,
        } => {
            let update = SettingsUpdate {
                default_search_language: search_lang,
                result_languages: result_langs,
                source_language: source_lang,
                is_male: gender.map(GenderFilter::from),
            };
            let settings = if update.is_empty() {
                client.get_settings().await?
            } else {
                client.save_settings(update).await?
            };
            print_json(&settings)?;
        }
        Command::Status => {
            print_json(&client.startup_status().await?)?;
        }
        Command::SetAssetDir { dir } => {
            print_json(&client.set_asset_dir(&dir).await?)?;
        }
        Command::PickAssetDir => {
            print_json(&client.pick_asset_dir().await?)?;
        }
        Command::Manifest { module } => {
            let manifest = load_manifest(&config)?;
            match module {
                Some(module) => print_json(&serde_json::json!({
                    "module": module,
                    "resolved": manifest.resolve_alias(&module),
                    "group": manifest.group_of(&module),
                }))?,
                None => print_json(&manifest)?,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_args_are_strict_outside_voice() {
        let parsed = Args::try_parse_from(["textmap", "keyword", "Paimon", "--lang", "4"]).unwrap();
        assert!(matches!(
            parsed.command,
            Command::Keyword { lang, .. } if lang == LangCode::new(4)
        ));

        assert!(Args::try_parse_from(["textmap", "keyword", "Paimon", "--lang", "4abc"]).is_err());
        assert!(Args::try_parse_from(["textmap", "quest", "1001", "--lang", "1x"]).is_err());
        assert!(Args::try_parse_from(["textmap", "settings", "--result-langs", "1,4x"]).is_err());
    }

    #[test]
    fn test_voice_lang_is_passed_through_for_coercion() {
        let parsed = Args::try_parse_from([
            "textmap", "voice", "VO_AQ/vo_1.wem", "--lang", "2abc", "--out", "a.wem",
        ])
        .unwrap();
        assert!(matches!(parsed.command, Command::Voice { lang, .. } if lang == "2abc"));
    }
}
