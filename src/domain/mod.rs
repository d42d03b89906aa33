//! Domain Layer - 领域层
//!
//! - language: 语言代码
//! - queries: 各接口的请求体
//! - results: 各接口的响应数据
//! - bundle: 前端构建清单

pub mod bundle;
pub mod language;
pub mod queries;
pub mod results;

pub use bundle::{BuildManifest, ManifestError};
pub use language::{IntoLangCode, LangCode, LangCodeError};
pub use queries::*;
pub use results::*;
