//! Query Adapter - 检索客户端实现

mod envelope;
mod fake_query_client;
mod http_query_client;

pub use envelope::{ApiEnvelope, CODE_OK};
pub use fake_query_client::FakeQueryClient;
pub use http_query_client::*;
