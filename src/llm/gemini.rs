//! Gemini 客户端（OpenAI 兼容格式）
//!
//! Gemini 提供 OpenAI 兼容的 chat/completions 端点。
//! - Base URL: https://generativelanguage.googleapis.com/v1beta/openai
//! - 模型: gemini-2.5-flash

use crate::llm::OpenAiClient;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const GEMINI_FLASH: &str = "gemini-2.5-flash";

/// 创建 Gemini 客户端
///
/// - `api_key` 缺省时读取环境变量 `GEMINI_API_KEY`
/// - `base_url` / `model` 缺省时使用官方兼容端点与 `gemini-2.5-flash`
pub fn create_gemini_client(
    api_key: Option<&str>,
    base_url: Option<&str>,
    model: Option<&str>,
) -> OpenAiClient {
    let api_key = api_key
        .map(String::from)
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; generative replies will fail");
    }

    OpenAiClient::new(
        Some(base_url.unwrap_or(GEMINI_BASE_URL)),
        model.unwrap_or(GEMINI_FLASH),
        &api_key,
    )
}
