//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `AUTOREPLY__*` 覆盖（双下划线表示嵌套，如
//! `AUTOREPLY__SESSION__BRIDGE_URL=ws://127.0.0.1:8787`）。最后对未设置的项回落到
//! 部署平台惯用的 `GEMINI_API_KEY` 与 `PORT`。

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::core::{ReconnectPolicy, ResponderError};
use crate::llm::GEMINI_FLASH;
use crate::memory::MAX_HISTORY_LENGTH;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmSection,
    pub responder: ResponderSection,
    pub session: SessionSection,
    pub server: ServerSection,
}

/// [llm] 段：生成式后端
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub model: String,
    /// 未设置时使用 Gemini 的 OpenAI 兼容端点
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: GEMINI_FLASH.to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

/// [responder] 段：冷却窗口与历史长度
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResponderSection {
    pub cooldown_secs: u64,
    /// 每个会话保留的消息条数（user + assistant 各算一条）
    pub max_history: usize,
}

impl Default for ResponderSection {
    fn default() -> Self {
        Self {
            cooldown_secs: 5,
            max_history: MAX_HISTORY_LENGTH,
        }
    }
}

impl ResponderSection {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// [session] 段：桥接地址、凭据目录、重连策略
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub bridge_url: String,
    pub auth_dir: PathBuf,
    pub reconnect_delay_secs: u64,
    /// 未设置表示无限重连
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            bridge_url: "ws://127.0.0.1:8787".to_string(),
            auth_dir: PathBuf::from("auth_info"),
            reconnect_delay_secs: 5,
            max_reconnect_attempts: None,
        }
    }
}

impl SessionSection {
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(
            Duration::from_secs(self.reconnect_delay_secs),
            self.max_reconnect_attempts,
        )
    }
}

/// 保活端点的默认端口
pub const DEFAULT_PORT: u16 = 3000;

/// [server] 段：保活端点
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// 未设置时依次回落到 `PORT` 环境变量与 3000
    pub port: Option<u16>,
}

impl ServerSection {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// 从 config 目录加载配置，环境变量 AUTOREPLY__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 叠加环境变量 AUTOREPLY__*（双下划线表示嵌套键）
/// 4. 回落到 GEMINI_API_KEY / PORT
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, ResponderError> {
    let mut builder = config::Config::builder();

    for name in ["config/default", "../config/default"] {
        if std::path::Path::new(&format!("{name}.toml")).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(path) = config_path.filter(|p| p.exists()) {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("AUTOREPLY")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let mut cfg: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_fallbacks(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

/// 未显式配置时读取平台约定的环境变量
pub fn apply_env_fallbacks(
    cfg: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), config::ConfigError> {
    if cfg.llm.api_key.as_deref().map_or(true, str::is_empty) {
        cfg.llm.api_key = lookup("GEMINI_API_KEY").filter(|k| !k.is_empty());
    }
    if cfg.server.port.is_none() {
        if let Some(port) = lookup("PORT") {
            let parsed = port
                .trim()
                .parse()
                .map_err(|_| config::ConfigError::Message(format!("invalid PORT: {port}")))?;
            cfg.server.port = Some(parsed);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.llm.model, "gemini-2.5-flash");
        assert_eq!(cfg.responder.cooldown(), Duration::from_secs(5));
        assert_eq!(cfg.responder.max_history, 10);
        assert_eq!(cfg.server.port(), 3000);
        assert_eq!(cfg.session.auth_dir, PathBuf::from("auth_info"));
        let policy = cfg.session.reconnect_policy();
        assert_eq!(policy.delay, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, None);
    }

    #[test]
    fn test_env_fallbacks() {
        let mut cfg = AppConfig::default();
        apply_env_fallbacks(&mut cfg, |key| match key {
            "GEMINI_API_KEY" => Some("secret".to_string()),
            "PORT" => Some("8080".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.llm.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.server.port(), 8080);
    }

    #[test]
    fn test_explicit_key_wins_over_fallback() {
        let mut cfg = AppConfig::default();
        cfg.llm.api_key = Some("from-toml".to_string());
        apply_env_fallbacks(&mut cfg, |key| {
            (key == "GEMINI_API_KEY").then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(cfg.llm.api_key.as_deref(), Some("from-toml"));
    }

    #[test]
    fn test_explicit_port_wins_over_platform_port() {
        let mut cfg = AppConfig::default();
        cfg.server.port = Some(4000);
        apply_env_fallbacks(&mut cfg, |key| (key == "PORT").then(|| "8080".to_string())).unwrap();
        assert_eq!(cfg.server.port(), 4000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut cfg = AppConfig::default();
        let err = apply_env_fallbacks(&mut cfg, |key| (key == "PORT").then(|| "abc".to_string()));
        assert!(err.is_err());
    }

    #[test]
    fn test_toml_sections() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [session]
                bridge_url = "ws://bridge:9000"
                max_reconnect_attempts = 3

                [responder]
                cooldown_secs = 10
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.session.bridge_url, "ws://bridge:9000");
        assert_eq!(cfg.session.max_reconnect_attempts, Some(3));
        assert_eq!(cfg.session.reconnect_delay_secs, 5);
        assert_eq!(cfg.responder.cooldown_secs, 10);
        assert_eq!(cfg.responder.max_history, 10);
    }
}
