//! 意图分类
//!
//! 去掉开头的 `@数字` 提及并 trim，然后归一化（小写、NFD 分解、去掉组合附加符号），
//! 按固定优先级依次匹配规则集：身份（包含）→ 问候（前缀）→ 近况（包含）→ 图片请求（包含），
//! 都不命中则交给生成式后端，并根据原文中的疑问词（带重音的 qué / cómo 等）决定回复风格。

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::replies::{GREETING_PHRASES, HOW_ARE_YOU_PHRASES, IDENTITY_PHRASES, IMAGE_PHRASES};

/// 生成式回复的风格提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStyle {
    /// 事实类提问：要求准确
    Precise,
    /// 闲聊：简短随意
    Casual,
}

/// 分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Identity,
    Greeting,
    HowAreYou,
    ImageRequest,
    Generative { style: ResponseStyle },
}

/// 规则匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Contains,
    StartsWith,
}

/// 一组触发短语（构造时已归一化）
#[derive(Debug, Clone)]
pub struct IntentRule {
    intent: Intent,
    mode: MatchMode,
    phrases: Vec<String>,
}

impl IntentRule {
    pub fn new(intent: Intent, mode: MatchMode, phrases: &[&str]) -> Self {
        let mut normalized: Vec<String> = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let p = normalize(phrase);
            if !p.is_empty() && !normalized.contains(&p) {
                normalized.push(p);
            }
        }
        Self {
            intent,
            mode,
            phrases: normalized,
        }
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    fn matches(&self, normalized: &str) -> bool {
        self.phrases.iter().any(|p| match self.mode {
            MatchMode::Contains => normalized.contains(p.as_str()),
            MatchMode::StartsWith => normalized.starts_with(p.as_str()),
        })
    }
}

/// 一条入站文本的分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// 去掉提及并 trim 后的原文（作为生成式请求中的 user 消息）
    pub text: String,
    /// 归一化文本（用于匹配）
    pub normalized: String,
    pub intent: Intent,
}

/// 规则分类器：规则按优先级排列，首个命中者胜出
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::with_rules(vec![
            IntentRule::new(Intent::Identity, MatchMode::Contains, IDENTITY_PHRASES),
            IntentRule::new(Intent::Greeting, MatchMode::StartsWith, GREETING_PHRASES),
            IntentRule::new(Intent::HowAreYou, MatchMode::Contains, HOW_ARE_YOU_PHRASES),
            IntentRule::new(Intent::ImageRequest, MatchMode::Contains, IMAGE_PHRASES),
        ])
    }

    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// 空文本（去掉提及后）返回 None：不回复、不改状态
    pub fn classify(&self, raw: &str) -> Option<Classification> {
        let text = strip_mention(raw);
        if text.is_empty() {
            return None;
        }
        let normalized = normalize(&text);
        if normalized.is_empty() {
            return None;
        }

        let intent = self
            .rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(IntentRule::intent)
            .unwrap_or(Intent::Generative {
                style: response_style(&text),
            });

        Some(Classification {
            text,
            normalized,
            intent,
        })
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

static MENTION_RE: OnceLock<Regex> = OnceLock::new();
static FACTUAL_RE: OnceLock<Regex> = OnceLock::new();

/// 去掉开头的 `@5215512345678 ` 形式提及
pub fn strip_mention(raw: &str) -> String {
    let re = MENTION_RE.get_or_init(|| Regex::new(r"^@\d+\s*").unwrap());
    re.replace(raw.trim_start(), "").trim().to_string()
}

/// 小写 + NFD 分解 + 去掉 U+0300..U+036F 组合附加符号
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// 含疑问词（qué / cuál / quién / dónde / cuántos / cuántas / cómo）时要求准确回答
///
/// 在未归一化的原文上匹配：不带重音的连词 que、副词 como 不算疑问词（cual 例外）。
pub fn response_style(text: &str) -> ResponseStyle {
    let re = FACTUAL_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(qué|cual|cuál|quién|dónde|cuántos|cuántas|cómo)\b").unwrap()
    });
    if re.is_match(text) {
        ResponseStyle::Precise
    } else {
        ResponseStyle::Casual
    }
}
