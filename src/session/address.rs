//! 会话地址相关的小工具：入站过滤、本机地址推导、配对二维码链接

use std::sync::OnceLock;

use regex::Regex;

use super::event::InboundMessage;

const GROUP_SUFFIX: &str = "@g.us";
const NEWSLETTER_MARKER: &str = "@newsletter";
const QR_IMAGE_SERVICE: &str = "https://quickchart.io/qr";

static DEVICE_SUFFIX_RE: OnceLock<Regex> = OnceLock::new();

/// 群组与频道地址不进入流水线
pub fn is_broadcast(conversation_id: &str) -> bool {
    conversation_id.ends_with(GROUP_SUFFIX) || conversation_id.contains(NEWSLETTER_MARKER)
}

/// 从入站消息中取出 (会话 ID, 文本)；自己发的、群组/频道、无内容或空文本的消息返回 None
pub fn extract_text(message: &InboundMessage) -> Option<(&str, &str)> {
    if message.key.from_me || is_broadcast(&message.key.remote_jid) {
        return None;
    }
    let text = message.message.as_ref()?.text()?;
    Some((message.key.remote_jid.as_str(), text))
}

/// 本机地址：去掉 `:设备号` 后缀，`521` 开头改写为 `52`，取 `@` 之前的部分
pub fn own_address(user_id: &str) -> String {
    let re = DEVICE_SUFFIX_RE.get_or_init(|| Regex::new(r":[0-9]+").unwrap());
    let cleaned = re.replace(user_id, "");
    let cleaned = match cleaned.strip_prefix("521") {
        Some(rest) => format!("52{rest}"),
        None => cleaned.into_owned(),
    };
    cleaned
        .split('@')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// 配对二维码的图片链接（可在浏览器中打开扫码）
pub fn pairing_url(qr: &str) -> String {
    let size = "250x250";
    match reqwest::Url::parse_with_params(QR_IMAGE_SERVICE, &[("text", qr), ("size", size)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{QR_IMAGE_SERVICE}?size={size}"),
    }
}
