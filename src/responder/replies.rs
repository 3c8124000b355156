//! 固定回复文本与生成式前言
//!
//! 面向西语用户的预置文案；`ReplyCatalog` 汇总后交给分发器使用，测试可替换。

/// 生成式回复的人设前言
pub const PERSONALITY_PROMPT: &str = "Tu nombre es Bot de respuesta personalizado. Eres un amigo relajado, casual y servicial. Responde siempre en español, con tono natural, usando emojis sin abusar. No menciones que eres IA ni bot.";

/// 事实类提问的风格后缀
pub const PRECISE_SUFFIX: &str = " Responde con precisión.";

/// 闲聊的风格后缀
pub const CASUAL_SUFFIX: &str = " Responde breve, casual y natural.";

/// 追加在每条生成式回复末尾的联系方式
pub const CONTACT_SUFFIX: &str = "\n\n⚡⭐✨ Si necesitas algo más, contáctame también en @Cm24HrdZ o escribe a Axeltech24@protonmail.com";

/// 生成式后端失败时发给用户的文案
pub const ERROR_REPLY: &str = "Hubo un error, intenta de nuevo.";

pub const IDENTITY_REPLY: &str = "Soy un Agente Personalizado de Respuesta Automática. Si quieres comunicarte conmigo, envíame mensaje en Telegram a @Cm24HrdZ⚡⭐✨\n, ¿En qué te puedo ayudar este medio? 🤲";

pub const GREETING_REPLY: &str = "Hola, soy un Agente Personalizado de Respuesta Automática. Si quieres comunicararte conmigo, puedes escribirme en Telegram a @Cm24HrdZ⚡⭐✨\n , Cuéntame ¿en qué te puedo ayudar por este medio? 🤲";

pub const HOW_ARE_YOU_REPLY: &str = "Yo de lujo, como agente personalizado de respuesta automática siempre hay mucho que hacer 😎✨, ¿Y tú qué tal, qué cuentas? 🤭";

pub const NO_IMAGE_REPLY: &str = "Lo siento, no puedo crear imágenes. Soy un Agente Personalizado de Respuesta Automática. Si quieres contactarme, puedes escribirme a @Cm24HrdZ en Telegram ⚡⭐✨";

pub const IDENTITY_PHRASES: &[&str] = &[
    "quien eres", "quién eres", "que eres", "qué eres", "eres un bot", "eres bot",
    "como te llamas", "cómo te llamas", "quien es", "quién es",
];

pub const GREETING_PHRASES: &[&str] = &[
    "hola", "buenas", "que onda", "qué onda", "oye", "ola", "amigo", "bro",
    "buen día", "buenas tardes", "buenas noches",
];

pub const HOW_ARE_YOU_PHRASES: &[&str] = &[
    "como estas", "cómo estás", "como estas?", "cómo estás?",
    "que haces", "qué haces", "que haces?", "qué haces?",
];

pub const IMAGE_PHRASES: &[&str] = &[
    "crea una imagen", "haz una imagen", "genera una imagen",
    "puedes hacer una imagen", "crear imagen", "imagen por favor",
];

/// 回复文案集合
#[derive(Debug, Clone)]
pub struct ReplyCatalog {
    pub identity: String,
    pub greeting: String,
    pub how_are_you: String,
    pub no_image: String,
    pub error: String,
    pub persona: String,
    pub precise_suffix: String,
    pub casual_suffix: String,
    pub contact_suffix: String,
}

impl Default for ReplyCatalog {
    fn default() -> Self {
        Self {
            identity: IDENTITY_REPLY.to_string(),
            greeting: GREETING_REPLY.to_string(),
            how_are_you: HOW_ARE_YOU_REPLY.to_string(),
            no_image: NO_IMAGE_REPLY.to_string(),
            error: ERROR_REPLY.to_string(),
            persona: PERSONALITY_PROMPT.to_string(),
            precise_suffix: PRECISE_SUFFIX.to_string(),
            casual_suffix: CASUAL_SUFFIX.to_string(),
            contact_suffix: CONTACT_SUFFIX.to_string(),
        }
    }
}
