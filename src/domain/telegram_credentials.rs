use secrecy::{ExposeSecret, SecretString};

#[derive(Debug, Clone)]
pub struct BotToken(SecretString);

impl BotToken {
    pub fn parse(token: SecretString) -> Result<Self, String> {
        if token.expose_secret().is_empty() {
            return Err("bot token is empty".into());
        }
        Ok(Self(token))
    }
}

impl ExposeSecret<str> for BotToken {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

#[derive(Debug, Clone)]
pub struct ChatId(String);

impl ChatId {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.is_empty() {
            return Err("chat id is empty".into());
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for ChatId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Bot credentials; both halves must be present before the server starts.
#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub bot_token: BotToken,
    pub chat_id: ChatId,
}

impl TelegramCredentials {
    pub fn parse(bot_token: Option<SecretString>, chat_id: Option<String>) -> Result<Self, String> {
        let required =
            || "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID environment variables are required";

        let bot_token = bot_token
            .ok_or_else(required)
            .and_then(|t| BotToken::parse(t).map_err(|_| required()))?;
        let chat_id = chat_id
            .ok_or_else(required)
            .and_then(|c| ChatId::parse(c).map_err(|_| required()))?;

        Ok(Self { bot_token, chat_id })
    }
}
