#[derive(Debug, Clone)]
pub struct NotifyMessage(String);

impl NotifyMessage {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.is_empty() {
            return Err("Message cannot be empty".into());
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for NotifyMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NotifyMessage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NotifyMessage::parse(value)
    }
}
