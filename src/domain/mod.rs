mod new_subscription;
mod notify_message;
mod subscriber_email;
mod telegram_credentials;

pub use new_subscription::{Attribution, NewSubscription};
pub use notify_message::NotifyMessage;
pub use subscriber_email::SubscriberEmail;
pub use telegram_credentials::{BotToken, ChatId, TelegramCredentials};
