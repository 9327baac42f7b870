mod telegram;

pub use telegram::TelegramNotifier;
