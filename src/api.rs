mod client;
mod models;

pub use client::EmailClient;

/// Отправка письма по шаблону через сервис рассылки.
///
/// Клиент создаётся один раз на весь процесс и передаётся по ссылке, в тестах
/// его подменяет фейк.
pub trait Mailer {
    /// Отправляет письмо по шаблону `template_id` с указанными параметрами.
    fn send(&self, template_id: &str, params: &serde_json::Value) -> anyhow::Result<()>;
}
