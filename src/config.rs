use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

/// Адрес REST-метода отправки письма по шаблону.
pub const DEFAULT_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Идентификатор аккаунта в сервисе рассылки (public key).
    pub user_id: String,

    /// Закрытый ключ аккаунта, если в сервисе включена строгая проверка.
    pub access_token: Option<String>,

    /// Идентификатор почтового сервиса внутри аккаунта.
    pub service_id: String,

    /// Ящик отдела продаж.
    pub sales_email: String,

    /// Шаблон письма для клиента.
    pub customer_template_id: String,

    /// Шаблон письма для отдела продаж.
    pub sales_template_id: String,

    pub api_url: String,

    /// Сколько секунд ждём ответа на каждую отправку.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            access_token: None,
            service_id: String::new(),
            sales_email: String::new(),
            customer_template_id: String::new(),
            sales_template_id: String::new(),
            api_url: DEFAULT_API_URL.to_owned(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Обязательные настройки, которые не заполнены.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("user_id", &self.user_id),
            ("service_id", &self.service_id),
            ("sales_email", &self.sales_email),
            ("customer_template_id", &self.customer_template_id),
            ("sales_template_id", &self.sales_template_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}

/// Загружает конфигурацию. Если файла нет, он будет создан со значениями
/// по-умолчанию.
pub fn load(path: PathBuf) -> anyhow::Result<Config> {
    let cfg: Config = confy::load_path(path)?;

    // Пустые значения не запрещаем, но запрос с ними сервис скорее всего
    // отклонит.
    for name in cfg.missing() {
        warn!("Setting \"{}\" is empty", name);
    }

    Ok(cfg)
}
