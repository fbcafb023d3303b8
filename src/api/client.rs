use std::time::Duration;

use log::debug;
use reqwest::StatusCode;

use super::{models::SendRequest, Mailer};
use crate::config::Config;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Клиент сервиса рассылки писем по шаблонам.
pub struct EmailClient {
    client: reqwest::blocking::Client,
    url: String,
    service_id: String,
    user_id: String,
    access_token: Option<String>,
}

impl EmailClient {
    /// Создаёт клиента по настройкам из конфига.
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(cfg.timeout_secs);

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            url: cfg.api_url.clone(),
            service_id: cfg.service_id.clone(),
            user_id: cfg.user_id.clone(),
            access_token: cfg.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn request<'a>(
        &'a self,
        template_id: &'a str,
        params: &'a serde_json::Value,
    ) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.service_id,
            template_id,
            user_id: &self.user_id,
            template_params: params,
            access_token: self.access_token.as_deref(),
        }
    }
}

impl Mailer for EmailClient {
    fn send(&self, template_id: &str, params: &serde_json::Value) -> anyhow::Result<()> {
        let payload = self.request(template_id, params);

        // Параметры содержат PDF целиком, в лог его не пишем.
        debug!("Запрос в АПИ: POST {} с шаблоном {}", self.url, template_id);
        let resp = self.client.post(&self.url).json(&payload).send()?;

        let status = resp.status();
        let body = resp.text()?;

        if status != StatusCode::OK {
            return Err(anyhow::anyhow!("got {}: {}", status, body));
        }

        debug!("Тело ответа на {}: {}", self.url, body);

        Ok(())
    }
}
