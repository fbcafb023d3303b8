use serde::Serialize;

/// Запрос на отправку письма по шаблону.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: &'a serde_json::Value,

    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<&'a str>,
}
