use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::TvdbError;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    apikey: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pin: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub data: LoginData,
    #[allow(dead_code)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Exchange a static API key for a bearer token.
pub async fn login(
    http: &Client,
    base_url: &str,
    api_key: &str,
    pin: Option<&str>,
) -> Result<String, TvdbError> {
    let resp = http
        .post(format!("{base_url}/login"))
        .json(&LoginRequest { apikey: api_key, pin })
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);
        return Err(TvdbError::Auth(format!("status {status}: {message}")));
    }

    let body: LoginResponse = resp
        .json()
        .await
        .map_err(|e| TvdbError::Parse(e.to_string()))?;

    if body.data.token.is_empty() {
        return Err(TvdbError::Auth("empty token in login response".into()));
    }
    Ok(body.data.token)
}
