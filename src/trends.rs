use crate::config::TwitterCredentials;
use crate::models::{BearerTokenResponse, PlaceTrends};
use reqwest::Client;
use std::time::Duration;

const WORLDWIDE_WOEID: u32 = 1;
const TREND_KEYWORDS: &[&str] = &["crypto", "bitcoin"];

pub struct TrendClient {
    client: Client,
    credentials: TwitterCredentials,
    base_url: String,
    timeout: Duration,
}

impl TrendClient {
    pub fn new(credentials: TwitterCredentials, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Worldwide trends mentioning crypto or bitcoin. Empty on any failure.
    pub async fn fetch_crypto_trends(&self) -> Vec<String> {
        match self.fetch_place_trends(WORLDWIDE_WOEID).await {
            Ok(names) => filter_crypto_trends(names),
            Err(e) => {
                tracing::error!("Error fetching crypto trends: {}", e);
                Vec::new()
            }
        }
    }

    async fn bearer_token(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!("{}/oauth2/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret_key))
            .form(&[("grant_type", "client_credentials")])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(format!("Twitter token request failed: {}", response.status()).into());
        }

        let body: BearerTokenResponse = response.json().await?;
        Ok(body.access_token)
    }

    async fn fetch_place_trends(
        &self,
        woeid: u32,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let token = self.bearer_token().await?;
        let url = format!("{}/1.1/trends/place.json?id={}", self.base_url, woeid);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(format!("Twitter trends request failed: {}", response.status()).into());
        }

        let places: Vec<PlaceTrends> = response.json().await?;
        let place = places.into_iter().next().ok_or("Twitter returned no trend locations")?;
        Ok(place.trends.into_iter().map(|t| t.name).collect())
    }
}

pub fn filter_crypto_trends(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            TREND_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{closed_port_url, serve};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    fn credentials() -> TwitterCredentials {
        TwitterCredentials {
            api_key: "key".to_string(),
            api_secret_key: "secret".to_string(),
            access_token: "at".to_string(),
            access_token_secret: "ats".to_string(),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let names = vec![
            "#Bitcoin".to_string(),
            "CryptoNews".to_string(),
            "World Cup".to_string(),
            "#BTC".to_string(),
        ];
        assert_eq!(filter_crypto_trends(names), vec!["#Bitcoin", "CryptoNews"]);
    }

    #[tokio::test]
    async fn test_fetches_and_filters_worldwide_trends() {
        let app = Router::new()
            .route(
                "/oauth2/token",
                post(|| async { Json(json!({ "token_type": "bearer", "access_token": "tok" })) }),
            )
            .route(
                "/1.1/trends/place.json",
                get(|headers: HeaderMap| async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer tok");
                    if !authorized {
                        return Err(StatusCode::UNAUTHORIZED);
                    }
                    Ok(Json(json!([{
                        "trends": [
                            { "name": "#Bitcoin" },
                            { "name": "Taylor Swift" },
                            { "name": "crypto winter" }
                        ]
                    }])))
                }),
            );
        let base = serve(app).await;

        let trends = TrendClient::new(credentials(), &base).fetch_crypto_trends().await;
        assert_eq!(trends, vec!["#Bitcoin", "crypto winter"]);
    }

    #[tokio::test]
    async fn test_failures_yield_empty_list() {
        let app = Router::new().route(
            "/oauth2/token",
            post(|| async { StatusCode::FORBIDDEN }),
        );
        let base = serve(app).await;
        assert!(TrendClient::new(credentials(), &base)
            .fetch_crypto_trends()
            .await
            .is_empty());

        let base = closed_port_url().await;
        assert!(TrendClient::new(credentials(), &base)
            .fetch_crypto_trends()
            .await
            .is_empty());
    }
}
