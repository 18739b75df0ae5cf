use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use super::response::{first_candidate, sets_from_value, SetSummary};
use super::Catalog;
use crate::card::{CatalogCandidate, Language};
use crate::config::CatalogConfig;
use crate::log;

/// Blocking client for the TCGdex REST API.
///
/// Every request carries the configured timeout; a timed-out request is
/// just another failed lookup.
pub struct TcgdexClient {
    http: Client,
    base_url: String,
    set_list_timeout: Duration,
}

impl TcgdexClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            set_list_timeout: Duration::from_secs(config.set_list_timeout_secs),
        })
    }

    fn cards_url(&self, lang: Language) -> String {
        format!("{}/{}/cards", self.base_url, lang.code())
    }

    fn card_url(&self, lang: Language, card_id: &str) -> String {
        format!("{}/{}/cards/{}", self.base_url, lang.code(), card_id)
    }

    fn sets_url(&self) -> String {
        format!("{}/{}/sets", self.base_url, Language::En.code())
    }

    fn read_json(response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {}", status));
        }
        let body = response.text().context("Failed to read response body")?;
        serde_json::from_str(&body).context("Response is not valid JSON")
    }

    fn search(&self, lang: Language, params: &[(&str, &str)]) -> Result<Option<CatalogCandidate>> {
        let response = self.http.get(self.cards_url(lang)).query(params).send()?;
        let data = Self::read_json(response)?;
        Ok(first_candidate(&data))
    }

    fn fetch_by_id(&self, card_id: &str, lang: Language) -> Result<Option<CatalogCandidate>> {
        let response = self.http.get(self.card_url(lang, card_id)).send()?;
        let data = Self::read_json(response)?;
        if !data.is_object() {
            return Ok(None);
        }
        Ok(first_candidate(&data))
    }
}

impl Catalog for TcgdexClient {
    fn query_by_name_number(
        &self,
        name: Option<&str>,
        number: Option<&str>,
        set_hint: Option<&str>,
        lang: Language,
    ) -> Option<CatalogCandidate> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(name) = name {
            params.push(("name", name));
        }
        if let Some(number) = number {
            params.push(("number", number));
        }
        if let Some(set) = set_hint {
            params.push(("set", set));
        }
        if params.is_empty() {
            return None;
        }

        match self.search(lang, &params) {
            Ok(Some(card)) => Some(card),
            Ok(None) => {
                log(&format!("[API] No results for params: {:?}", params));
                None
            }
            Err(e) => {
                log(&format!("[API] Error: {:#} for params: {:?}", e, params));
                None
            }
        }
    }

    fn query_by_id(&self, card_id: &str, lang: Language) -> Option<CatalogCandidate> {
        match self.fetch_by_id(card_id, lang) {
            Ok(card) => card,
            Err(e) => {
                log(&format!("[API ID ERROR] {}: {:#}", card_id, e));
                None
            }
        }
    }

    fn list_sets(&self) -> Result<Vec<SetSummary>> {
        let response = self
            .http
            .get(self.sets_url())
            .timeout(self.set_list_timeout)
            .send()?;
        let data = Self::read_json(response)?;
        Ok(sets_from_value(&data))
    }

    fn fetch_card_in_set(&self, set_id: &str, number: &str) -> Result<Option<CatalogCandidate>> {
        let card_id = format!("{}-{}", set_id, number);
        let response = self.http.get(self.card_url(Language::En, &card_id)).send()?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let data = Self::read_json(response)?;
        Ok(first_candidate(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> TcgdexClient {
        let config = CatalogConfig {
            base_url: base_url.to_string(),
            ..CatalogConfig::default()
        };
        TcgdexClient::new(&config).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client("https://api.tcgdex.net/v2/");
        assert_eq!(client.cards_url(Language::Ja), "https://api.tcgdex.net/v2/ja/cards");
        assert_eq!(
            client.card_url(Language::ZhHans, "ccp-05"),
            "https://api.tcgdex.net/v2/zh-hans/cards/ccp-05"
        );
        assert_eq!(client.sets_url(), "https://api.tcgdex.net/v2/en/sets");
    }

    #[test]
    fn test_empty_search_skips_request() {
        // Unroutable base: any request would fail, but none is made
        let client = client("http://127.0.0.1:9");
        assert_eq!(client.query_by_name_number(None, None, None, Language::En), None);
    }

    #[test]
    fn test_unreachable_catalog_degrades_to_none() {
        let client = client("http://127.0.0.1:9");
        assert_eq!(client.query_by_id("base1-4", Language::En), None);
        assert_eq!(
            client.query_by_name_number(Some("Pikachu"), Some("58/102"), None, Language::En),
            None
        );
        assert!(client.list_sets().is_err());
    }
}
