use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::icon_resolver::IconLookup;
use crate::data::normalize_name;
use crate::errors::{ProphetError, Result};
use crate::models::{OverviewKind, OverviewType};

pub const DEFAULT_BASE_URL: &str = "https://poe.ninja/api/data";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Default, Deserialize)]
pub struct OverviewResponse {
    #[serde(default)]
    pub lines: Vec<OverviewLine>,
    #[serde(default, rename = "currencyDetails")]
    pub currency_details: Vec<CurrencyDetail>,
}

#[derive(Debug, Deserialize)]
pub struct OverviewLine {
    pub name: Option<String>,
    #[serde(rename = "currencyTypeName")]
    pub currency_type_name: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CurrencyDetail {
    pub name: Option<String>,
    pub icon: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl OverviewResponse {
    /// (normalized key, icon url) pairs in payload order.
    pub fn icons(&self, kind: OverviewKind) -> Vec<(String, String)> {
        let mut icons = Vec::new();

        if kind == OverviewKind::Currency {
            for detail in &self.currency_details {
                if let (Some(name), Some(icon)) = (non_empty(&detail.name), non_empty(&detail.icon)) {
                    icons.push((normalize_name(name), icon.to_string()));
                }
            }
        }

        for line in &self.lines {
            let name = match kind {
                OverviewKind::Currency => non_empty(&line.currency_type_name).or(non_empty(&line.name)),
                OverviewKind::Item => non_empty(&line.name).or(non_empty(&line.currency_type_name)),
            };
            if let (Some(name), Some(icon)) = (name, non_empty(&line.icon)) {
                icons.push((normalize_name(name), icon.to_string()));
            }
        }

        icons
    }
}

/// Client for the poe.ninja overview listings, used only for item icons.
pub struct NinjaApiClient {
    client: Client,
    base_url: String,
    league: String,
    max_jitter_ms: u64,
}

impl NinjaApiClient {
    pub fn new(base_url: &str, league: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            league: league.to_string(),
            max_jitter_ms: 250,
        })
    }

    /// GET request for one overview listing; league and type go through the
    /// query encoder.
    pub fn overview_request(&self, kind: OverviewKind, item_type: OverviewType) -> Result<Request> {
        let request = self.client
            .get(format!("{}/{}", self.base_url, kind.endpoint()))
            .query(&[("league", self.league.as_str()), ("type", item_type.as_str())])
            .header("Accept", "application/json")
            .build()?;
        Ok(request)
    }

    pub async fn fetch_overview(&self, kind: OverviewKind, item_type: OverviewType) -> Result<OverviewResponse> {
        // Up to 250ms of random jitter before each request
        if self.max_jitter_ms > 0 {
            let delay = Duration::from_millis(rand::random::<u64>() % self.max_jitter_ms);
            tokio::time::sleep(delay).await;
        }

        let request = self.overview_request(kind, item_type)?;
        let url = request.url().clone();
        debug!(%url, "requesting overview");

        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProphetError::ApiError(format!("{} returned {}", url, status)));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ProphetError::ApiError(format!("{} returned an empty body", url)));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IconLookup for NinjaApiClient {
    /// Tries the currency listing first, then the item listing. The first one
    /// that yields any icon wins; the two are never merged.
    async fn lookup(&self, item_type: OverviewType) -> Result<HashMap<String, String>> {
        for kind in OverviewKind::LOOKUP_ORDER {
            match self.fetch_overview(kind, item_type).await {
                Ok(overview) => {
                    let icons: HashMap<String, String> = overview.icons(kind).into_iter().collect();
                    if !icons.is_empty() {
                        info!(
                            item_type = %item_type,
                            endpoint = kind.endpoint(),
                            count = icons.len(),
                            "fetched icons"
                        );
                        return Ok(icons);
                    }
                }
                Err(e) => warn!(item_type = %item_type, endpoint = kind.endpoint(), error = %e, "icon lookup failed"),
            }
        }
        Ok(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const CURRENCY_PAYLOAD: &str = r#"{
        "lines": [
            { "currencyTypeName": "Divine Orb", "chaosEquivalent": 150.0 },
            { "currencyTypeName": "Exalted Orb", "icon": "https://web.poecdn.com/exalt.png" }
        ],
        "currencyDetails": [
            { "id": 1, "name": "Divine Orb", "icon": "https://web.poecdn.com/divine.png" },
            { "id": 2, "name": "Mirror Shard" }
        ]
    }"#;

    const ITEM_PAYLOAD: &str = r#"{
        "lines": [
            { "name": "Headhunter", "icon": "https://web.poecdn.com/hh.png", "chaosValue": 9000 },
            { "name": "", "currencyTypeName": "Odd Fragment", "icon": "https://web.poecdn.com/odd.png" }
        ]
    }"#;

    #[test]
    fn test_currency_overview_icons() {
        let response: OverviewResponse = serde_json::from_str(CURRENCY_PAYLOAD).unwrap();
        let icons = response.icons(OverviewKind::Currency);

        assert_eq!(
            icons,
            vec![
                ("divineorb".to_string(), "https://web.poecdn.com/divine.png".to_string()),
                ("exaltedorb".to_string(), "https://web.poecdn.com/exalt.png".to_string()),
            ]
        );
    }

    #[test]
    fn test_item_overview_falls_back_to_currency_type_name() {
        let response: OverviewResponse = serde_json::from_str(ITEM_PAYLOAD).unwrap();
        let icons = response.icons(OverviewKind::Item);

        assert_eq!(icons.len(), 2);
        assert_eq!(icons[0].0, "headhunter");
        assert_eq!(icons[1].0, "oddfragment");
    }

    #[test]
    fn test_missing_sections_parse_as_empty() {
        let response: OverviewResponse = serde_json::from_str("{}").unwrap();
        assert!(response.icons(OverviewKind::Currency).is_empty());
    }

    #[test]
    fn test_overview_request_encodes_query() {
        let client = NinjaApiClient::new("https://poe.ninja/api/data/", "Heist & Co #2", Duration::from_secs(5)).unwrap();
        let request = client.overview_request(OverviewKind::Item, OverviewType::UniqueJewel).unwrap();
        let url = request.url();

        assert_eq!(url.path(), "/api/data/itemoverview");
        assert_eq!(url.fragment(), None);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("league".to_string(), "Heist & Co #2".to_string()),
                ("type".to_string(), "UniqueJewel".to_string()),
            ]
        );
    }

    type Requests = Arc<Mutex<Vec<String>>>;

    /// Serves each endpoint with a fixed (status, body) and records request targets.
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> (String, Requests) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let endpoint = target.trim_start_matches('/').split('?').next().unwrap_or("").to_string();
                log.lock().unwrap().push(target);

                let (status, body) = routes
                    .iter()
                    .find(|(path, _, _)| *path == endpoint)
                    .map(|(_, status, body)| (*status, *body))
                    .unwrap_or((404, ""));
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), requests)
    }

    fn stub_client(base_url: &str) -> NinjaApiClient {
        let mut client = NinjaApiClient::new(base_url, "Settlers & Co", Duration::from_secs(5)).unwrap();
        client.max_jitter_ms = 0;
        client
    }

    fn endpoints(requests: &Requests) -> Vec<String> {
        requests
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.trim_start_matches('/').split('?').next().unwrap_or("").to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_lookup_falls_through_to_item_overview_on_error() {
        let (base_url, requests) = serve(vec![
            ("currencyoverview", 500, ""),
            ("itemoverview", 200, ITEM_PAYLOAD),
        ])
        .await;

        let icons = stub_client(&base_url).lookup(OverviewType::UniqueJewel).await.unwrap();

        assert_eq!(icons.len(), 2);
        assert_eq!(icons["headhunter"], "https://web.poecdn.com/hh.png");
        assert_eq!(endpoints(&requests), vec!["currencyoverview", "itemoverview"]);
        assert!(requests.lock().unwrap()[0].contains("league=Settlers+%26+Co"));
    }

    #[tokio::test]
    async fn test_lookup_stops_at_first_listing_with_icons() {
        let (base_url, requests) = serve(vec![
            ("currencyoverview", 200, CURRENCY_PAYLOAD),
            ("itemoverview", 200, ITEM_PAYLOAD),
        ])
        .await;

        let icons = stub_client(&base_url).lookup(OverviewType::Currency).await.unwrap();

        let mut keys: Vec<&str> = icons.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["divineorb", "exaltedorb"]);
        assert_eq!(endpoints(&requests), vec!["currencyoverview"]);
    }

    #[tokio::test]
    async fn test_lookup_with_no_icons_anywhere_is_empty() {
        let (base_url, requests) = serve(vec![("currencyoverview", 200, "{}")]).await;

        let icons = stub_client(&base_url).lookup(OverviewType::Scarab).await.unwrap();

        assert!(icons.is_empty());
        assert_eq!(endpoints(&requests), vec!["currencyoverview", "itemoverview"]);
    }
}
