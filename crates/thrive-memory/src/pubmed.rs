use crate::retrieval::ContextSource;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use thrive_core::{ThriveError, ThriveResult};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
/// Live calls get a short, fixed budget; a slow search is treated like a
/// failed one and the fallback chain takes over.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "thrive-coach/0.3";
const MAX_ABSTRACT_CHARS: usize = 800;

/// Live research search over NCBI E-utilities with layered fallback.
///
/// `search` tries the live service first (esearch for PMIDs, efetch for
/// titles and abstracts). On empty results, a non-2xx response, a parse
/// failure, or a transport error it falls back to the static retrieval
/// collaborator. Only when both layers come up empty does it return an
/// empty string; it never raises.
pub struct PubMedSearch {
    http: reqwest::Client,
    base_url: String,
    fallback: Arc<dyn ContextSource>,
}

impl PubMedSearch {
    /// Create a search client with the given static fallback.
    pub fn new(fallback: Arc<dyn ContextSource>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            fallback,
        }
    }

    /// Override the E-utilities base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search for research abstracts. Live first, static fallback second,
    /// empty string when both layers have nothing.
    pub async fn search(&self, query: &str, max_results: usize) -> String {
        match self.live_search(query, max_results).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                debug!(query, "Live search returned no results, using static index");
                self.fallback.get_context(query).await
            }
            Err(e) => {
                warn!(query, error = %e, "Live search failed, using static index");
                self.fallback.get_context(query).await
            }
        }
    }

    async fn live_search(&self, query: &str, max_results: usize) -> ThriveResult<String> {
        let pmids = self.esearch(query, max_results).await?;
        if pmids.is_empty() {
            return Ok(String::new());
        }
        self.efetch(&pmids).await
    }

    /// esearch: resolve a free-text term to PMIDs.
    async fn esearch(&self, query: &str, max_results: usize) -> ThriveResult<Vec<String>> {
        let url = format!("{}/esearch.fcgi", self.base_url);
        let body = self
            .get_xml(
                &url,
                &[
                    ("db", "pubmed"),
                    ("term", query),
                    ("retmax", &max_results.to_string()),
                    ("sort", "relevance"),
                    ("retmode", "xml"),
                ],
            )
            .await?;

        let id_re =
            Regex::new(r"<Id>(\d+)</Id>").map_err(|e| ThriveError::Memory(e.to_string()))?;
        Ok(id_re
            .captures_iter(&body)
            .map(|c| c[1].to_string())
            .collect())
    }

    /// efetch: pull title + abstract for each PMID.
    async fn efetch(&self, pmids: &[String]) -> ThriveResult<String> {
        let url = format!("{}/efetch.fcgi", self.base_url);
        let ids = pmids.join(",");
        let body = self
            .get_xml(&url, &[("db", "pubmed"), ("id", &ids), ("retmode", "xml")])
            .await?;

        let pmid_re =
            Regex::new(r"<PMID[^>]*>(\d+)</PMID>").map_err(|e| ThriveError::Memory(e.to_string()))?;
        let title_re = Regex::new(r"(?s)<ArticleTitle[^>]*>(.*?)</ArticleTitle>")
            .map_err(|e| ThriveError::Memory(e.to_string()))?;
        let abstract_re = Regex::new(r"(?s)<AbstractText[^>]*>(.*?)</AbstractText>")
            .map_err(|e| ThriveError::Memory(e.to_string()))?;

        let mut records = Vec::new();
        for article in body.split("<PubmedArticle").skip(1) {
            let Some(pmid) = pmid_re.captures(article).map(|c| c[1].to_string()) else {
                continue;
            };
            let title = title_re
                .captures(article)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_default();
            let abstract_text = abstract_re
                .captures_iter(article)
                .map(|c| c[1].trim().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            if title.is_empty() && abstract_text.is_empty() {
                continue;
            }
            let abstract_text: String = abstract_text.chars().take(MAX_ABSTRACT_CHARS).collect();
            records.push(format!("PMID {pmid}: {title}\n{abstract_text}"));
        }

        Ok(records.join("\n\n"))
    }

    async fn get_xml(&self, url: &str, params: &[(&str, &str)]) -> ThriveResult<String> {
        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| ThriveError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ThriveError::Http(format!("E-utilities error {status}")));
        }

        resp.text().await.map_err(|e| ThriveError::Http(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StaticFallback(&'static str);

    #[async_trait]
    impl ContextSource for StaticFallback {
        async fn get_context(&self, _query: &str) -> String {
            self.0.to_string()
        }
    }

    fn client(server: &MockServer, fallback: &'static str) -> PubMedSearch {
        PubMedSearch::new(Arc::new(StaticFallback(fallback))).with_base_url(server.uri())
    }

    const ESEARCH_XML: &str =
        "<eSearchResult><IdList><Id>11111</Id><Id>22222</Id></IdList></eSearchResult>";
    const EFETCH_XML: &str = r#"<PubmedArticleSet>
<PubmedArticle><MedlineCitation><PMID Version="1">11111</PMID>
<ArticleTitle>Sleep and recovery</ArticleTitle>
<Abstract><AbstractText Label="BACKGROUND">Sleep matters.</AbstractText>
<AbstractText>More sleep, better recovery.</AbstractText></Abstract>
</MedlineCitation></PubmedArticle>
<PubmedArticle><MedlineCitation><PMID Version="1">22222</PMID>
<ArticleTitle>Stress reduction</ArticleTitle>
<Abstract><AbstractText>Breathing exercises help.</AbstractText></Abstract>
</MedlineCitation></PubmedArticle>
</PubmedArticleSet>"#;

    #[tokio::test]
    async fn test_live_search_formats_pmid_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ESEARCH_XML))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/efetch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_XML))
            .mount(&server)
            .await;

        let result = client(&server, "unused").search("sleep", 5).await;
        assert!(result.contains("PMID 11111: Sleep and recovery"));
        assert!(result.contains("PMID 22222: Stress reduction"));
        assert!(result.contains("Sleep matters. More sleep, better recovery."));
    }

    #[tokio::test]
    async fn test_empty_live_results_fall_back_to_static_index() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<eSearchResult><IdList></IdList></eSearchResult>",
            ))
            .mount(&server)
            .await;

        let result = client(&server, "static context").search("anything", 5).await;
        assert_eq!(result, "static context");
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_static_index() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client(&server, "static context").search("anything", 5).await;
        assert_eq!(result, "static context");
    }

    #[tokio::test]
    async fn test_both_layers_empty_yields_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/esearch.fcgi"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client(&server, "").search("anything", 5).await;
        assert_eq!(result, "");
    }
}
