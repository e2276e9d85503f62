//! One-request orchestration: run every detector over its slice of the
//! request, join the network-bound ones concurrently, aggregate.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::config::AppConfig;
use crate::core::corpus::Corpus;
use crate::core::error::SentryError;
use crate::core::hash::request_fingerprint;
use crate::core::time::now_utc;
use crate::core::types::{
    AnalysisRequest, AnalysisResult, CTLogEntry, CertificateInfo, ContextInsight, WhoisRecord,
};
use crate::detectors::{ct, domain, domain_age, page, ssl, typosquat};
use crate::pipeline::aggregator;
use crate::sources::context::ContextAnalyzer;
use crate::sources::{ctlog, rdap, tls};

pub struct Engine {
    client: reqwest::Client,
    pub config: AppConfig,
    corpus: Arc<Corpus>,
    context: Option<ContextAnalyzer>,
}

impl Engine {
    pub fn new(config: AppConfig) -> Result<Self, SentryError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(4))
            .build()
            .map_err(SentryError::from)?;
        let corpus = Arc::new(Corpus::from_config(&config));
        let context = ContextAnalyzer::from_env(&config, client.clone());
        Ok(Self {
            client,
            config,
            corpus,
            context,
        })
    }

    /// Score one collector capture. Total: every detector failure
    /// degrades to its documented default, and only a malformed request
    /// (no hostname) yields the error verdict.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let now = now_utc();
        let hostname = request.hostname.trim().to_ascii_lowercase();
        if hostname.is_empty() {
            return aggregator::rejection("missing hostname; analysis refused", now);
        }
        tracing::debug!(
            fingerprint = %request_fingerprint(request),
            hostname = %hostname,
            "analysis started"
        );

        let registrable = self.corpus.registrable_domain(&hostname);
        let (whois, cert, ct_entries, insight) = tokio::join!(
            self.fetch_whois(&registrable),
            self.fetch_certificate(&hostname),
            self.fetch_ct_history(&hostname),
            self.fetch_context(request),
        );

        let factors = vec![
            typosquat::detect(&hostname, &self.corpus),
            domain_age::classify(&whois, now),
            ssl::evaluate(cert.as_ref(), &self.corpus, now),
            ct::analyze(&ct_entries, self.config.ct_window_days, now),
            domain::inspect(&hostname, &self.corpus),
            page::score_forms(&request.forms),
            page::score_dom(&request.suspicious_patterns, &request.external_links),
        ];

        let result = aggregator::aggregate(factors, insight.as_ref(), now);
        tracing::info!(
            hostname = %hostname,
            verdict = ?result.verdict,
            score = result.score,
            "analysis complete"
        );
        result
    }

    async fn fetch_whois(&self, domain: &str) -> WhoisRecord {
        match rdap::lookup(&self.client, &self.config.rdap_base_url, domain).await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("rdap lookup failed for {domain}: {err}");
                WhoisRecord::default()
            }
        }
    }

    async fn fetch_certificate(&self, hostname: &str) -> Option<CertificateInfo> {
        let connect_budget = Duration::from_millis(self.config.tcp_connect_timeout_ms);
        let handshake_budget = Duration::from_millis(self.config.tls_handshake_timeout_ms);
        match tls::connect(hostname, connect_budget, handshake_budget).await {
            Ok(cert) => Some(cert),
            Err(err) => {
                tracing::warn!("tls handshake failed for {hostname}: {err}");
                None
            }
        }
    }

    async fn fetch_ct_history(&self, hostname: &str) -> Vec<CTLogEntry> {
        match ctlog::query(&self.client, &self.config.crtsh_base_url, hostname).await {
            Ok(entries) => entries,
            Err(err) => {
                // scores the same as a certificate-less domain; only the
                // log line tells the two cases apart
                tracing::warn!("ct log query failed for {hostname}: {err}");
                Vec::new()
            }
        }
    }

    async fn fetch_context(&self, request: &AnalysisRequest) -> Option<ContextInsight> {
        let analyzer = self.context.as_ref()?;
        let budget = Duration::from_millis(self.config.context_timeout_ms);
        match timeout(budget, analyzer.analyze(request)).await {
            Ok(Ok(insight)) => Some(insight),
            Ok(Err(err)) => {
                tracing::debug!("context analyzer unavailable: {err}");
                None
            }
            Err(_) => {
                tracing::debug!("context analyzer timed out");
                None
            }
        }
    }
}
