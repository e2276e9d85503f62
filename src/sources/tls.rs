//! Live TLS handshake against the target host.
//!
//! A handshake that verifies against the webpki root store yields one
//! leaf-certificate snapshot; any connection, handshake or parse failure
//! surfaces as an error and the SSL factor scores it as worst-case trust.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::core::error::SentryError;
use crate::core::types::CertificateInfo;

const HTTPS_PORT: u16 = 443;

pub async fn connect(
    hostname: &str,
    connect_timeout: Duration,
    handshake_timeout: Duration,
) -> Result<CertificateInfo, SentryError> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let server_name = ServerName::try_from(hostname.to_string())
        .map_err(|e| SentryError::Config(format!("invalid server name {hostname}: {e}")))?;

    let sock = timeout(
        connect_timeout,
        TcpStream::connect((hostname, HTTPS_PORT)),
    )
    .await
    .map_err(|_| SentryError::Timeout)?
    .map_err(|e| SentryError::Network(format!("connect to {hostname}:{HTTPS_PORT} failed: {e}")))?;

    let connector = TlsConnector::from(Arc::new(config));
    let stream = timeout(handshake_timeout, connector.connect(server_name, sock))
        .await
        .map_err(|_| SentryError::Timeout)?
        .map_err(|e| SentryError::Network(format!("handshake with {hostname} failed: {e}")))?;

    let (_, session) = stream.get_ref();
    let certs = session
        .peer_certificates()
        .ok_or_else(|| SentryError::Network(format!("no peer certificate from {hostname}")))?;
    let leaf = certs
        .first()
        .ok_or_else(|| SentryError::Network(format!("empty certificate chain from {hostname}")))?;

    let (_, cert) = x509_parser::parse_x509_certificate(leaf.as_ref())
        .map_err(|e| SentryError::Parse(format!("certificate parse failed: {e}")))?;
    let tbs = &cert.tbs_certificate;

    let subject = tbs.subject.to_string();
    let issuer = tbs.issuer.to_string();
    let valid_from = asn1_to_utc(&tbs.validity.not_before)?;
    let valid_to = asn1_to_utc(&tbs.validity.not_after)?;

    Ok(CertificateInfo {
        is_self_signed: subject == issuer,
        issuer,
        valid_from,
        valid_to,
        // the handshake verified against the webpki roots
        chain_valid: true,
    })
}

fn asn1_to_utc(time: &x509_parser::time::ASN1Time) -> Result<DateTime<Utc>, SentryError> {
    let rfc2822 = time
        .to_rfc2822()
        .map_err(|e| SentryError::Parse(format!("certificate validity time: {e}")))?;
    DateTime::parse_from_rfc2822(&rfc2822)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SentryError::Parse(format!("certificate validity time: {e}")))
}
