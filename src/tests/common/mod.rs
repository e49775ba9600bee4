// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use std::path::{Path, PathBuf};

use reqwest::Client;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::{self, ServerConfig};
use tokio_rustls::TlsAcceptor;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Fresh self-signed certificate as (PEM text, DER bytes).
pub fn self_signed_pem(host: &str) -> (String, Vec<u8>) {
    let certified = rcgen::generate_simple_self_signed(vec![host.to_string()]).expect("rcgen");
    (certified.cert.pem(), certified.cert.der().to_vec())
}

/// Self-signed identity for `host` as (PEM text, certificate DER, PKCS#8 key DER).
pub fn self_signed_identity(host: &str) -> (String, Vec<u8>, Vec<u8>) {
    let certified = rcgen::generate_simple_self_signed(vec![host.to_string()]).expect("rcgen");
    (
        certified.cert.pem(),
        certified.cert.der().to_vec(),
        certified.key_pair.serialize_der(),
    )
}

/// HTTPS server on an ephemeral port answering every request with `200 ok`.
pub async fn spawn_tls_server(cert_der: Vec<u8>, key_der: Vec<u8>) -> (JoinHandle<()>, SocketAddr) {
    let config = ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(
            vec![CertificateDer::from(cert_der)],
            PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_der)),
        )
        .expect("server config");
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                // handshake fails when the client rejects the certificate
                let Ok(mut tls) = acceptor.accept(stream).await else { return };
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match tls.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = tls
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok")
                    .await;
                let _ = tls.shutdown().await;
            });
        }
    });
    (handle, addr)
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write test file");
    path
}

/// Renewal endpoint body in the identity service's wire format.
pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "expires_in": 120,
        "refresh_token": refresh,
        "refresh_expires_in": 3600,
        "id_token": format!("id-{}", access),
    })
}
