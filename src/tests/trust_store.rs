#[cfg(test)]
mod test {
    use std::path::Path;

    use tempfile::tempdir;

    use reqwest::Client;

    use crate::config::verbosity::Verbosity;
    use crate::tests::common::{self_signed_identity, self_signed_pem, spawn_tls_server, write_file};
    use crate::tls::trust_store::{TrustAnchor, TrustError, TrustMode};

    const BAD_DER_BLOCK: &str = "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";

    const VERBOSE: Verbosity = Verbosity(3);

    #[test]
    fn empty_path_is_insecure() {
        assert!(matches!(TrustMode::load(Path::new(""), VERBOSE), Err(TrustError::NotProvided)));
        assert_eq!(TrustMode::load_or_insecure(Path::new(""), VERBOSE), TrustMode::Insecure);
    }

    #[test]
    fn missing_directory_is_insecure() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(matches!(
            TrustMode::load(&missing, VERBOSE),
            Err(TrustError::Unlistable { .. })
        ));
        assert!(TrustMode::load_or_insecure(&missing, VERBOSE).is_insecure());
    }

    #[test]
    fn directory_without_certificates_is_insecure() {
        let dir = tempdir().unwrap();
        assert_eq!(TrustMode::load(dir.path(), VERBOSE).unwrap(), TrustMode::Insecure);

        write_file(dir.path(), "garbage.pem", "this is not a certificate\n");
        write_file(dir.path(), "truncated.pem", "-----BEGIN CERTIFICATE-----\nMIIB\n");
        assert_eq!(TrustMode::load(dir.path(), VERBOSE).unwrap(), TrustMode::Insecure);
    }

    #[test]
    fn single_certificate_is_trusted() {
        let dir = tempdir().unwrap();
        let (pem, der) = self_signed_pem("ca.example.org");
        let path = write_file(dir.path(), "ca.pem", &pem);

        let mode = TrustMode::load(dir.path(), VERBOSE).unwrap();
        assert!(!mode.is_insecure());
        let anchors = mode.anchors();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].der, der);
        assert_eq!(anchors[0].source, path);
    }

    #[test]
    fn garbage_next_to_a_certificate_is_skipped() {
        let dir = tempdir().unwrap();
        let (pem, der) = self_signed_pem("ca.example.org");
        write_file(dir.path(), "a-garbage.crt", "garbage");
        write_file(dir.path(), "b-ca.crt", &pem);
        write_file(dir.path(), "c-truncated.crt", "-----BEGIN CERTIFICATE-----\nMIIB\n");
        std::fs::create_dir(dir.path().join("d-subdir")).unwrap();

        let mode = TrustMode::load(dir.path(), Verbosity(0)).unwrap();
        assert_eq!(mode.anchors().len(), 1);
        assert_eq!(mode.anchors()[0].der, der);
    }

    #[test]
    fn bundle_contributes_every_certificate() {
        let dir = tempdir().unwrap();
        let (first, _) = self_signed_pem("one.example.org");
        let (second, _) = self_signed_pem("two.example.org");
        write_file(dir.path(), "bundle.pem", &format!("{}{}", first, second));

        let mode = TrustMode::load(dir.path(), VERBOSE).unwrap();
        assert_eq!(mode.anchors().len(), 2);
    }

    #[test]
    fn strict_mode_refuses_insecure() {
        let dir = tempdir().unwrap();
        let err = TrustMode::Insecure.enforce(dir.path(), true).unwrap_err();
        assert!(matches!(err, TrustError::InsecureRefused { .. }));
        assert!(TrustMode::Insecure.enforce(dir.path(), false).unwrap().is_insecure());
    }

    #[test]
    fn strict_mode_accepts_verified() {
        let dir = tempdir().unwrap();
        let (pem, _) = self_signed_pem("ca.example.org");
        write_file(dir.path(), "ca.pem", &pem);

        let mode = TrustMode::load(dir.path(), VERBOSE).unwrap();
        let mode = mode.enforce(dir.path(), true).unwrap();
        assert!(mode.build_client().is_ok());
    }

    #[test]
    fn insecure_client_builds() {
        assert!(TrustMode::Insecure.build_client().is_ok());
    }

    #[test]
    fn undecodable_certificate_block_is_skipped() {
        let dir = tempdir().unwrap();
        let (pem, der) = self_signed_pem("ca.example.org");
        write_file(dir.path(), "a.pem", &pem);
        write_file(dir.path(), "b.pem", BAD_DER_BLOCK);

        let mode = TrustMode::load(dir.path(), VERBOSE).unwrap();
        assert_eq!(mode.anchors().len(), 1);
        assert_eq!(mode.anchors()[0].der, der);
        assert!(mode.build_client().is_ok());
    }

    #[test]
    fn bundle_keeps_valid_blocks_next_to_bad_ones() {
        let dir = tempdir().unwrap();
        let (pem, der) = self_signed_pem("ca.example.org");
        write_file(dir.path(), "bundle.pem", &format!("{}{}", BAD_DER_BLOCK, pem));

        let mode = TrustMode::load(dir.path(), VERBOSE).unwrap();
        assert_eq!(mode.anchors().len(), 1);
        assert_eq!(mode.anchors()[0].der, der);
    }

    #[test]
    fn only_bad_blocks_is_insecure() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "bad.pem", BAD_DER_BLOCK);
        assert_eq!(TrustMode::load(dir.path(), VERBOSE).unwrap(), TrustMode::Insecure);
    }

    const HOST: &str = "renewer.test";

    async fn https_get(mode: &TrustMode, addr: std::net::SocketAddr) -> reqwest::Result<String> {
        let client = mode
            .configure(Client::builder().resolve(HOST, addr))
            .timeout(std::time::Duration::from_secs(5))
            .build()?;
        client
            .get(format!("https://{}:{}/", HOST, addr.port()))
            .send()
            .await?
            .text()
            .await
    }

    #[tokio::test]
    async fn trust_mode_governs_tls_verification() {
        let (pem, cert_der, key_der) = self_signed_identity(HOST);
        let (server, addr) = spawn_tls_server(cert_der.clone(), key_der).await;

        // the server's own certificate is trusted
        let dir = tempdir().unwrap();
        write_file(dir.path(), "server.pem", &pem);
        let trusted = TrustMode::load(dir.path(), VERBOSE).unwrap();
        assert_eq!(trusted.anchors()[0].der, cert_der);
        assert_eq!(https_get(&trusted, addr).await.unwrap(), "ok");

        // an unrelated anchor rejects the server, built-in roots are not consulted
        let (_, other_der) = self_signed_pem(HOST);
        let other = TrustMode::Verified(vec![TrustAnchor {
            source: dir.path().join("other.pem"),
            der: other_der,
        }]);
        assert!(https_get(&other, addr).await.is_err());

        // verification disabled
        assert_eq!(https_get(&TrustMode::Insecure, addr).await.unwrap(), "ok");

        server.abort();
    }
}
