#[cfg(test)]
mod tests {
    use std::fs;
    use tempfile::tempdir;

    use crate::sinks::sink_file::write_token;

    #[tokio::test]
    async fn output_holds_exactly_the_access_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");

        write_token(&path, "token-value-123").await.expect("write token");
        assert_eq!(fs::read_to_string(&path).unwrap(), "token-value-123");

        // overwrite, never append
        write_token(&path, "next").await.expect("write token");
        assert_eq!(fs::read_to_string(&path).unwrap(), "next");

        // no temp file left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn output_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("token");
        write_token(&path, "secret").await.expect("write token");

        let mode = fs::metadata(&path).expect("meta").permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "permissions mismatch (expected 0600)");
    }
}
