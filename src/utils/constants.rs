//! Shared constants

/// Appended to the configured base URL.
pub const RENEW_PATH: &str = "/token/renew";

/// Directory under `$HOME` populated by the CA bootstrap.
pub const CERTIFICATES_DIR: &str = ".certificates";

pub const DEFAULT_CA_URLS: [&str; 4] = [
    "https://cafiles.cern.ch/cafiles/certificates/CERN%20Certification%20Authority.crt",
    "https://cafiles.cern.ch/cafiles/certificates/CERN%20Certification%20Authority(1).crt",
    "https://cafiles.cern.ch/cafiles/certificates/CERN%20Root%20Certification%20Authority%202.crt",
    "https://cafiles.cern.ch/cafiles/certificates/CERN%20Grid%20Certification%20Authority.crt",
];

pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_METRICS_HOST: &str = "127.0.0.1";
pub const DEFAULT_METRICS_PORT: u16 = 9100;
