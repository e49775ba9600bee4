use serde::Deserialize;

/// Numeric `--verbose` level. Levels 1 and up dump bearer tokens into the log stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Verbosity(pub u8);

impl Verbosity {
    /// Level 1: outgoing request (method, url, headers).
    pub fn dumps_request(&self) -> bool {
        self.0 >= 1
    }

    /// Level 2: response status, headers and body, plus renewal tracing.
    pub fn dumps_response(&self) -> bool {
        self.0 >= 2
    }

    pub fn traces_renewal(&self) -> bool {
        self.0 >= 2
    }

    /// Level 3: one line per certificate file scanned.
    pub fn traces_trust_files(&self) -> bool {
        self.0 >= 3
    }

    /// Default log filter when neither `--log-level` nor the config file sets one.
    pub fn default_log_level(&self) -> &'static str {
        match self.0 {
            0 => "warn",
            1 | 2 => "info",
            _ => "debug",
        }
    }
}

impl From<u8> for Verbosity {
    fn from(value: u8) -> Self {
        Verbosity(value)
    }
}

#[cfg(test)]
mod test {
    use super::Verbosity;

    #[test]
    fn levels_are_cumulative() {
        let silent = Verbosity(0);
        assert!(!silent.dumps_request());
        assert_eq!(silent.default_log_level(), "warn");

        let one = Verbosity(1);
        assert!(one.dumps_request());
        assert!(!one.dumps_response());

        let three = Verbosity(3);
        assert!(three.dumps_request() && three.dumps_response() && three.traces_trust_files());
        assert_eq!(three.default_log_level(), "debug");
    }
}
