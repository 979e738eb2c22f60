pub mod domain;
pub mod forecast;
pub mod ranking;
pub mod storage;
pub mod time;
pub mod workflow;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    pub const DEFAULT_DATA_DIR: &str = ".turnip_cli";
    pub const DEFAULT_TOP_K: usize = 3;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub data_dir: PathBuf,
        pub sentry_dsn: Option<String>,
        // Parsed on demand so a bad value only fails the runs that need it.
        top_k: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
        where
            F: Fn(&str) -> Option<String>,
        {
            let data_dir = lookup("TURNIP_DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

            Ok(Self {
                data_dir,
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
                top_k: lookup("TURNIP_TOP_K"),
            })
        }

        pub fn top_k(&self) -> anyhow::Result<usize> {
            match &self.top_k {
                Some(s) => s.trim().parse::<usize>().with_context(|| {
                    format!("TURNIP_TOP_K must be a non-negative integer (got {s:?})")
                }),
                None => Ok(DEFAULT_TOP_K),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
            let vars: HashMap<String, String> = vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Settings::from_lookup(|key| vars.get(key).cloned())
        }

        #[test]
        fn defaults_when_unset() {
            let s = settings(&[]).unwrap();
            assert_eq!(s.data_dir, PathBuf::from(".turnip_cli"));
            assert_eq!(s.top_k().unwrap(), 3);
            assert!(s.sentry_dsn.is_none());
        }

        #[test]
        fn reads_overrides() {
            let s = settings(&[("TURNIP_DATA_DIR", "/tmp/turnips"), ("TURNIP_TOP_K", "5")])
                .unwrap();
            assert_eq!(s.data_dir, PathBuf::from("/tmp/turnips"));
            assert_eq!(s.top_k().unwrap(), 5);
        }

        #[test]
        fn bad_top_k_only_fails_when_read() {
            let s = settings(&[("TURNIP_TOP_K", "three")]).unwrap();
            assert_eq!(s.data_dir, PathBuf::from(".turnip_cli"));
            assert!(s.top_k().is_err());
        }
    }
}
