//! Snapshot service configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Snapshot configuration, read from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SurrealDB endpoint (ws://, http://, mem:// ...)
    pub database_url: String,
    /// SurrealDB namespace
    pub database_namespace: String,
    /// SurrealDB database name
    pub database_name: String,
    /// Root credentials (both must be set to sign in)
    pub database_user: Option<String>,
    pub database_pass: Option<String>,
    /// S3 bucket holding backup archives
    pub s3_bucket: String,
    /// Webhook receiving status notifications
    pub notify_webhook_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String, BoxError> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("{name} must be set").into())
        };

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            database_namespace: lookup("DATABASE_NAMESPACE")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "crab".into()),
            database_name: lookup("DATABASE_NAME")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "crab".into()),
            database_user: lookup("DATABASE_USER").filter(|s| !s.is_empty()),
            database_pass: lookup("DATABASE_PASS").filter(|s| !s.is_empty()),
            s3_bucket: require("BACKUP_S3_BUCKET")?,
            notify_webhook_url: require("NOTIFY_WEBHOOK_URL")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars_defaults() {
        let env = vars(&[
            ("DATABASE_URL", "ws://localhost:8000"),
            ("BACKUP_S3_BUCKET", "crab-backups"),
            ("NOTIFY_WEBHOOK_URL", "https://hooks.example.com/abc"),
        ]);
        let config = Config::from_vars(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.database_url, "ws://localhost:8000");
        assert_eq!(config.database_namespace, "crab");
        assert_eq!(config.database_name, "crab");
        assert!(config.database_user.is_none());
        assert_eq!(config.s3_bucket, "crab-backups");
    }

    #[test]
    fn test_from_vars_missing_required() {
        let env = vars(&[
            ("DATABASE_URL", "ws://localhost:8000"),
            ("NOTIFY_WEBHOOK_URL", "https://hooks.example.com/abc"),
        ]);
        let err = Config::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("BACKUP_S3_BUCKET"));
    }

    #[test]
    fn test_from_vars_empty_counts_as_missing() {
        let env = vars(&[
            ("DATABASE_URL", ""),
            ("BACKUP_S3_BUCKET", "crab-backups"),
            ("NOTIFY_WEBHOOK_URL", "https://hooks.example.com/abc"),
            ("DATABASE_USER", "root"),
            ("DATABASE_PASS", "secret"),
        ]);
        let err = Config::from_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
