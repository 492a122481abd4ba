//! Generator configuration
//!
//! Defaults reproduce the stock export: port 8080, `<project>_db`, lenient
//! foreign-key resolution, a gzip-compressed tarball and a 60 second budget
//! for all filesystem work of one export.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const TIMEOUT_ENV: &str = "UMLGEN_EXPORT_TIMEOUT_SECS";
pub const PORT_ENV: &str = "UMLGEN_SERVER_PORT";

/// What the generated service does with a DTO id that matches no row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeignKeyPolicy {
    /// Leave the relation unset and save anyway
    #[default]
    Ignore,
    /// Fail the request with 404 naming the missing target
    Reject,
}

impl FromStr for ForeignKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(ForeignKeyPolicy::Ignore),
            "reject" => Ok(ForeignKeyPolicy::Reject),
            _ => Err(format!("Unknown foreign key policy: {}", s)),
        }
    }
}

/// Container the scaffolder publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveFormat {
    #[default]
    TarGz,
    /// Plain directory tree, published by rename
    Directory,
}

impl ArchiveFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => ".tar.gz",
            ArchiveFormat::Directory => "",
        }
    }
}

impl FromStr for ArchiveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tar-gz" | "tgz" | "tar.gz" => Ok(ArchiveFormat::TarGz),
            "dir" | "directory" => Ok(ArchiveFormat::Directory),
            _ => Err(format!("Unknown archive format: {}", s)),
        }
    }
}

/// Which stacks an export produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    Server,
    Client,
    /// Both stacks under `backend/` and `frontend/` of one archive
    #[default]
    Fullstack,
}

impl ExportTarget {
    /// Whether an emitter for `stack` takes part in this export
    pub fn includes(self, stack: ExportTarget) -> bool {
        self == ExportTarget::Fullstack || self == stack
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportTarget::Server => "server",
            ExportTarget::Client => "client",
            ExportTarget::Fullstack => "fullstack",
        }
    }
}

impl FromStr for ExportTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" | "backend" | "springboot" => Ok(ExportTarget::Server),
            "client" | "frontend" | "flutter" => Ok(ExportTarget::Client),
            "fullstack" | "both" => Ok(ExportTarget::Fullstack),
            _ => Err(format!("Unknown export target: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub server_port: u16,
    pub database_suffix: String,
    pub java_version: String,
    pub spring_boot_version: String,
    pub foreign_key_policy: ForeignKeyPolicy,
    pub archive_format: ArchiveFormat,
    pub io_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            database_suffix: "_db".to_string(),
            java_version: "17".to_string(),
            spring_boot_version: "3.2.0".to_string(),
            foreign_key_policy: ForeignKeyPolicy::Ignore,
            archive_format: ArchiveFormat::TarGz,
            io_timeout_secs: 60,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `UMLGEN_EXPORT_TIMEOUT_SECS` and `UMLGEN_SERVER_PORT`; unparsable
    /// values are ignored
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(secs) = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            self.io_timeout_secs = secs;
        }
        if let Some(port) = std::env::var(PORT_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            self.server_port = port;
        }
        self
    }

    pub fn with_foreign_key_policy(mut self, policy: ForeignKeyPolicy) -> Self {
        self.foreign_key_policy = policy;
        self
    }

    pub fn with_archive_format(mut self, format: ArchiveFormat) -> Self {
        self.archive_format = format;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_server_port(mut self, port: u16) -> Self {
        self.server_port = port;
        self
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }

    /// `http://localhost:<port>`
    pub fn default_base_url(&self) -> String {
        format!("http://localhost:{}", self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.foreign_key_policy, ForeignKeyPolicy::Ignore);
        assert_eq!(config.io_timeout(), Duration::from_secs(60));
        assert_eq!(config.default_base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"foreignKeyPolicy": "reject", "archiveFormat": "directory"}"#)
                .unwrap();
        assert_eq!(config.foreign_key_policy, ForeignKeyPolicy::Reject);
        assert_eq!(config.archive_format, ArchiveFormat::Directory);
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Reject".parse::<ForeignKeyPolicy>().unwrap(), ForeignKeyPolicy::Reject);
        assert!("strict".parse::<ForeignKeyPolicy>().is_err());
        assert_eq!("tgz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
        assert_eq!("dir".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Directory);
        assert_eq!("Backend".parse::<ExportTarget>().unwrap(), ExportTarget::Server);
        assert!("mobile".parse::<ExportTarget>().is_err());
    }

    #[test]
    fn test_target_inclusion() {
        assert!(ExportTarget::Fullstack.includes(ExportTarget::Client));
        assert!(ExportTarget::Server.includes(ExportTarget::Server));
        assert!(!ExportTarget::Server.includes(ExportTarget::Client));
    }
}
