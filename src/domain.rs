//! Tooling domains and report locales

use serde::{Deserialize, Serialize};

/// A tooling domain whose error text can be classified
///
/// Rule files, config files and the CLI all parse it with [`FromStr`](std::str::FromStr)
/// and accept the same aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Domain {
    /// YAML/JSON configuration, CI pipelines, Kubernetes manifests
    Config,
    /// Dockerfiles, docker CLI and compose
    Docker,
    /// Kotlin compiler, JVM runtime and Android
    Kotlin,
    /// Shell scripts (bash/sh)
    Shell,
    /// SQL servers and ORMs
    Sql,
    /// Swift compiler, runtime and Xcode
    Swift,
}

impl Domain {
    /// Every domain, in tag order
    pub const ALL: [Domain; 6] = [
        Domain::Config,
        Domain::Docker,
        Domain::Kotlin,
        Domain::Shell,
        Domain::Sql,
        Domain::Swift,
    ];

    /// Stable lowercase tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Config => "config",
            Domain::Docker => "docker",
            Domain::Kotlin => "kotlin",
            Domain::Shell => "shell",
            Domain::Sql => "sql",
            Domain::Swift => "swift",
        }
    }

    /// Error type assigned when no rule matches
    pub fn fallback_error_type(&self) -> String {
        format!("unknown_{}_error", self.as_str())
    }

    /// Human-readable name used in report headers
    pub fn display_name(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Domain::Config, Locale::En) => "Configuration",
            (Domain::Config, Locale::Zh) => "配置",
            (Domain::Docker, _) => "Docker",
            (Domain::Kotlin, _) => "Kotlin",
            (Domain::Shell, _) => "Shell/Bash",
            (Domain::Sql, _) => "SQL",
            (Domain::Swift, _) => "Swift",
        }
    }

    /// Language tag for fenced suggestion code
    pub fn code_language(&self) -> &'static str {
        match self {
            Domain::Config => "yaml",
            Domain::Docker => "dockerfile",
            Domain::Kotlin => "kotlin",
            Domain::Shell => "bash",
            Domain::Sql => "sql",
            Domain::Swift => "swift",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "config" | "yaml" | "json" => Ok(Domain::Config),
            "docker" | "dockerfile" => Ok(Domain::Docker),
            "kotlin" | "kt" => Ok(Domain::Kotlin),
            "shell" | "bash" | "sh" => Ok(Domain::Shell),
            "sql" => Ok(Domain::Sql),
            "swift" => Ok(Domain::Swift),
            _ => Err(format!("Unknown domain: {}", s)),
        }
    }
}

impl TryFrom<String> for Domain {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Report language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "zh" | "chinese" | "zh-tw" | "zh-hant" => Ok(Locale::Zh),
            _ => Err(format!("Unknown locale: {}", s)),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
