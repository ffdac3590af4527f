//! Settings for the `linkdeck` server.
//!
//! Sources, lowest priority first: built-in defaults, the optional
//! `config/linkdeck.toml`, `LINKDECK__<SECTION>__<KEY>` environment variables
//! and finally the plain `PORT`, `ALLOWED_ORIGINS`, `AWS_ACCESS_KEY_ID` and
//! `AWS_SECRET_ACCESS_KEY` variables.
use config::{Config, ConfigError, Environment, File, Map, Source};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/linkdeck";
const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub data_file: String,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct S3 {
    #[serde(default)]
    pub enabled: bool,
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_key")]
    pub key: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_key() -> String {
    "db.json".to_string()
}

impl From<S3> for server::S3Settings {
    fn from(value: S3) -> Self {
        Self {
            bucket: value.bucket,
            region: value.region,
            key: value.key,
            endpoint: value.endpoint,
            access_key_id: value.access_key_id,
            secret_access_key: value.secret_access_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub s3: Option<S3>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let env: Map<String, String> = std::env::vars().collect();
        Self::load(File::with_name(CONFIG_FILE).required(false), &env)
    }

    fn load<S>(file: S, env: &Map<String, String>) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let origins = env.get("ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let config = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 4000)?
            .set_default("server.data_file", "data/db.json")?
            .set_default("server.allowed_origins", DEFAULT_ORIGINS.to_vec())?
            .add_source(file)
            .add_source(
                Environment::with_prefix("LINKDECK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            )
            .set_override_option("server.port", env.get("PORT").cloned())?
            .set_override_option("server.allowed_origins", origins)?
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        if let Some(s3) = settings.s3.as_mut() {
            if let Some(key) = env.get("AWS_ACCESS_KEY_ID") {
                s3.access_key_id = Some(key.clone());
            }
            if let Some(secret) = env.get("AWS_SECRET_ACCESS_KEY") {
                s3.secret_access_key = Some(secret.clone());
            }
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn load(toml: &str, env: &[(&str, &str)]) -> Settings {
        let env: Map<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load(File::from_str(toml, FileFormat::Toml), &env).unwrap()
    }

    #[test]
    fn defaults_without_any_source() {
        let settings = load("", &[]);
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.server.data_file, "data/db.json");
        assert_eq!(settings.server.allowed_origins, DEFAULT_ORIGINS);
        assert!(settings.s3.is_none());
    }

    #[test]
    fn plain_variables_override_the_file() {
        let settings = load(
            "[server]\nport = 5000\n",
            &[
                ("PORT", "6000"),
                ("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
            ],
        );
        assert_eq!(settings.server.port, 6000);
        assert_eq!(
            settings.server.allowed_origins,
            ["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn prefixed_variables_reach_nested_keys() {
        let settings = load("", &[("LINKDECK__APP__LEVEL", "debug")]);
        assert_eq!(settings.app.level, "debug");
    }

    #[test]
    fn s3_section_with_env_credentials() {
        let settings = load(
            "[s3]\nenabled = true\nbucket = \"links\"\n",
            &[
                ("AWS_ACCESS_KEY_ID", "AKIA"),
                ("AWS_SECRET_ACCESS_KEY", "secret"),
            ],
        );
        let s3 = settings.s3.unwrap();
        assert!(s3.enabled);
        assert_eq!(s3.key, "db.json");
        assert_eq!(s3.region, "us-east-1");
        assert_eq!(s3.access_key_id.as_deref(), Some("AKIA"));
    }
}
