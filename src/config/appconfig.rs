use serde::Deserialize;

/// Used when no config overrides the backend address
pub const DEFAULT_BASE_URL: &str = "http://10.0.2.2/android_auth/";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Address of the authentication backend. login.php is appended to this.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}
