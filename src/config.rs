use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Base URL of the authentication service
    #[arg(long, env = "AUTHKEEPER_SERVICE_URL")]
    pub service_url: String,

    /// Account email used to sign in
    #[arg(long, env = "AUTHKEEPER_EMAIL")]
    pub email: String,

    /// Account password used to sign in
    #[arg(long, env = "AUTHKEEPER_PASSWORD")]
    pub password: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "AUTHKEEPER_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Token pair persisted by a previous run (JSON), used to resume the
    /// session instead of logging in
    #[arg(long, env = "AUTHKEEPER_INITIAL_TOKENS")]
    pub initial_tokens: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
