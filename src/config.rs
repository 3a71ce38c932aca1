use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub completion_api_key: String,
    pub completion_endpoint: Option<String>,
    pub completion_model: Option<String>,
    pub retrieval_url: Option<String>,
    pub agents_file: String,
    pub default_agent: String,
    pub poll_interval_secs: u64,
    pub poll_batch_size: usize,
    pub max_iterations: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "./.db/ward.db".to_string()),
            completion_api_key: env::var("COMPLETION_API_KEY")
                .expect("COMPLETION_API_KEY must be set"),
            completion_endpoint: env::var("COMPLETION_ENDPOINT").ok(),
            completion_model: env::var("COMPLETION_MODEL").ok(),
            retrieval_url: env::var("RETRIEVAL_URL").ok(),
            agents_file: env::var("AGENTS_FILE").unwrap_or_else(|_| "./agents.json".to_string()),
            default_agent: env::var("DEFAULT_AGENT").unwrap_or_else(|_| "frontdesk".to_string()),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("POLL_INTERVAL_SECS must be a valid number"),
            poll_batch_size: env::var("POLL_BATCH_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("POLL_BATCH_SIZE must be a valid number"),
            max_iterations: env::var("MAX_ITERATIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("MAX_ITERATIONS must be a valid number"),
        }
    }
}
