use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

mod agents;
mod ai;
mod config;
mod context;
mod controllers;
mod db;
mod http;
mod models;
mod tools;

use agents::{AgentManager, MessagePoller, ReasoningEngine};
use ai::{ClaudeClient, CompletionClient};
use config::Config;
use context::{ContextBuilder, RetrievalClient};
use db::Database;
use tools::ToolRegistry;

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    pub manager: Arc<AgentManager>,
    pub registry: Arc<ToolRegistry>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    log::info!("Initializing tool registry");
    let registry = Arc::new(tools::create_default_registry());
    log::info!("Registered {} tools", registry.len());

    let completion: Arc<dyn CompletionClient> = Arc::new(
        ClaudeClient::new(
            &config.completion_api_key,
            config.completion_endpoint.as_deref(),
            config.completion_model.as_deref(),
        )
        .expect("Failed to create completion client"),
    );

    let context_builder: Option<Arc<dyn ContextBuilder>> = config
        .retrieval_url
        .as_deref()
        .map(|url| Arc::new(RetrievalClient::new(url)) as Arc<dyn ContextBuilder>);
    if context_builder.is_none() {
        log::warn!("RETRIEVAL_URL not set; agents run without retrieved context");
    }

    let agent_configs = if Path::new(&config.agents_file).exists() {
        agents::config::load_agents_file(&config.agents_file)
            .expect("Failed to load agents file")
    } else {
        log::info!(
            "Agents file '{}' not found, using built-in agents",
            config.agents_file
        );
        agents::config::default_agents()
    };

    let manager = Arc::new(AgentManager::new());
    for agent_config in agent_configs {
        log::info!("Configuring agent '{}'", agent_config.name);
        let mut engine = ReasoningEngine::new(agent_config, completion.clone(), registry.clone())
            .with_database(db.clone())
            .with_memory(db.clone())
            .with_audit(db.clone())
            .with_max_iterations(config.max_iterations);
        if let Some(builder) = &context_builder {
            engine = engine.with_context_builder(builder.clone());
        }
        manager.register(engine);
    }
    log::info!("Registered {} agents", manager.len());

    let poller = Arc::new(MessagePoller::new(
        db.clone(),
        manager.clone(),
        Duration::from_secs(config.poll_interval_secs),
    ).with_batch_size(config.poll_batch_size));
    poller.start();

    log::info!("Starting ward-backend server on port {}", port);

    let state_db = db.clone();
    let state_manager = manager.clone();
    let state_registry = registry.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&state_db),
                config: config.clone(),
                manager: Arc::clone(&state_manager),
                registry: Arc::clone(&state_registry),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::chat::config)
            .configure(controllers::agent_messages::config)
            .configure(controllers::tools::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
