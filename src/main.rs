use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use naturewatch::agents::{create_agent, Agent, AgentInput};
use naturewatch::config::Config;
use naturewatch::datasets::{EBirdProvider, INaturalistProvider, ObservationProvider};
use naturewatch::gateway::{run_gateway, AppState};
use naturewatch::providers::{ChatModel, OpenAiCompatibleModel};
use naturewatch::routing::{describe_agent, AgentKind, KeywordRouter, RouteContext, Router};
use naturewatch::sessions::InMemorySessionStore;
use naturewatch::store::PostgisAreaStore;

/// `NatureWatch` - conversational retrieval over protected areas,
/// biodiversity, and First Nations community data.
#[derive(Parser, Debug)]
#[command(name = "naturewatch")]
#[command(version)]
#[command(about = "Ask about Ontario and worldwide protected areas.", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the routing decision for a query
    #[command(long_about = "\
Show the routing decision for a query.

Classifies the query as Ontario-specific or global, printing the \
selected handler, the reason, and its description.

Examples:
  naturewatch route \"Parks near Peterborough\"
  naturewatch route \"Tell me more\" --previous-agent ontario
  naturewatch route \"Amazon rainforest\" --force ontario")]
    Route {
        /// Query text to classify
        query: String,

        /// Force a specific handler (ontario, global)
        #[arg(long)]
        force: Option<AgentKind>,

        /// Handler that served the previous turn
        #[arg(long)]
        previous_agent: Option<AgentKind>,

        /// User profile province used as routing context
        #[arg(long)]
        province: Option<String>,
    },

    /// Send a single message through routing and the selected agent
    #[command(long_about = "\
Send a single message through routing and the selected agent.

Routes the message, runs the selected handler (Ontario tools over the \
PostGIS store, or the global handler), and prints the response.

Examples:
  naturewatch chat \"Tell me about Algonquin Park\"
  naturewatch chat \"Parks in California\" --force ontario")]
    Chat {
        /// Message to send
        message: String,

        /// Force a specific handler (ontario, global)
        #[arg(long)]
        force: Option<AgentKind>,
    },

    /// Start the HTTP gateway
    #[command(long_about = "\
Start the HTTP gateway.

Serves POST /api/chat, GET /api/route, GET /api/agents, and GET /health. \
Bind address defaults to the values in your config file \
(gateway.host / gateway.port).

Examples:
  naturewatch gateway             # use config defaults
  naturewatch gateway -p 8080     # listen on port 8080
  naturewatch gateway -p 0        # random available port")]
    Gateway {
        /// Port to listen on (use 0 for a random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// List handlers and their descriptions
    Agents,
}

/// Wire the runtime dependencies (store, datasets, model, sessions).
async fn build_state(config: &Config) -> Result<AppState> {
    let store = PostgisAreaStore::connect(&config.database.url).await?;

    let inaturalist: Arc<dyn ObservationProvider> = Arc::new(INaturalistProvider::new());
    let ebird: Option<Arc<dyn ObservationProvider>> = config
        .datasets
        .ebird_api_key
        .as_deref()
        .map(|key| Arc::new(EBirdProvider::new(key)) as Arc<dyn ObservationProvider>);

    let model: Option<Arc<dyn ChatModel>> = config.chat.api_key.as_deref().map(|key| {
        Arc::new(OpenAiCompatibleModel::new(
            "chat",
            &config.chat.base_url,
            Some(key),
        )) as Arc<dyn ChatModel>
    });

    let mut state = AppState::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(store),
        inaturalist,
        ebird,
        model,
        config.chat.model_settings(),
    );
    state.user_province = config.routing.user_province.clone();
    state.force_agent = config.routing.force_agent;
    Ok(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(config_dir) = &cli.config_dir {
        if config_dir.trim().is_empty() {
            bail!("--config-dir cannot be empty");
        }
        std::env::set_var("NATUREWATCH_CONFIG_DIR", config_dir);
    }

    // Initialize logging - respects RUST_LOG env var, defaults to INFO
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = Config::load_or_init().await?;

    match cli.command {
        Commands::Route {
            query,
            force,
            previous_agent,
            province,
        } => {
            let context = RouteContext {
                previous_agent,
                user_location_province: province.or_else(|| config.routing.user_province.clone()),
            };
            let decision = KeywordRouter::new().resolve(
                &query,
                Some(&context),
                force.or(config.routing.force_agent),
            );

            println!("Query:       {query}");
            println!("Agent:       {}", decision.agent);
            println!("Matched by:  {:?}", decision.matched_by);
            println!("Description: {}", describe_agent(decision.agent.as_str()));
            Ok(())
        }

        Commands::Chat { message, force } => {
            let state = build_state(&config).await?;

            let context = RouteContext {
                previous_agent: None,
                user_location_province: state.user_province.clone(),
            };
            let decision =
                state
                    .router
                    .resolve(&message, Some(&context), force.or(state.force_agent));
            info!("routing to {} agent", decision.agent);

            let agent = create_agent(
                decision.agent,
                state.store.clone(),
                state.inaturalist.clone(),
                state.ebird.clone(),
                state.model.clone(),
                state.settings.clone(),
            );
            let output = agent.run(&AgentInput::new(message)).await?;

            println!("[{}] {}", output.agent, output.response);
            Ok(())
        }

        Commands::Gateway { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let state = build_state(&config).await?;
            run_gateway(&host, port, state).await
        }

        Commands::Agents => {
            for kind in AgentKind::ALL {
                println!("{:<8} {}", kind.as_str(), kind.description());
            }
            Ok(())
        }
    }
}
