use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use portico::{
    adapters::{FixedResolver, HttpClientAdapter, HttpHandler, RegistryResolver, router},
    config::models::{ProxyConfig, ResolverConfig},
    core::{ProxyService, ServiceAddress},
    ports::{http_client::HttpClient, resolver::Resolver},
    tracing_setup,
    utils::GracefulShutdown,
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Initialize a new configuration file
    Init {
        /// Output path for the new config file
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Start the proxy (default)
    Serve {
        /// Configuration file to use
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
}

/// Build the resolver named by the configuration.
fn create_resolver(config: &ProxyConfig) -> Arc<dyn Resolver> {
    match &config.resolver {
        ResolverConfig::Fixed { scheme, host, port } => {
            tracing::info!("Using fixed backend address {}://{}:{}", scheme, host, port);
            Arc::new(FixedResolver::new(ServiceAddress::new(
                *scheme,
                host.clone(),
                *port,
            )))
        }
        ResolverConfig::Registry {
            endpoint,
            service,
            ttl_ms,
            timeout_secs,
        } => {
            tracing::info!(
                "Using service registry at {} for service '{}' (cache TTL {}ms)",
                endpoint,
                service,
                ttl_ms
            );
            Arc::new(RegistryResolver::new(
                endpoint.clone(),
                service.clone(),
                *timeout_secs,
                Duration::from_millis(*ttl_ms),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let (command, config_path) = match args.command {
        Some(Commands::Validate { config }) => ("validate", config),
        Some(Commands::Init { config }) => ("init", config),
        Some(Commands::Serve { config }) => ("serve", config),
        None => ("serve", args.config), // Default to serve with config from args
    };

    match command {
        "validate" => {
            return validate_config_command(&config_path).await;
        }
        "init" => {
            return init_config_command(&config_path).await;
        }
        "serve" => {
            // Continue with normal server startup
        }
        _ => unreachable!(),
    }

    tracing_setup::init_tracing().map_err(|e| eyre!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Loading configuration from {config_path}");
    let config = portico::config::load_config(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {config_path}"))?;
    portico::config::ProxyConfigValidator::validate(&config)
        .map_err(|e| eyre!("Invalid configuration: {e}"))?;

    let resolver = create_resolver(&config);
    let http_client: Arc<dyn HttpClient> = Arc::new(
        HttpClientAdapter::new(config.upstream.timeout_secs)
            .context("Failed to create HTTP client adapter")?,
    );
    let proxy = Arc::new(ProxyService::new(config.chat_path.clone()));
    let handler = Arc::new(HttpHandler::new(proxy, resolver, http_client));

    let app = router(handler);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .context("Failed to parse listen address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!(
        "Portico proxy listening on {} (chat path: {})",
        addr,
        config.chat_path
    );
    println!("Portico proxy listening on {addr}");

    let graceful_shutdown = Arc::new(GracefulShutdown::new());
    {
        let graceful_shutdown = graceful_shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = graceful_shutdown.run_signal_handler().await {
                tracing::error!("Signal handler error: {}", e);
            }
        });
    }

    tokio::select! {
        result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        ) => {
            result.context("Server error")?;
        }
        shutdown_reason = graceful_shutdown.wait_for_shutdown_signal() => {
            tracing::info!("Shutdown signal received: {:?}", shutdown_reason);
        }
    }

    tracing::info!("Graceful shutdown completed");
    Ok(())
}

/// Validate configuration file and exit
async fn validate_config_command(config_path: &str) -> Result<()> {
    use portico::config::{ProxyConfigValidator, load_config};

    println!("Validating configuration file: {config_path}");

    if !Path::new(config_path).exists() {
        eprintln!("Error: Configuration file '{config_path}' not found");
        std::process::exit(1);
    }

    let config = match load_config(config_path).await {
        Ok(config) => {
            println!("Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("Configuration parsing failed:");
            eprintln!("   {e}");
            std::process::exit(1);
        }
    };

    match ProxyConfigValidator::validate(&config) {
        Ok(()) => {
            println!("Configuration validation: OK");
            println!();
            println!("Configuration Summary:");
            println!("   • Listen Address: {}", config.listen_addr);
            println!("   • Chat Path: {}", config.chat_path);
            println!("   • Upstream Timeout: {}s", config.upstream.timeout_secs);
            match &config.resolver {
                ResolverConfig::Fixed { scheme, host, port } => {
                    println!("   • Resolver: fixed ({scheme}://{host}:{port})");
                }
                ResolverConfig::Registry {
                    endpoint, service, ..
                } => {
                    println!("   • Resolver: registry ({endpoint}, service '{service}')");
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration validation failed:");
            eprintln!("{e}");
            println!();
            println!("Common fixes:");
            println!("   • Verify listen address format (e.g., '127.0.0.1:8080')");
            println!("   • Ensure the registry endpoint starts with http:// or https://");
            println!("   • Ensure the chat path starts with '/'");
            std::process::exit(1);
        }
    }
}

/// Initialize a new configuration file
async fn init_config_command(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        eprintln!("Error: Configuration file '{config_path}' already exists");
        std::process::exit(1);
    }

    let default_config = r#"# Portico Proxy Configuration

# The address the proxy listens on
listen_addr = "127.0.0.1:8080"

# Backend WebSocket endpoint path disclosed to the browser
chat_path = "/dragon"

[upstream]
# Bound on a single forwarded request, in seconds
timeout_secs = 30

# Resolver: fixed backend address
[resolver]
type = "fixed"
scheme = "http"
host = "localhost"
port = 5001

# Resolver: external service registry
# [resolver]
# type = "registry"
# endpoint = "http://127.0.0.1:8500"
# service = "chat-server"
# ttl_ms = 2000
# timeout_secs = 5
"#;

    tokio::fs::write(path, default_config)
        .await
        .context("Failed to write config file")?;
    println!("Created default configuration at: {config_path}");
    println!("   Run 'portico serve --config {config_path}' to start the proxy");
    Ok(())
}
