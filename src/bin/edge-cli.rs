use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use qrmenu_edge::config::{load_config, load_defaults, EdgeConfig};
use qrmenu_edge::routing::{RouteRequest, TenantRouter};
use qrmenu_edge::tenancy::{generate_slug, generate_unique_slug, BaseDomain, PublicUrls};

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Management CLI for the QR menu edge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a request offline and print the routing decision
    Classify {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(long)]
        query: Option<String>,
    },
    /// Print the public URLs for a restaurant
    Links {
        #[arg(short, long)]
        config: Option<PathBuf>,
        slug: String,
        #[arg(long)]
        table: Option<String>,
    },
    /// Generate a tenant slug from a restaurant name
    Slug {
        name: String,
        /// Append a random suffix
        #[arg(long)]
        unique: bool,
    },
    /// Check edge status via the admin API
    Status(Remote),
    /// Show the active routing rules via the admin API
    Routing(Remote),
}

#[derive(clap::Args)]
struct Remote {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,
    #[arg(short, long, env = "QRMENU_ADMIN_KEY")]
    key: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            config,
            host,
            path,
            query,
        } => {
            let config = load(config)?;
            let router = TenantRouter::from_config(&config.tenancy)?;
            let decision = router.classify(&RouteRequest::new(
                host.as_deref(),
                &path,
                query.as_deref(),
            ));
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Commands::Links {
            config,
            slug,
            table,
        } => {
            let config = load(config)?;
            let urls = PublicUrls::new(BaseDomain::parse(&config.tenancy.base_url)?);
            let links = json!({
                "landing": urls.landing_url(),
                "panel": urls.panel_url(),
                "admin": urls.admin_url(),
                "menu": urls.restaurant_url(&slug, table.as_deref()),
                "domain": urls.restaurant_domain(&slug),
            });
            println!("{}", serde_json::to_string_pretty(&links)?);
        }
        Commands::Slug { name, unique } => {
            let slug = if unique {
                generate_unique_slug(&name)
            } else {
                generate_slug(&name)
            };
            println!("{}", slug);
        }
        Commands::Status(remote) => admin_get(&remote, "status").await?,
        Commands::Routing(remote) => admin_get(&remote, "routing").await?,
    }

    Ok(())
}

fn load(path: Option<PathBuf>) -> Result<EdgeConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => load_config(&path)?,
        None => load_defaults()?,
    })
}

async fn admin_get(remote: &Remote, endpoint: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", remote.key))?,
    );

    let res = reqwest::Client::new()
        .get(format!("{}/{}", remote.url.trim_end_matches('/'), endpoint))
        .headers(headers)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
