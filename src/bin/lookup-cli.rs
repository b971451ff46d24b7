use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "lookup-cli")]
#[command(about = "Client for the account lookup service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key (only needed for admin commands)
    #[arg(short, long, env = "ACCOUNT_LOOKUP_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up routing metadata for an account
    Lookup {
        iban: String,
        country: String,
        currency: String,
    },
    /// Check service status
    Status,
    /// List circuit breaker state
    Breakers,
    /// Force a circuit breaker back to closed
    Reset {
        /// Operation name, e.g. lookupAccount
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let res = match cli.command {
        Commands::Lookup { iban, country, currency } => {
            client
                .get(format!("{}/v1/accountlookup/account", cli.url))
                .query(&[("iban", iban), ("country", country), ("currency", currency)])
                .send()
                .await?
        }
        Commands::Status => {
            client
                .get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Breakers => {
            client
                .get(format!("{}/admin/circuit-breakers", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Reset { name } => {
            client
                .post(format!("{}/admin/circuit-breakers/{}/reset", cli.url, name))
                .headers(headers)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
