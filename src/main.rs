use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use trade_proof::config::{Config, PUBLIC_KEY_VAR};
use trade_proof::middleware::rate_limiter::ClientRateLimiter;
use trade_proof::proof::{generate_key_pair, issue_token, Claim};
use trade_proof::routes;
use trade_proof::services::proof_service::ProofService;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signing and verification HTTP service (default)
    Serve,
    /// Generate an Ed25519 signing key pair
    ///
    /// cargo run -- generate-keys
    /// cargo run -- generate-keys --output /path/to/keys
    GenerateKeys {
        /// Also write signing.key and public.key into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Issue a token for a claim using SIGNING_KEY_BASE64
    Sign {
        #[arg(long)]
        handle: String,
        #[arg(long)]
        challenge: String,
        /// Minutes until the claim expires
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(i64).range(5..=1440))]
        expires_minutes: i64,
    },
    /// Verify a token against PUBLIC_KEY_BASE64
    Verify {
        token: String,
        /// Public key to use instead of the environment
        #[arg(long)]
        public_key: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::GenerateKeys { output }) => generate_keys(output),
        Some(Commands::Sign {
            handle,
            challenge,
            expires_minutes,
        }) => sign(handle, challenge, expires_minutes),
        Some(Commands::Verify { token, public_key }) => verify(&token, public_key),
        Some(Commands::Serve) | None => start_server().await,
    }
}

fn load_config() -> io::Result<Config> {
    Config::from_env().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })
}

fn generate_keys(output: Option<PathBuf>) -> io::Result<()> {
    let pair = generate_key_pair();
    print!("{}", pair.env_lines());

    if let Some(dir) = output {
        pair.write_to(&dir)?;
        log::info!("Base64-encoded keys written to {}", dir.display());
    }
    Ok(())
}

fn sign(handle: String, challenge: String, expires_minutes: i64) -> io::Result<()> {
    let config = load_config()?;
    let signer = config
        .signer()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let issued = Claim::issue(handle, challenge, Duration::minutes(expires_minutes), Utc::now())
        .and_then(|claim| issue_token(&claim, &signer).map(|token| (claim, token)));
    match issued {
        Ok((claim, token)) => {
            log::info!("Issued token for {} (nonce {})", claim.handle, claim.nonce);
            println!("{}", token);
            Ok(())
        }
        Err(e) => Err(io::Error::new(io::ErrorKind::InvalidInput, e)),
    }
}

fn verify(token: &str, public_key: Option<String>) -> io::Result<()> {
    let public_key = match public_key {
        Some(key) => key,
        None => {
            dotenv::dotenv().ok();
            std::env::var(PUBLIC_KEY_VAR).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not set", PUBLIC_KEY_VAR),
                )
            })?
        }
    };

    match trade_proof::proof::verify(token, &public_key) {
        Ok(payload) => {
            println!("OK: signature verified");
            println!("{}", payload);
            if let Ok(claim) = Claim::from_payload(&payload) {
                let freshness = trade_proof::proof::freshness::evaluate(&claim, Utc::now());
                println!("freshness: {:?}", freshness);
            }
            Ok(())
        }
        Err(e) => {
            println!("NG: {} ({})", e, e.kind());
            Err(io::Error::new(io::ErrorKind::InvalidData, e))
        }
    }
}

async fn start_server() -> io::Result<()> {
    let config = load_config()?;

    let app_state = routes::AppState {
        proof_service: Arc::new(ProofService::from_config(&config)),
        sign_limiter: ClientRateLimiter::new(
            config.sign_requests_per_minute,
            config.sign_burst_size,
        ),
    };

    let bind_address = config.bind_address.clone();
    log::info!("Starting server at {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(actix_middleware::Logger::default())
            .configure(|cfg| routes::init_routes(cfg, &app_state))
    })
    .workers(num_cpus::get().min(8))
    .bind(&bind_address)
    .map_err(|e| {
        log::error!("Failed to bind server to {}: {}", bind_address, e);
        e
    })?
    .run()
    .await
}
