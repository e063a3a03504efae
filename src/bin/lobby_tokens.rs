use log::{error, info, warn};
use std::env;
use std::process::ExitCode;

use lobby_auth::config::TokenConfig;
use lobby_auth::error::{LobbyError, Result};
use lobby_auth::security_logger::{log_security_event, SecurityEvent};
use lobby_auth::{Principal, TokenService};

const USAGE: &str = "usage: lobby_tokens issue <username> [authority...]\n       lobby_tokens verify <token>";

fn main() -> ExitCode {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = TokenConfig::from_env().map_err(|e| {
        log_security_event(&SecurityEvent::ConfigurationError {
            component: "token config".to_string(),
            error: e.to_string(),
        });
        e
    })?;
    info!("Configuration: issuer={}, ttl={:?}", config.issuer, config.ttl);

    let tokens = TokenService::new(&config)?;

    match args {
        [command, username, authorities @ ..] if command == "issue" => {
            let principal = Principal::new(username.as_str(), authorities.iter().cloned());
            let token = tokens.issue(&principal)?;
            println!("{}", token);
            Ok(())
        }
        [command, token] if command == "verify" => {
            let identity = tokens.verify(token)?;
            let valid = tokens.is_token_valid(&identity.subject, token)?;
            let report = serde_json::json!({
                "identity": identity,
                "valid": valid,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        _ => Err(LobbyError::Usage(USAGE)),
    }
}
