//! Authentication command handlers.
//!
//! Handles login, logout, and whoami.

use std::path::Path;

use mermaid_chart_core::config::Config;
use mermaid_chart_core::error::Result;

use super::client;
use super::prompt::Prompt;

/// Handle the whoami command - print the account email.
pub async fn handle_whoami(base_url: &str, auth_token: Option<&str>) -> Result<bool> {
    let client = client::connect(base_url, auth_token).await?;
    let user = client.fetch_user().await?;
    println!("{}", user.email_address);
    Ok(true)
}

/// Handle the login command - ask for an API token, validate it against the
/// instance, and store it in the config file.
pub async fn handle_login(
    config_path: &Path,
    config: &Config,
    base_url: &str,
    prompt: &dyn Prompt,
) -> Result<bool> {
    let token = prompt.input(&format!(
        "Enter your API token. You can generate one at {base_url}/app/user/settings"
    ))?;

    // Validate before persisting, so a typo doesn't poison the config file.
    let client = client::connect(base_url, Some(&token)).await?;
    let user = client.fetch_user().await?;

    let mut new_config = config.clone();
    new_config.auth_token = Some(token);
    new_config.save(config_path)?;

    println!(
        "API token for {} saved to {}",
        user.email_address,
        config_path.display()
    );
    Ok(true)
}

/// Handle the logout command - strip the token from the config file.
pub async fn handle_logout(config_path: &Path, config: &Config, base_url: &str) -> Result<bool> {
    let Some(token) = config.auth_token.clone() else {
        println!(
            "Nothing to do, there's no API token in {}",
            config_path.display()
        );
        return Ok(true);
    };

    let mut new_config = config.clone();
    new_config.auth_token = None;
    new_config.save(config_path)?;

    // Best-effort lookup so the message can name the account. The token is
    // already gone locally either way.
    match client::connect(base_url, Some(&token)).await {
        Ok(client) => match client.fetch_user().await {
            Ok(user) => println!(
                "API token for {} removed from {}",
                user.email_address,
                config_path.display()
            ),
            Err(_) => println!("API token removed from {}", config_path.display()),
        },
        Err(_) => println!("API token removed from {}", config_path.display()),
    }

    Ok(true)
}
