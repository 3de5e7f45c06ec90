use site_kit_core::{Config, ResponseMode};
use std::path::PathBuf;

use super::load_config;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Checking site configuration: {}", path.display());

    let config = load_config(&path)?;

    if path.exists() {
        println!("✓ {} valid", path.display());
    } else {
        println!("✓ {} not found, using defaults", path.display());
    }
    println!("  Company: {}", config.site.company);
    println!("  Contact endpoint: {}", config.contact.path);
    println!("  Response: {}", describe_mode(&config.contact.mode));
    println!(
        "  Forward timeout: {}s",
        config.contact.forward_timeout.as_secs()
    );
    println!("  Discord API: {}", config.discord.api_base);

    let warnings = warnings(&config);
    if warnings.is_empty() {
        println!("✓ Discord forwarding configured");
    } else {
        println!();
        for warning in &warnings {
            println!("⚠ {}", warning);
        }
    }

    Ok(())
}

fn describe_mode(mode: &ResponseMode) -> String {
    match mode {
        ResponseMode::Acknowledge => "200 JSON acknowledgment".to_string(),
        ResponseMode::Redirect { location } => format!("302 redirect to {}", location),
    }
}

/// Problems that leave the endpoint working but stop notifications
fn warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.discord.channel_id.is_none() {
        warnings.push(
            "DISCORD_CHANNEL_ID is not set: submissions are accepted but not forwarded"
                .to_string(),
        );
    }
    if config.discord.bot_token.is_none() {
        warnings.push(
            "DISCORD_BOT_TOKEN is not set: every forward will fail authentication".to_string(),
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_for_missing_secrets() {
        let warnings = warnings(&Config::default());
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("DISCORD_CHANNEL_ID"));
        assert!(warnings[1].contains("DISCORD_BOT_TOKEN"));
    }

    #[test]
    fn test_no_warnings_when_configured() {
        let config = Config::default().apply_env(|_| Some("value".to_string()));
        assert!(warnings(&config).is_empty());
    }

    #[test]
    fn test_describe_mode() {
        assert_eq!(
            describe_mode(&ResponseMode::Acknowledge),
            "200 JSON acknowledgment"
        );
        assert_eq!(
            describe_mode(&ResponseMode::Redirect {
                location: "/thanks".to_string()
            }),
            "302 redirect to /thanks"
        );
    }
}
