//! Session command handlers.
//!
//! Scripted counterparts of the session view actions, for shells and CI.

use anyhow::{Context, Result};

use crate::api::{self, ConsoleClient};
use crate::config::Config;

/// Prints the current user profile, or reports the anonymous state.
pub async fn user(config: &Config, json: bool) -> Result<()> {
    let client = ConsoleClient::new(config.effective_base_url());
    let doc = client.fetch_user().await.context("fetch /user")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    if doc.is_logged_in() {
        println!("Logged in as {}", doc.display_name());
        if let Some(kubeconfig) = &doc.kubeconfig {
            println!();
            println!("{}", kubeconfig);
        }
    } else {
        println!("Not logged in. Run `dj-console login` to authenticate.");
    }
    Ok(())
}

/// Prints the login URL and opens it in the browser.
///
/// The browser step is skipped with `--print-only` or `DJ_CONSOLE_NO_BROWSER`
/// (the latter keeps tests headless).
pub fn login(config: &Config, print_only: bool) -> Result<()> {
    let url = api::login_url(config.effective_base_url(), &config.provider);
    println!("{}", url);

    let no_browser = print_only || std::env::var("DJ_CONSOLE_NO_BROWSER").is_ok();
    if !no_browser {
        open::that(&url).with_context(|| format!("open {}", url))?;
    }
    Ok(())
}

/// Clears the server-side session.
pub async fn logout(config: &Config) -> Result<()> {
    let client = ConsoleClient::new(config.effective_base_url());
    let resp = client.logout().await.context("fetch /logout")?;

    if resp.ok {
        println!("Logged out.");
        Ok(())
    } else {
        anyhow::bail!("the gateway refused the logout");
    }
}
