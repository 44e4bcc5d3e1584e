//! User commands - register, login, logout

use anyhow::Result;
use dialoguer::Password;

use super::{get_context, get_larder_dir};
use crate::output;

/// Prompt for a password unless one was given on the command line
fn resolve_password(password: Option<String>, confirm: bool) -> Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

pub fn register(username: &str, password: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let password = resolve_password(password, true)?;

    let user = ctx.auth_service.register(username, &password)?;

    let mut config = ctx.config.clone();
    config.set_current_user(&user.username);
    config.save(&get_larder_dir())?;

    output::success(&format!("Registered and logged in as '{}'", user.username));
    Ok(())
}

pub fn login(username: &str, password: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let password = resolve_password(password, false)?;

    let user = ctx.auth_service.login(username, &password)?;

    let mut config = ctx.config.clone();
    config.set_current_user(&user.username);
    config.save(&get_larder_dir())?;

    output::success(&format!("Logged in as '{}'", user.username));
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;

    let mut config = ctx.config.clone();
    if config.current_user.is_none() {
        output::info("Not logged in.");
        return Ok(());
    }
    config.clear_current_user();
    config.save(&get_larder_dir())?;

    output::success("Logged out");
    Ok(())
}
