//! Sign-in, sign-out and the current session

use printshop_domain::{Module, Session};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, CommandResult};

/// Sign in a staff member already authenticated by the identity provider
///
/// `token` is the provider's access token, kept on the session mirror.
pub async fn login(ctx: &AppContext, email: &str, token: &str) -> CommandResult<Session> {
    execute_command("session::login", || async { ctx.gate.sign_in(email, token).await }).await
}

pub async fn logout(ctx: &AppContext) -> CommandResult<()> {
    execute_command("session::logout", || async { ctx.gate.sign_out().await }).await
}

pub async fn current_session(ctx: &AppContext) -> CommandResult<Option<Session>> {
    execute_command("session::current_session", || async { ctx.gate.current().await }).await
}

/// Module the signed-in role lands on, `None` when signed out
pub async fn home_module(ctx: &AppContext) -> CommandResult<Option<Module>> {
    execute_command("session::home_module", || async {
        Ok(ctx.gate.current().await?.map(|session| session.role.home_module()))
    })
    .await
}
