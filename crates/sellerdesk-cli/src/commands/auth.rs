//! Login, signup, logout and session status.

use sellerdesk_session::Route;

use crate::cli::{LoginArgs, SignupArgs};
use crate::client::{AppContext, CliResult, resolve_password};
use crate::output::render_status;

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let password = resolve_password(args.password)?;
    ctx.enter(Route::Login).await?;
    let response = ctx.sessions.login(&args.email, &password).await?;
    println!("logged in as {}", response.uid);
    Ok(())
}

pub(crate) async fn handle_signup(ctx: &AppContext, args: SignupArgs) -> CliResult<()> {
    let password = resolve_password(args.password)?;
    let confirmation = ctx
        .sessions
        .signup(&args.email, &password, &args.name)
        .await?;
    println!(
        "{}",
        confirmation
            .message
            .as_deref()
            .unwrap_or("account created; run `sellerdesk login` to continue")
    );
    Ok(())
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.sessions.logout()?;
    println!("logged out");
    Ok(())
}

pub(crate) async fn handle_status(ctx: &AppContext) -> CliResult<()> {
    let phase = ctx.resolve_phase().await?;
    let session = ctx.api.session();
    render_status(
        phase,
        session.uid().as_deref(),
        session.profile().as_ref(),
        ctx.output,
    )
}
