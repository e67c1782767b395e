use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::auth::{AuthError, AuthFlow};
use crate::cli::config::{build_delivery, flow_delays, open_context};
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login with a registered email")]
    Login {
        #[arg(help = "Email address")]
        email: String,
    },

    #[command(about = "Register a new email; a 6-digit code is sent and prompted for")]
    Signup {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Display name")]
        name: String,
        #[arg(long, help = "Code to verify with instead of prompting")]
        code: Option<String>,
    },

    #[command(about = "End the current session")]
    Logout,

    #[command(about = "Show the logged-in user")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email } => login(&email, &output_format).await,
        AuthCommands::Signup { email, name, code } => signup(&email, &name, code, &output_format).await,
        AuthCommands::Logout => {
            let mut ctx = open_context()?;
            match ctx.logout()? {
                Some(session) => output_success(
                    &output_format,
                    &format!("Logged out {}", session.email),
                    Some(json!({ "email": session.email })),
                ),
                None => output_success(&output_format, "Not logged in", None),
            }
        }
        AuthCommands::Whoami => {
            let ctx = open_context()?;
            match ctx.session() {
                Some(session) => output_success(
                    &output_format,
                    &format!("Logged in as {} <{}>", session.name, session.email),
                    Some(json!({ "email": session.email, "name": session.name })),
                ),
                None => Err(AuthError::NotAuthenticated.into()),
            }
        }
    }
}

async fn login(email: &str, output_format: &OutputFormat) -> anyhow::Result<()> {
    let mut ctx = open_context()?;
    let mut flow = AuthFlow::new(build_delivery()?, flow_delays());

    flow.submit_login(&mut ctx, email).await?;

    let name = ctx.session().map(|s| s.name.clone()).unwrap_or_default();
    output_success(
        output_format,
        &format!("Welcome back, {}!", name),
        Some(json!({ "email": email, "name": name })),
    )
}

async fn signup(
    email: &str,
    name: &str,
    code: Option<String>,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let mut ctx = open_context()?;
    let mut flow = AuthFlow::new(build_delivery()?, flow_delays());

    flow.switch_to_signup()?;
    flow.submit_signup(&ctx, email, name).await?;

    let mut supplied = code;
    loop {
        let entered = match supplied.take() {
            Some(code) => code,
            None => match prompt_code(email)? {
                Some(code) => code,
                None => anyhow::bail!("Signup abandoned; no account was created"),
            },
        };

        if !flow.enter_code(&entered) {
            output_error(output_format, "Enter the 6 digits from the email", Some("INVALID_INPUT"))?;
            continue;
        }

        match flow.submit_verify(&mut ctx).await {
            Ok(()) => break,
            Err(e @ (AuthError::InvalidCode | AuthError::IncompleteCode)) => {
                output_error(output_format, &e.to_string(), Some("INVALID_CODE"))?;
                flow.enter_code("");
            }
            Err(e) => return Err(e.into()),
        }
    }

    output_success(
        output_format,
        &format!("Account created. Welcome, {}!", name),
        Some(json!({ "email": email, "name": name })),
    )
}

/// Read one line from stdin; `None` on EOF or an empty line
fn prompt_code(email: &str) -> anyhow::Result<Option<String>> {
    eprint!("Enter the 6-digit code sent to {}: ", email);
    io::stderr().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let code = line.trim().to_string();
    Ok(if code.is_empty() { None } else { Some(code) })
}
