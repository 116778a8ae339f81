//! `mosaic issue-token`

use anyhow::{bail, Context};
use clap::Args;
use mosaic_api::auth::jwt::{claims_for, encode_claims, JwtConfig};
use mosaic_core::roles::{Role, ROLE_EDITOR};

#[derive(Debug, Args)]
pub struct IssueTokenArgs {
    /// Recorded as the actor on writes made with this token
    #[arg(long)]
    pub username: String,

    /// `admin` or `editor`
    #[arg(long, default_value = ROLE_EDITOR)]
    pub role: Role,

    /// Lifetime in minutes (default: JWT_ACCESS_EXPIRY_MINS)
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub expiry_mins: Option<i64>,
}

pub fn run(args: &IssueTokenArgs) -> anyhow::Result<()> {
    let username = args.username.trim();
    if username.is_empty() {
        bail!("Username must not be blank");
    }

    let mut config = JwtConfig::try_from_env()?;
    if let Some(minutes) = args.expiry_mins {
        config.access_token_expiry_mins = minutes;
    }

    let claims = claims_for(username, args.role, &config);
    let token = encode_claims(&claims, &config).context("Failed to sign token")?;

    tracing::info!(
        username,
        role = %args.role,
        jti = %claims.jti,
        expiry_mins = config.access_token_expiry_mins,
        "Issued access token",
    );
    println!("{token}");
    Ok(())
}
