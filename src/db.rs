use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tokio::net::lookup_host;

use crate::config::Config;

fn redact_db_url(url: &str) -> String {
    let mut result = String::with_capacity(url.len());
    let mut chars = url.chars().peekable();
    let mut in_authority = false;
    let mut redacting = false;

    while let Some(ch) = chars.next() {
        if !in_authority {
            result.push(ch);
            if ch == '/' && chars.peek() == Some(&'/') {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
                in_authority = true;
            }
            continue;
        }

        if redacting {
            if ch == '@' {
                redacting = false;
                result.push(ch);
            }
            continue;
        }

        if ch == ':' && chars.peek().is_some_and(|next| *next != '/') && has_userinfo(&chars) {
            result.push(ch);
            result.push_str("***");
            redacting = true;
            continue;
        }

        result.push(ch);

        if ch == '/' {
            break;
        }
    }

    result.extend(chars);
    result
}

// A ':' is a password separator only if an '@' follows before the path.
fn has_userinfo(rest: &std::iter::Peekable<std::str::Chars<'_>>) -> bool {
    rest.clone().take_while(|ch| *ch != '/').any(|ch| ch == '@')
}

fn extract_host_port(url: &str) -> Option<(String, u16)> {
    let after_scheme = url.split("://").nth(1)?;
    let authority = after_scheme.split('/').next().unwrap_or(after_scheme);
    let hostport = authority.rsplit('@').next().unwrap_or(authority);
    let mut parts = hostport.split(':');
    let host = parts.next().filter(|host| !host.is_empty())?.to_string();
    let port = parts
        .next()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5432);
    Some((host, port))
}

pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let url = config
        .database_url
        .clone()
        .ok_or_else(|| DbErr::Custom("DATABASE_URL is not set".to_string()))?;
    tracing::info!(database_url = %redact_db_url(&url), "db: connecting");

    if let Some((host, port)) = extract_host_port(&url) {
        match lookup_host((host.as_str(), port)).await {
            Ok(addrs) => {
                let list: Vec<String> = addrs.map(|addr| addr.to_string()).collect();
                tracing::debug!(%host, port, ?list, "db: lookup_host");
            }
            Err(err) => {
                tracing::warn!(%host, port, error = %err, "db: lookup_host failed");
            }
        }
    }

    let timeout = Duration::from_secs(config.db_connect_timeout_seconds);
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    Database::connect(options).await
}
