mod chat;

use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use eyre::{Result, bail};

use crate::api_client::{AnswerProvider, HttpAnswerProvider, StaticAnswerProvider};
use crate::config::Settings;
use crate::server::WebServer;

#[derive(Debug, Parser)]
#[command(name = "portfolio-chatbot", about = "Chat relay and terminal client for the portfolio assistant")]
pub struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the chat relay server
    Serve(ServeArgs),
    /// Chat with a running relay from the terminal
    Chat(ChatArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,
    /// Port to bind
    #[arg(long, default_value_t = 3000)]
    port: u16,
    /// Endpoint of the hosted answer function (overrides CHATBOT_UPSTREAM_URL)
    #[arg(long)]
    upstream_url: Option<String>,
    /// Serve canned answers instead of calling the hosted function
    #[arg(long)]
    mock: bool,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Base URL of the relay
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    pub url: String,
    /// Use the non-streaming endpoint (no typing effect)
    #[arg(long)]
    pub plain: bool,
}

impl CliArgs {
    pub async fn execute(self) -> Result<ExitCode> {
        match self.command {
            Command::Serve(args) => serve(args).await,
            Command::Chat(args) => chat::run(args).await,
        }
    }
}

async fn serve(args: ServeArgs) -> Result<ExitCode> {
    let mut settings = Settings::from_env();
    settings.bind = SocketAddr::new(args.host, args.port);
    if args.upstream_url.is_some() {
        settings.upstream_url = args.upstream_url;
    }

    let provider: Arc<dyn AnswerProvider> = if args.mock {
        tracing::info!("serving canned answers (--mock)");
        Arc::new(StaticAnswerProvider::canned_portfolio())
    } else {
        let Some(upstream_url) = settings.upstream_url.clone() else {
            bail!(
                "no answer function configured: pass --upstream-url, set CHATBOT_UPSTREAM_URL, \
                 or run with --mock"
            );
        };
        Arc::new(HttpAnswerProvider::new(
            upstream_url,
            settings.api_key.clone(),
            settings.request_timeout,
        )?)
    };

    WebServer::new(provider, settings).run().await?;

    Ok(ExitCode::SUCCESS)
}
