use clap::Parser;
use spicechat::api::ChatServerClient;
use spicechat::core::app::App;
use spicechat::core::config::Config;
use spicechat::logging;
use spicechat::ui::chat_loop::run_chat;
use spicechat::ui::theme::Theme;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spicechat")]
#[command(version)]
#[command(about = "A full-screen terminal chat client for a Spice AI chat server")]
#[command(long_about = "Spicechat is a full-screen terminal client for a Spice AI chat server. \
Log in or sign up from inside the app, browse your conversation history in \
the sidebar, and chat with fenced code blocks rendered and highlighted.\n\n\
Controls:\n\
  Type              Enter your message in the composer\n\
  Enter             Send the message (Alt+Enter inserts a newline)\n\
  Tab               Move focus between composer and sidebar\n\
  Ctrl+N            Start a new chat\n\
  Mouse/PageUp/Down Scroll through the transcript\n\
  Esc               Close a dialog / dismiss a banner\n\
  Ctrl+C            Quit\n\n\
Slash commands: /new /login /signup /logout /profile /subscribe /about /help /quit")]
struct Args {
    #[arg(short, long, help = "Chat server base URL (overrides the config file)")]
    server: Option<String>,

    #[arg(short, long, help = "Theme name: dark or light")]
    theme: Option<String>,

    #[arg(long, help = "Append tracing output to this file")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::load()?;

    let log_file = args.log_file.or_else(|| config.log_file.clone());
    logging::init(log_file.as_deref())?;

    let server_url = args
        .server
        .as_deref()
        .unwrap_or_else(|| config.server_url());
    let theme_name = args
        .theme
        .as_deref()
        .or(config.theme.as_deref())
        .unwrap_or("dark");

    let client = ChatServerClient::new(server_url).map_err(|e| e.to_string())?;
    let app = App::new(Theme::from_name(theme_name), config.syntax_enabled());

    run_chat(app, client).await
}
