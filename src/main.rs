use clap::Parser;
use std::error::Error;

use charla::core::config::Config;
use charla::logging;
use charla::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "charla")]
#[command(about = "A full-screen terminal chat widget for a remote conversational endpoint")]
#[command(
    long_about = "Charla is a full-screen terminal chat widget. It collects a typed message, \
forwards it to a remote conversational endpoint, renders the exchange, and persists the \
visible transcript across restarts.\n\n\
Controls:\n\
  Type              Enter your message in the compose box\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a line break without sending\n\
  PageUp/PageDown   Scroll through the transcript (mouse wheel works too)\n\
  Ctrl+L            Clear the transcript (asks for confirmation)\n\
  Ctrl+C            Quit"
)]
struct Args {
    /// Chat endpoint URL (overrides the config file)
    #[arg(short, long, value_name = "URL")]
    endpoint: Option<String>,

    /// Session identifier sent with every request (overrides the config file)
    #[arg(short, long, value_name = "ID")]
    session_id: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(short, long, value_name = "FILE")]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    logging::init(args.log.as_deref())?;

    let mut config = Config::load()?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }
    if let Some(session_id) = args.session_id {
        config.session_id = Some(session_id);
    }

    run_chat(config).await
}
