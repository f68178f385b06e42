use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the chat backend
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Provider to start with [possible values: chatgpt, grok, openrouter]
    #[arg(short, long)]
    pub provider: Option<String>,
}
