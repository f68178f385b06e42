use anyhow::Result;
use clap::Parser;

mod app;
mod backend;
mod cli;
mod config;
mod handler;
mod message;
mod provider;
mod tui;
mod ui;

use app::App;
use backend::BackendClient;
use cli::Args;
use config::Config;
use provider::Provider;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load().unwrap_or_default();

    let backend_url = config::resolve_backend_url(args.backend, &config);
    let provider = args
        .provider
        .as_deref()
        .or(config.provider.as_deref())
        .map(Provider::from_id)
        .unwrap_or_default();

    let mut app = App::new(BackendClient::new(&backend_url), provider);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run(&mut terminal, &mut events, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, events: &mut tui::EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }

        app.poll_response().await;
    }

    // Quitting aborts any in-flight request so a late reply cannot
    // land after the terminal is torn down.
    app.abort_pending();
    Ok(())
}
