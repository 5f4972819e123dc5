use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use formula::adapters::SystemClipboard;
use formula::app::{App, AppMessage};
use formula::cli::{parse_args, run_cli_command, CliCommand};
use formula::config::ConfigFile;
use formula::host::FormulaHost;
use formula::terminal::{setup_panic_hook, TerminalManager};
use formula::{logging, ui};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args());
    if let Some(result) = run_cli_command(&command) {
        return result;
    }
    let CliCommand::Run { config } = command else {
        return Ok(());
    };

    logging::init();

    let path = ConfigFile::resolve_path(config);
    let config_file = ConfigFile::load_or_demo(path.as_deref())?;
    let host = build_host(&config_file)?;
    info!(inputs = host.len(), config = ?path, "Starting formula editor");

    setup_panic_hook();
    let mut app = App::new(host, Arc::new(SystemClipboard::new()));

    let mut manager = TerminalManager::new()?;
    let result = run_app(&mut manager, &mut app).await;
    manager.restore()?;
    drop(manager);
    result?;

    for (mount, value) in app.values() {
        println!("{mount}: {value}");
    }
    Ok(())
}

/// Mount every configured input and apply its initial formula.
fn build_host(config_file: &ConfigFile) -> Result<FormulaHost> {
    let expander = Arc::new(config_file.expander());
    let mut host = FormulaHost::new();

    for input in &config_file.inputs {
        let formula = host.mount(input.id.clone(), input.to_formula_config(expander.clone()))?;
        if let Some(initial) = &input.initial {
            formula.set(initial);
        }
    }

    if let Some(first) = config_file.inputs.first() {
        host.focus(&first.id)?;
    } else {
        warn!("Configuration declares no inputs");
    }
    Ok(host)
}

async fn run_app(manager: &mut TerminalManager, app: &mut App) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut message_rx: Option<mpsc::UnboundedReceiver<AppMessage>> = app.message_rx.take();

    loop {
        if app.needs_redraw {
            manager.terminal().draw(|frame| ui::render(frame, app))?;
            app.needs_redraw = false;
        }

        // Coalesce redraws while events arrive faster than a frame
        let timeout = tokio::time::sleep(Duration::from_millis(16));

        tokio::select! {
            _ = timeout => {}

            event = event_stream.next() => {
                match event {
                    Some(Ok(Event::Key(key))) => app.handle_key_event(key),
                    Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse),
                    Some(Ok(Event::Paste(text))) => app.handle_paste(&text),
                    Some(Ok(Event::Resize(_, _))) => app.mark_dirty(),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => app.should_quit = true,
                }
            }

            message = async {
                match &mut message_rx {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                if let Some(message) = message {
                    app.handle_message(message);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
