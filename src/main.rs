use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io::stdout;
use tokio::runtime::Runtime;

mod app;
mod config;
mod error;
mod http;
mod json;
mod notification;
mod query;
mod scroll;
#[cfg(test)]
mod test_utils;
mod theme;
mod widgets;

use app::App;
use error::QueryviewError;
use http::HttpOperation;
use query::QueryScope;

/// Watch backend queries in the terminal
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Terminal viewer for backend queries with loading, error and empty states"
)]
struct Args {
    /// URLs to fetch; relative URLs are joined onto `http.base_url` from the config
    #[arg(required = true)]
    urls: Vec<String>,

    /// Key path projected out of every response, e.g. `items` or `data.results[0]`
    #[arg(long)]
    accessor: Option<String>,

    /// Show the empty view when every response is empty
    #[arg(long)]
    show_empty: bool,
}

fn main() -> Result<()> {
    // Writes to /tmp/queryview-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    {
        use std::io::Write;

        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/queryview-debug.log")?;

        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .format(|buf, record| {
                use std::time::SystemTime;
                let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
                writeln!(
                    buf,
                    "[{}] [{}] {}",
                    datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            })
            .init();

        log::debug!("=== QUERYVIEW DEBUG SESSION STARTED ===");
    }

    color_eyre::install()?;

    let config_result = config::load_config();

    let args = Args::parse();

    let runtime = build_runtime()?;
    let client = http::build_client(&config_result.config.http)?;

    // Executors spawn onto this runtime; the UI loop stays on the main thread
    let scope = QueryScope::new(runtime.handle().clone());
    let mut app = App::new(scope, &config_result.config, args.show_empty);
    for url in &args.urls {
        let operation = HttpOperation::get(client.clone(), &config_result.config.http, url);
        app.add_source(url.clone(), operation, args.accessor.as_deref());
    }

    let terminal = init_terminal()?;
    let result = run(terminal, app, config_result.warning);
    restore_terminal()?;
    result?;

    runtime.shutdown_background();

    #[cfg(debug_assertions)]
    log::debug!("=== QUERYVIEW DEBUG SESSION ENDED ===");

    Ok(())
}

fn build_runtime() -> Result<Runtime, QueryviewError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?)
}

/// Initialize terminal with raw mode and alternate screen
fn init_terminal() -> Result<DefaultTerminal> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = execute!(stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        hook(info);
    }));

    enable_raw_mode()?;

    // If any subsequent operations fail, ensure raw mode is disabled
    if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }

    match ratatui::Terminal::new(ratatui::backend::CrosstermBackend::new(stdout())) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = execute!(stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            Err(e.into())
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    let _ = execute!(stdout(), LeaveAlternateScreen);
    disable_raw_mode()?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, mut app: App, config_warning: Option<String>) -> Result<App> {
    if let Some(warning) = config_warning {
        app.notification.show_warning(&warning);
    }

    loop {
        if app.should_render() {
            terminal.draw(|frame| app.render(frame))?;
            app.clear_dirty();
        }

        app.handle_events()?;

        if app.should_quit() {
            break;
        }
    }

    Ok(app)
}
