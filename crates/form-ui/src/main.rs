//! house-form - Terminal form for interactive price prediction.

mod app;
mod event;
mod ui;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use artifact_store::{ArtifactPaths, ArtifactState};
use regressor::EvaluationReport;

use app::App;
use event::{handle_key_event, poll_event};
use ui::draw_ui;

#[derive(Parser)]
#[command(name = "house-form")]
#[command(about = "Interactive housing price prediction form", long_about = None)]
struct Args {
    /// Directory holding the frozen artifact bundle
    #[arg(long, default_value = "models")]
    model_dir: PathBuf,

    /// Directory with the trainer's evaluation outputs
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,
}

fn load_evaluation(path: &std::path::Path) -> Option<EvaluationReport> {
    let file = File::open(path).ok()?;
    serde_json::from_reader(file).ok()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let artifacts = ArtifactState::load(&ArtifactPaths::new(&args.model_dir));
    let evaluation = load_evaluation(&args.output_dir.join("evaluation.json"));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(artifacts, evaluation);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        // Draw UI
        terminal.draw(|frame| draw_ui(frame, app))?;

        // Clear expired status messages
        app.clear_expired_status();

        // Handle events
        if let Some(event) = poll_event(tick_rate)? {
            match event {
                Event::Key(key) => handle_key_event(app, key),
                Event::Resize(_, _) => {} // Terminal will redraw automatically
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
