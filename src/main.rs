mod adder;
mod app;
mod clipboard;
mod config;
mod notify;
mod password;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use clipboard::SystemClipboard;
use config::AppConfig;
use notify::DesktopNotifier;
use password::{PasswordOptions, PasswordState};

#[derive(Parser, Debug)]
#[command(name = "pocketkit")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "A terminal pocket toolkit: a two-field adder and a password generator")]
#[command(group(ArgGroup::new("mode").args(["generate", "add"]).multiple(false)))]
struct Args {
    /// Print a generated password and exit
    #[arg(short, long)]
    generate: bool,

    /// Password length (6-32, out-of-range values are clamped)
    #[arg(short, long)]
    length: Option<usize>,

    /// Include numbers
    #[arg(long)]
    digits: bool,

    /// Include special characters
    #[arg(long)]
    symbols: bool,

    /// Leave out letters
    #[arg(long)]
    no_letters: bool,

    /// Also copy the generated password to the clipboard
    #[arg(long, requires = "generate")]
    copy: bool,

    /// Add two numbers and print the result
    #[arg(short, long, num_args = 2, value_names = ["FIRST", "SECOND"], allow_hyphen_values = true, conflicts_with = "generate")]
    add: Option<Vec<String>>,

    /// Output as JSON (with --generate or --add)
    #[arg(long, requires = "mode")]
    json: bool,

    /// Use this config file instead of the default
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Config defaults with command-line overrides applied
    fn password_options(&self, config: &AppConfig) -> PasswordOptions {
        let mut options = config.password.to_options();
        if let Some(length) = self.length {
            options.length = password::clamp_length(length);
        }
        options.digits |= self.digits;
        options.symbols |= self.symbols;
        if self.no_letters {
            options.letters = false;
        }
        options
    }
}

fn main() -> Result<()> {
    // Initialize logging (stderr keeps the TUI and piped output clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load().unwrap_or_default(),
    };

    // Handle CLI-only commands
    if let Some(operands) = &args.add {
        return print_sum(operands, args.json);
    }

    if args.generate {
        return print_password(&args, &config);
    }

    // Run TUI
    run_tui(&config)
}

fn print_sum(operands: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&sum_json(operands))?);
    } else {
        println!("{}", adder::format_number(add_operands(operands)));
    }
    Ok(())
}

fn add_operands(operands: &[String]) -> f64 {
    let mut adder = adder::AdderState::new();
    adder.set_first_operand(operands[0].as_str());
    adder.set_second_operand(operands[1].as_str());
    adder.add()
}

/// `{"first", "second", "sum"}`
fn sum_json(operands: &[String]) -> serde_json::Value {
    let sum = add_operands(operands);

    // JSON has no NaN/Infinity, so non-finite sums go out as strings
    let sum_value = if sum.is_finite() {
        serde_json::json!(sum)
    } else {
        serde_json::json!(adder::format_number(sum))
    };

    serde_json::json!({
        "first": operands[0],
        "second": operands[1],
        "sum": sum_value,
    })
}

fn print_password(args: &Args, config: &AppConfig) -> Result<()> {
    let state = PasswordState::new(args.password_options(config));

    if args.json {
        println!("{}", serde_json::to_string(&password_json(&state)?)?);
    } else {
        println!("{}", state.password());
    }

    // Printed first: on Linux the copy holds the clipboard until replaced
    if args.copy {
        let mut clipboard = SystemClipboard::until_replaced();
        let notifier = DesktopNotifier::new(config.notifications);
        state
            .copy_to_clipboard(&mut clipboard, &notifier)
            .context("Could not copy password")?;
    }
    Ok(())
}

/// `{"password", "length", "digits", "letters", "symbols"}`
fn password_json(state: &PasswordState) -> Result<serde_json::Value> {
    let mut output = serde_json::to_value(state.options())?;
    output["password"] = serde_json::json!(state.password());
    Ok(output)
}

fn run_tui(config: &AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    tracing::info!("Starting pocketkit TUI");

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        // 'q' is text while typing into the adder
                        KeyCode::Char('q') if app.popup == Popup::None && !app.is_editing() => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.set_status(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        app.tick();
    }
}
