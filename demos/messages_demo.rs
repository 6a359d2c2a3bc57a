//! Messages Demo: A message pane reflowing around a header and a sidebar.
//!
//! Keys:
//! - `h` toggle the header, `c` toggle the channel list
//! - `t` switch between the dark and light theme
//! - `b` add a batch of 50 lines (one repaint)
//! - `x` clear the pane
//! - `q` or Escape quit
//!
//! A line is also added every half second. Pass a TOML config path as the
//! first argument to override the defaults; logs go to `messages_demo.log`
//! unless the config names another file.

use atoms::layout::Dimension;
use atoms::{
    init_logging, Config, EventKind, Geometry, Manager, Messages, Patch, Source, TerminalDisplay,
    ThemeData, VisualState,
};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, terminal};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Raw mode and alternate screen, restored on drop.
struct TerminalSession;

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(PathBuf::from(path))?,
        None => Config::default(),
    };
    if config.logging.file.is_none() {
        config.logging.file = Some(PathBuf::from("messages_demo.log"));
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_logging(&config.logging)?;

    let _session = TerminalSession::enter()?;
    let mut manager = Manager::new(TerminalDisplay::stdout()?, config.theme.clone());

    let header = manager.add_atom(
        "header",
        VisualState {
            geometry: Geometry {
                height: Dimension::cells(3),
                ..Geometry::default()
            },
            style: config.theme.component("header").style(),
            content: concat!(
                "{bold} atoms{/bold} messages demo\n",
                " h header  c channels  t theme  b batch  x clear  q quit",
            )
            .to_string(),
        },
        false,
    )?;
    let channels = manager.add_atom(
        "channels",
        VisualState {
            geometry: Geometry {
                width: Dimension::percent(25.0),
                height: Dimension::relative(100.0, -3),
                ..Geometry::default()
            },
            style: config.theme.component("channels").style(),
            content: "{underline}channels{/underline}\n# general\n# random\n# rust".to_string(),
        },
        false,
    )?;
    manager.update_on(header, Source::App, EventKind::ThemeChanged, Patch::themed("header"))?;
    manager.update_on(channels, Source::App, EventKind::ThemeChanged, Patch::themed("channels"))?;
    let input = manager.add_atom(
        "input",
        VisualState {
            geometry: Geometry {
                top: Dimension::relative(100.0, -3),
                height: Dimension::cells(3),
                ..Geometry::default()
            },
            style: config.theme.component("input").style(),
            content: " > press b for a batch of 50 lines".to_string(),
        },
        true,
    )?;
    manager.update_on(input, Source::App, EventKind::ThemeChanged, Patch::themed("input"))?;

    let mut messages = Messages::create(&mut manager, &config)?;
    messages.init(&mut manager)?;

    let mut added = 0_usize;
    manager.on(EventKind::MessageAdded, move |_| {
        added += 1;
        tracing::trace!(added, "message observed");
    });

    messages.add_message(&mut manager, "{green-fg}connected{/green-fg}")?;

    let tick = Duration::from_millis(500);
    let mut last_tick = Instant::now();
    let mut counter = 0_u32;

    loop {
        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('h') => manager.toggle(header)?,
                    KeyCode::Char('c') => manager.toggle(channels)?,
                    KeyCode::Char('t') => {
                        let next = if manager.theme().name == "dark" {
                            ThemeData::light()
                        } else {
                            ThemeData::dark()
                        };
                        manager.set_theme(next)?;
                    }
                    KeyCode::Char('b') => {
                        let batch: Vec<String> = (0..50)
                            .map(|i| format!("{{cyan-fg}}batch{{/cyan-fg}} line {i}"))
                            .collect();
                        messages.bulk_add_messages(&mut manager, batch)?;
                    }
                    KeyCode::Char('x') => messages.clear_messages(&mut manager)?,
                    _ => {}
                },
                TermEvent::Resize(width, height) => {
                    manager.display_mut().resize(width, height);
                    manager.render(messages.id())?;
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            counter += 1;
            messages.add_message(&mut manager, format!("tick {counter}"))?;
            last_tick = Instant::now();
        }
    }

    Ok(())
}
