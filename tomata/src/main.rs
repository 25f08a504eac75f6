use anyhow::Result;
use std::io;
use std::sync::mpsc;
use std::time::Instant;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod persistence;
mod report;
mod store;
mod theme;
mod ui;

use app::{App, AppMode, View};
use persistence::Persistence;
use store::{EndSoundType, QuoteSettingsPatch, SoundSettingsPatch, Store, TimerType};
use tomata_clock::{Clock, Tick};

const QUOTES: [&str; 6] = [
    "Small steps, every day.",
    "Done is better than perfect.",
    "Focus is a muscle.",
    "One pomodoro at a time.",
    "The best time to start was now.",
    "Rest is part of the work.",
];

fn main() -> Result<()> {
    let persistence = Persistence::new()?;
    init_tracing(&persistence)?;

    let config = config::load_config()?;
    let store = persistence.load_store();
    let theme = persistence.load_theme();
    let mut app = App::new(store, theme, config);

    // The clock thread keeps ticking while the event loop is busy. If it
    // cannot be spawned we degrade to resampling from the loop itself.
    let (tick_tx, tick_rx) = mpsc::channel();
    let clock = match Clock::spawn(tick_tx) {
        Ok(clock) => Some(clock),
        Err(e) => {
            warn!("background clock unavailable, falling back to loop ticks: {e}");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, clock.as_ref(), &tick_rx, &persistence);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    persistence.save_store(&app.store)?;
    persistence.save_theme(&app.theme)?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn init_tracing(persistence: &Persistence) -> Result<()> {
    // Stdout belongs to the TUI; logs go to a file in the data dir.
    let log_file = std::fs::File::create(persistence.data_dir().join("tomata.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    clock: Option<&Clock>,
    tick_rx: &mpsc::Receiver<Tick>,
    persistence: &Persistence,
) -> Result<()> {
    let mut last_save = Instant::now();
    let mut clock_armed = false;

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Drain whatever the clock delivered; each tick is only a prod to
        // re-sample the deadline, so draining a burst is harmless.
        for _ in tick_rx.try_iter() {
            if let Some(finished) = app.store.tick() {
                on_completion(&app.store, finished);
            }
        }
        if clock.is_none() {
            if let Some(finished) = app.store.tick() {
                on_completion(&app.store, finished);
            }
        }

        // Mirror the engine state onto the clock: armed exactly while a
        // countdown is live.
        let active = app.store.is_active();
        if active != clock_armed {
            if let Some(clock) = clock {
                if active {
                    clock.start();
                } else {
                    clock.stop();
                }
            }
            clock_armed = active;
        }

        // Auto-save every 5 seconds
        if last_save.elapsed().as_secs() > 5 {
            persistence.save_store(&app.store)?;
            persistence.save_theme(&app.theme)?;
            last_save = Instant::now();
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.mode {
                        AppMode::Normal => match key.code {
                            KeyCode::Char('q') => app.should_quit = true,
                            KeyCode::Tab => app.cycle_view(),
                            KeyCode::Char(' ') => app.toggle_timer(),
                            KeyCode::Char('s') => app.store.start_timer(None),
                            KeyCode::Char('c') => {
                                app.mode = AppMode::CustomStart;
                                app.input_buffer.clear();
                            }
                            KeyCode::Char('r') => app.store.reset_timer(),
                            KeyCode::Char('1') => app.store.set_timer_type(TimerType::Work),
                            KeyCode::Char('2') => app.store.set_timer_type(TimerType::ShortBreak),
                            KeyCode::Char('3') => app.store.set_timer_type(TimerType::LongBreak),
                            KeyCode::Char('w') => {
                                app.mode = AppMode::EditingDuration(TimerType::Work);
                                app.input_buffer.clear();
                            }
                            KeyCode::Char('b') => {
                                app.mode = AppMode::EditingDuration(TimerType::ShortBreak);
                                app.input_buffer.clear();
                            }
                            KeyCode::Char('l') => {
                                app.mode = AppMode::EditingDuration(TimerType::LongBreak);
                                app.input_buffer.clear();
                            }
                            KeyCode::Char('m') => {
                                let enabled = !app.store.sound_enabled;
                                app.store.update_sound_settings(SoundSettingsPatch {
                                    sound_enabled: Some(enabled),
                                    ..Default::default()
                                });
                            }
                            KeyCode::Char('e') => {
                                let next = next_end_sound(app.store.end_sound_type);
                                app.store.update_sound_settings(SoundSettingsPatch {
                                    end_sound_type: Some(next),
                                    ..Default::default()
                                });
                            }
                            KeyCode::Char('Q') => {
                                let enabled = !app.store.quotes_enabled;
                                app.store.update_quote_settings(QuoteSettingsPatch {
                                    quotes_enabled: Some(enabled),
                                });
                            }
                            KeyCode::Char('t') => app.theme.toggle(),
                            KeyCode::Char('a') if app.view == View::Tasks => {
                                app.mode = AppMode::AddingTask;
                                app.input_buffer.clear();
                            }
                            KeyCode::Char('d') if app.view == View::Tasks => {
                                app.delete_selected_task()
                            }
                            KeyCode::Enter if app.view == View::Tasks => {
                                app.toggle_selected_as_current()
                            }
                            KeyCode::Char('g') if app.view == View::Tasks => {
                                if let Some(task) = app.store.tasks.get(app.selected_task) {
                                    app.mode = AppMode::EditingTarget(task.id);
                                    app.input_buffer.clear();
                                }
                            }
                            KeyCode::Up | KeyCode::Char('k') if app.view == View::Tasks => {
                                app.move_selection_up()
                            }
                            KeyCode::Down | KeyCode::Char('j') if app.view == View::Tasks => {
                                app.move_selection_down()
                            }
                            _ => {}
                        },
                        _ => match key.code {
                            KeyCode::Esc => app.cancel_input(),
                            KeyCode::Enter => app.handle_char('\n'),
                            KeyCode::Backspace => app.handle_backspace(),
                            KeyCode::Char(c) => app.handle_char(c),
                            _ => {}
                        },
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn next_end_sound(current: EndSoundType) -> EndSoundType {
    match current {
        EndSoundType::Jingle => EndSoundType::Birds,
        EndSoundType::Birds => EndSoundType::Ring,
        EndSoundType::Ring => EndSoundType::None,
        EndSoundType::None => EndSoundType::Jingle,
    }
}

/// Freedesktop sound names for the configured end-of-session sound.
fn sound_name(sound: EndSoundType) -> Option<&'static str> {
    match sound {
        EndSoundType::Jingle => Some("complete"),
        EndSoundType::Birds => Some("message"),
        EndSoundType::Ring => Some("alarm-clock-elapsed"),
        EndSoundType::None => None,
    }
}

/// The store has no opinion on sounds or quote content; it only raises
/// the completion and carries the flags. This is the subscriber.
fn on_completion(store: &Store, finished: TimerType) {
    info!(phase = finished.label(), "timer completed");
    let (summary, body) = match finished {
        TimerType::Work => {
            let body = if store.quotes_enabled {
                QUOTES[store.total_completed as usize % QUOTES.len()].to_string()
            } else {
                "Time for a break.".to_string()
            };
            ("Pomodoro complete", body)
        }
        TimerType::ShortBreak | TimerType::LongBreak => {
            ("Break over", "Back to work.".to_string())
        }
    };

    let mut notification = notify_rust::Notification::new();
    notification.summary(summary).body(&body).appname("tomata");
    if store.sound_enabled {
        if let Some(name) = sound_name(store.end_sound_type) {
            notification.sound_name(name);
        }
    }
    if let Err(e) = notification.show() {
        warn!("failed to send notification: {e}");
    }
}
