use crate::app::{App, AppMode, View};
use crate::report;
use crate::store::TimerType;
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
    Frame,
};

/// `MM:SS` countdown face; minutes are not capped.
pub fn format_countdown(seconds: i64) -> String {
    let secs = seconds.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.palette().background)),
        area,
    );
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    match app.view {
        View::Timer => draw_timer(f, chunks[1], app),
        View::Tasks => draw_tasks(f, chunks[1], app),
        View::Report => draw_report(f, chunks[1], app),
    }
    draw_status_bar(f, chunks[2], app);

    match &app.mode {
        AppMode::AddingTask => draw_input_overlay(f, "New Task", app),
        AppMode::CustomStart => draw_input_overlay(f, "Start Timer (minutes)", app),
        AppMode::EditingDuration(phase) => {
            draw_input_overlay(f, &format!("{} length (minutes)", phase.label()), app)
        }
        AppMode::EditingTarget(_) => draw_input_overlay(f, "Pomodoro target", app),
        AppMode::Normal => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.palette();
    let icons = &app.config.icons;
    let tab = |view: View, icon: &str, label: &str| {
        let style = if app.view == view {
            Style::default()
                .fg(theme.selection)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.gray)
        };
        Span::styled(format!(" {} {} ", icon, label), style)
    };
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "TOMATA",
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
        Span::raw("  "),
        tab(View::Timer, &icons.timer, "Timer"),
        tab(View::Tasks, &icons.task_list, "Tasks"),
        tab(View::Report, &icons.report, "Report"),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.surface)),
        ),
        area,
    );
}

fn draw_timer(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.palette();
    let icons = &app.config.icons;
    let store = &app.store;

    let state_icon = if store.is_active() {
        &icons.play
    } else if store.is_paused {
        &icons.pause
    } else {
        &icons.stop
    };
    let block = Block::default()
        .title(Span::styled(
            format!(" {} {} ", icons.timer, store.timer_type.label()),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let phase_tabs = Line::from(
        [TimerType::Work, TimerType::ShortBreak, TimerType::LongBreak]
            .iter()
            .enumerate()
            .map(|(i, phase)| {
                let style = if store.timer_type == *phase {
                    Style::default()
                        .fg(theme.selection)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.gray)
                };
                Span::styled(format!(" {}:{} ", i + 1, phase.label()), style)
            })
            .collect::<Vec<_>>(),
    );
    f.render_widget(
        Paragraph::new(phase_tabs).alignment(Alignment::Center),
        v_chunks[0],
    );

    f.render_widget(
        Paragraph::new(format!(
            "{} {}",
            state_icon,
            format_countdown(store.current_time)
        ))
        .style(
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center),
        v_chunks[1],
    );

    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(theme.blue).bg(theme.surface))
            .percent((store.progress() * 100.0) as u16),
        v_chunks[2],
    );

    let task_line = match &store.current_task_name {
        Some(name) => Line::from(vec![
            Span::styled(
                format!("{} ", icons.current),
                Style::default().fg(theme.cyan),
            ),
            Span::styled(name.clone(), Style::default().fg(theme.foreground)),
        ]),
        None => Line::from(Span::styled(
            "no task selected",
            Style::default().fg(theme.gray),
        )),
    };
    f.render_widget(
        Paragraph::new(task_line).alignment(Alignment::Center),
        v_chunks[3],
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} done", store.total_completed),
                Style::default().fg(theme.green),
            ),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} {} day streak (best {})",
                    icons.streak, store.current_streak, store.longest_streak
                ),
                Style::default().fg(theme.magenta),
            ),
        ]))
        .alignment(Alignment::Center),
        v_chunks[4],
    );
}

fn draw_tasks(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.palette();
    let icons = &app.config.icons;
    let block = Block::default()
        .title(Span::styled(
            format!(" {} Tasks ", icons.task_list),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if app.store.tasks.is_empty() {
        f.render_widget(
            Paragraph::new("No tasks. Press 'a' to add one.")
                .style(Style::default().fg(theme.gray))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    }

    let constraints: Vec<Constraint> = app
        .store
        .tasks
        .iter()
        .map(|_| Constraint::Length(1))
        .collect();
    let task_chunks = Layout::default().constraints(constraints).split(inner_area);
    for (i, task) in app.store.tasks.iter().enumerate() {
        if let Some(item_area) = task_chunks.get(i) {
            let mut left = vec![if i == app.selected_task {
                Span::styled(icons.select.clone(), Style::default().fg(theme.selection))
            } else {
                Span::raw(" ")
            }];
            left.push(if app.store.current_task_id == Some(task.id) {
                Span::styled(
                    format!(" {} ", icons.current),
                    Style::default().fg(theme.cyan),
                )
            } else {
                Span::raw("   ")
            });
            left.push(Span::styled(
                task.name.clone(),
                Style::default().fg(theme.foreground),
            ));

            let filled = if task.target_pomodoros > 0 {
                (task.completed_pomodoros.min(task.target_pomodoros) as usize * 10)
                    / task.target_pomodoros as usize
            } else {
                0
            };
            let bar = format!(
                "{}{}",
                icons.progress_filled.repeat(filled),
                icons.progress_empty.repeat(10 - filled)
            );
            let right = Span::styled(
                format!(
                    " {}/{} {} ",
                    task.completed_pomodoros, task.target_pomodoros, bar
                ),
                Style::default().fg(theme.cyan),
            );
            if i == app.selected_task {
                f.render_widget(
                    Block::default().style(Style::default().bg(theme.surface)),
                    *item_area,
                );
            }
            f.render_widget(Paragraph::new(Line::from(left)), *item_area);
            f.render_widget(
                Paragraph::new(Line::from(right)).alignment(Alignment::Right),
                *item_area,
            );
        }
    }
}

fn draw_report(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.palette();
    let icons = &app.config.icons;
    let now = Local::now();
    let sessions = &app.store.sessions;

    let block = Block::default()
        .title(Span::styled(
            format!(" {} Report ", icons.report),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let week = report::week_report(sessions, now);
    let overall = report::total_minutes_overall(sessions);
    let this_week = report::total_minutes_this_week(sessions, now);
    let totals = report::task_totals(sessions);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Overall ", Style::default().fg(theme.gray)),
            Span::styled(
                format!("{}h", report::format_hours(overall)),
                Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   This week ", Style::default().fg(theme.gray)),
            Span::styled(
                format!("{}h", report::format_hours(this_week)),
                Style::default()
                    .fg(theme.green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
    ];

    let max_minutes = week
        .days
        .iter()
        .map(|d| d.total_minutes)
        .max()
        .unwrap_or(0)
        .max(60);
    let bar_width = inner_area.width.saturating_sub(24).max(10) as i64;
    let series = [
        theme.blue,
        theme.green,
        theme.yellow,
        theme.magenta,
        theme.cyan,
        theme.red,
    ];
    for day in &week.days {
        let mut spans = vec![Span::styled(
            format!(
                "{:>10}  {}  ",
                day.date.format("%b %d"),
                report::format_minutes(day.total_minutes)
            ),
            if day.date == now.date_naive() {
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.gray)
            },
        )];
        // Stacked per-task segments, colored by legend position.
        for (name, minutes) in &day.by_task {
            let width = (minutes * bar_width / max_minutes).max(1) as usize;
            let idx = week
                .task_names
                .iter()
                .position(|n| n == name)
                .unwrap_or_default();
            spans.push(Span::styled(
                icons.progress_filled.repeat(width),
                Style::default().fg(series[idx % series.len()]),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("{:<24} TIME (HH:MM)", "PROJECT"),
        Style::default()
            .fg(theme.foreground)
            .add_modifier(Modifier::BOLD),
    )));
    for total in &totals {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<24} ", total.name),
                Style::default().fg(theme.foreground),
            ),
            Span::styled(
                report::format_minutes(total.minutes),
                Style::default().fg(theme.cyan),
            ),
        ]));
    }
    if totals.is_empty() {
        lines.push(Line::from(Span::styled(
            "No completed sessions yet.",
            Style::default().fg(theme.gray),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner_area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.palette();
    let (mode_text, mode_color) = match app.mode {
        AppMode::Normal => ("NORMAL", theme.green),
        AppMode::AddingTask => ("INSERT", theme.yellow),
        AppMode::CustomStart => ("START", theme.blue),
        AppMode::EditingDuration(_) => ("LENGTH", theme.blue),
        AppMode::EditingTarget(_) => ("TARGET", theme.blue),
    };
    let help = if app.mode == AppMode::Normal {
        match app.view {
            View::Timer => {
                "space:start/pause │ s:start │ c:custom │ r:reset │ 1/2/3:phase │ w/b/l:lengths │ m:mute │ t:theme │ tab:view │ q:quit"
            }
            View::Tasks => "a:add │ d:del │ enter:current │ g:target │ j/k:move │ tab:view │ q:quit",
            View::Report => "tab:view │ q:quit",
        }
    } else {
        "enter:confirm │ esc:cancel"
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", mode_text),
                Style::default()
                    .bg(mode_color)
                    .fg(theme.background)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(help),
        ]))
        .block(Block::default().style(Style::default().bg(theme.surface).fg(theme.gray))),
        area,
    );
}

fn draw_input_overlay(f: &mut Frame, title: &str, app: &App) {
    let theme = app.palette();
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.yellow))
        .border_type(BorderType::Double)
        .style(Style::default().bg(theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(theme.foreground)),
            Span::styled(
                app.input_buffer.clone(),
                Style::default().fg(theme.foreground),
            ),
            Span::styled(
                &app.config.icons.input_cursor,
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ])),
        inner_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
