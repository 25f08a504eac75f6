use crate::config::{Config, Palette};
use crate::store::{SettingsPatch, Store, TaskPatch, TimerType};
use crate::theme::ThemeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Timer,
    Tasks,
    Report,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    AddingTask,
    CustomStart,
    EditingDuration(TimerType),
    /// Editing the selected task's pomodoro target.
    EditingTarget(u64),
}

/// UI shell around the store: current view, input modes, selection. All
/// timer semantics live in [`Store`]; this layer only gates affordances
/// and funnels key input into store commands.
pub struct App {
    pub store: Store,
    pub theme: ThemeRecord,
    pub config: Config,
    pub view: View,
    pub mode: AppMode,
    pub input_buffer: String,
    pub selected_task: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Store, theme: ThemeRecord, config: Config) -> Self {
        Self {
            store,
            theme,
            config,
            view: View::Timer,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            selected_task: 0,
            should_quit: false,
        }
    }

    pub fn palette(&self) -> &Palette {
        self.config.palette(self.theme.theme)
    }

    pub fn cycle_view(&mut self) {
        self.view = match self.view {
            View::Timer => View::Tasks,
            View::Tasks => View::Report,
            View::Report => View::Timer,
        };
    }

    /// Space bar: start when idle, pause when counting, resume when paused.
    pub fn toggle_timer(&mut self) {
        if self.store.is_active() {
            self.store.pause_timer();
        } else if self.store.is_paused {
            self.store.resume_timer();
        } else {
            self.store.start_timer(None);
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_task = self.selected_task.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if !self.store.tasks.is_empty() {
            self.selected_task = (self.selected_task + 1).min(self.store.tasks.len() - 1);
        }
    }

    /// Enter on the task list: make the selected task current, or clear
    /// the pointer when it already is.
    pub fn toggle_selected_as_current(&mut self) {
        if let Some(task) = self.store.tasks.get(self.selected_task) {
            if self.store.current_task_id == Some(task.id) {
                self.store.set_current_task(None, None);
            } else {
                let (id, name) = (task.id, task.name.clone());
                self.store.set_current_task(Some(id), Some(name));
            }
        }
    }

    pub fn delete_selected_task(&mut self) {
        if let Some(task) = self.store.tasks.get(self.selected_task) {
            let id = task.id;
            self.store.delete_task(id);
            if !self.store.tasks.is_empty() && self.selected_task >= self.store.tasks.len() {
                self.selected_task = self.store.tasks.len() - 1;
            }
        }
    }

    pub fn handle_char(&mut self, c: char) {
        match self.mode.clone() {
            AppMode::AddingTask => {
                if c == '\n' {
                    // Trimming happens here, at the input boundary; the
                    // registry stores what it is given.
                    let name = self.input_buffer.trim().to_string();
                    if !name.is_empty() {
                        self.store.add_task(name, None);
                        self.selected_task = self.store.tasks.len() - 1;
                    }
                    self.input_buffer.clear();
                    self.mode = AppMode::Normal;
                } else {
                    self.input_buffer.push(c);
                }
            }
            AppMode::CustomStart => {
                if c == '\n' {
                    if let Ok(minutes) = self.input_buffer.parse::<i64>() {
                        if minutes > 0 {
                            self.store.start_timer(Some(minutes));
                        }
                    }
                    self.input_buffer.clear();
                    self.mode = AppMode::Normal;
                } else if c.is_numeric() {
                    self.input_buffer.push(c);
                }
            }
            AppMode::EditingDuration(phase) => {
                if c == '\n' {
                    if let Ok(minutes) = self.input_buffer.parse::<i64>() {
                        // Non-positive lengths would start already expired;
                        // guard here rather than in the engine.
                        if minutes > 0 {
                            let mut patch = SettingsPatch::default();
                            match phase {
                                TimerType::Work => patch.work_duration = Some(minutes),
                                TimerType::ShortBreak => {
                                    patch.short_break_duration = Some(minutes)
                                }
                                TimerType::LongBreak => patch.long_break_duration = Some(minutes),
                            }
                            self.store.update_settings(patch);
                        }
                    }
                    self.input_buffer.clear();
                    self.mode = AppMode::Normal;
                } else if c.is_numeric() {
                    self.input_buffer.push(c);
                }
            }
            AppMode::EditingTarget(task_id) => {
                if c == '\n' {
                    if let Ok(target) = self.input_buffer.parse::<u32>() {
                        if target > 0 {
                            self.store.update_task(
                                task_id,
                                TaskPatch {
                                    target_pomodoros: Some(target),
                                    ..Default::default()
                                },
                            );
                        }
                    }
                    self.input_buffer.clear();
                    self.mode = AppMode::Normal;
                } else if c.is_numeric() {
                    self.input_buffer.push(c);
                }
            }
            AppMode::Normal => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        if self.mode != AppMode::Normal {
            self.input_buffer.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.mode = AppMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Store::default(), ThemeRecord::default(), Config::default())
    }

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_char(c);
        }
        app.handle_char('\n');
    }

    #[test]
    fn adding_task_trims_at_the_input_boundary() {
        let mut app = app();
        app.mode = AppMode::AddingTask;
        type_line(&mut app, "  Deep work  ");
        assert_eq!(app.store.tasks.len(), 1);
        assert_eq!(app.store.tasks[0].name, "Deep work");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn blank_task_name_is_rejected() {
        let mut app = app();
        app.mode = AppMode::AddingTask;
        type_line(&mut app, "   ");
        assert!(app.store.tasks.is_empty());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn custom_start_parses_minutes() {
        let mut app = app();
        app.mode = AppMode::CustomStart;
        type_line(&mut app, "10");
        assert!(app.store.is_running);
        assert_eq!(app.store.duration, 600);
    }

    #[test]
    fn custom_start_ignores_non_digits_and_zero() {
        let mut app = app();
        app.mode = AppMode::CustomStart;
        type_line(&mut app, "0x");
        assert!(!app.store.is_running);
    }

    #[test]
    fn duration_edit_patches_only_the_chosen_phase() {
        let mut app = app();
        app.mode = AppMode::EditingDuration(TimerType::ShortBreak);
        type_line(&mut app, "7");
        assert_eq!(app.store.short_break_duration, 7);
        assert_eq!(app.store.work_duration, 25);
        assert_eq!(app.store.long_break_duration, 15);
    }

    #[test]
    fn target_edit_patches_the_selected_task() {
        let mut app = app();
        app.store.add_task("Read".to_string(), None);
        let id = app.store.tasks[0].id;
        app.mode = AppMode::EditingTarget(id);
        type_line(&mut app, "12");
        assert_eq!(app.store.tasks[0].target_pomodoros, 12);
        assert_eq!(app.store.tasks[0].name, "Read");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn toggle_walks_start_pause_resume() {
        let mut app = app();
        app.toggle_timer();
        assert!(app.store.is_active());
        app.toggle_timer();
        assert!(app.store.is_paused);
        app.toggle_timer();
        assert!(app.store.is_active());
    }

    #[test]
    fn selecting_the_current_task_again_clears_it() {
        let mut app = app();
        app.store.add_task("Read".to_string(), None);
        app.toggle_selected_as_current();
        assert_eq!(app.store.current_task_id, Some(app.store.tasks[0].id));
        assert_eq!(app.store.current_task_name.as_deref(), Some("Read"));
        app.toggle_selected_as_current();
        assert_eq!(app.store.current_task_id, None);
        assert_eq!(app.store.current_task_name, None);
    }

    #[test]
    fn deleting_last_task_moves_selection_back() {
        let mut app = app();
        app.store.add_task("One".to_string(), None);
        app.store.add_task("Two".to_string(), None);
        app.selected_task = 1;
        app.delete_selected_task();
        assert_eq!(app.store.tasks.len(), 1);
        assert_eq!(app.selected_task, 0);
    }
}
