use crate::estimate::{self, validate, Estimate, Field, InputSpec, RawInput};
use crate::tui::theme::ThemeColors;
use std::time::Instant;

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Estimate,
    Sample,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Help,
    Breakdown,
}

pub struct App {
    /// Current form values. Always a valid input.
    pub input: InputSpec,
    /// Values restored by `reset`
    pub defaults: InputSpec,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub edit_buffer: String,
    pub flash_message: Option<(String, Instant)>,
    /// Last prediction. Cleared whenever the form changes.
    pub result: Option<Estimate>,
    pub should_quit: bool,
    pub colors: ThemeColors,
}

impl App {
    pub fn new(defaults: InputSpec, colors: ThemeColors) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        table_state.select(Some(0));

        Self {
            input: defaults,
            defaults,
            table_state,
            current_view: View::Estimate,
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            flash_message: None,
            result: None,
            should_quit: false,
            colors,
        }
    }

    pub fn selected_field(&self) -> Field {
        let idx = self.table_state.selected().unwrap_or(0);
        Field::ALL[idx.min(Field::ALL.len() - 1)]
    }

    pub fn next_row(&mut self) {
        let i = match self.table_state.selected() {
            Some(i) if i + 1 >= Field::ALL.len() => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let i = match self.table_state.selected() {
            Some(0) | None => Field::ALL.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    fn set_input(&mut self, input: InputSpec) {
        if input != self.input {
            self.input = input;
            self.result = None;
        }
    }

    /// Move the selected field to its next or previous value
    pub fn cycle_selected(&mut self, forward: bool) {
        let field = self.selected_field();
        self.set_input(self.input.cycled(field, forward));
    }

    /// Enter on a row: numbers open the editor, everything else cycles forward
    pub fn activate_selected(&mut self) {
        if self.selected_field().is_numeric() {
            self.start_editing();
        } else {
            self.cycle_selected(true);
        }
    }

    pub fn start_editing(&mut self) {
        let field = self.selected_field();
        if !field.is_numeric() {
            return;
        }
        self.edit_buffer = self.input.value_label(field);
        self.input_mode = InputMode::Editing;
    }

    pub fn confirm_edit(&mut self) {
        let field = self.selected_field();
        let mut raw = RawInput::from(&self.input);
        let outcome = raw
            .set_text(field, &self.edit_buffer)
            .map_err(|e| vec![e])
            .and_then(|()| validate(&raw));

        match outcome {
            Ok(input) => {
                self.set_input(input);
                self.edit_buffer.clear();
                self.input_mode = InputMode::Normal;
            }
            Err(errors) => {
                // Stay in the editor so the value can be corrected
                let detail = errors
                    .first()
                    .map(|e| e.problem.to_string())
                    .unwrap_or_default();
                self.show_flash(format!("Invalid {}: {}", field.label(), detail));
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn predict(&mut self) {
        let result = estimate::estimate(&self.input);
        tracing::debug!(days = result.days, total = result.total, "Predicted from form");
        self.show_flash(format!(
            "Predicted: {}",
            crate::output::format_days(result.days)
        ));
        self.result = Some(result);
    }

    pub fn reset(&mut self) {
        self.set_input(self.defaults);
        self.result = None;
        self.show_flash("Reset form to defaults".to_string());
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::Estimate => View::Sample,
            View::Sample => View::Estimate,
        };
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_breakdown(&mut self) {
        if self.result.is_some() {
            self.input_mode = InputMode::Breakdown;
        } else {
            self.show_flash("No estimate yet. Press p to predict".to_string());
        }
    }

    pub fn dismiss_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::{PackageWeight, ShippingMethod};

    fn app() -> App {
        App::new(InputSpec::default(), ThemeColors::dark())
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = app();
        assert_eq!(app.selected_field(), Field::ProductCategory);
        app.previous_row();
        assert_eq!(app.selected_field(), Field::DeliveryType);
        app.next_row();
        assert_eq!(app.selected_field(), Field::ProductCategory);
    }

    #[test]
    fn test_predict_then_change_clears_result() {
        let mut app = app();
        app.predict();
        // Standard 3 + Urban 0 + Sunny 0 + 5kg 0 + Small 0 + 100km 0 - warehouse 1
        assert_eq!(app.result.as_ref().unwrap().days, 2.0);

        app.table_state.select(Some(2));
        app.cycle_selected(true);
        assert_eq!(app.input.shipping_method, ShippingMethod::Express);
        assert!(app.result.is_none());
    }

    #[test]
    fn test_enter_cycles_choice_fields() {
        let mut app = app();
        app.table_state.select(Some(8));
        app.activate_selected();
        assert!(!app.input.warehouse_proximity);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_numeric_field() {
        let mut app = app();
        app.table_state.select(Some(5));
        app.activate_selected();
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.edit_buffer, "5.0");

        app.edit_buffer = "12.5".to_string();
        app.confirm_edit();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.input.package_weight, PackageWeight::new(12.5).unwrap());
    }

    #[test]
    fn test_invalid_edit_keeps_editor_open() {
        let mut app = app();
        app.table_state.select(Some(7));
        app.start_editing();
        app.edit_buffer = "9000".to_string();
        app.confirm_edit();

        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.input.distance.km(), 100);
        let (msg, _) = app.flash_message.as_ref().unwrap();
        assert!(msg.starts_with("Invalid Distance"));
    }

    #[test]
    fn test_cancel_edit_discards_buffer() {
        let mut app = app();
        app.table_state.select(Some(7));
        app.start_editing();
        app.edit_buffer = "250".to_string();
        app.cancel_edit();
        assert_eq!(app.input.distance.km(), 100);
        assert!(app.edit_buffer.is_empty());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut app = app();
        app.table_state.select(Some(3));
        app.cycle_selected(true);
        app.predict();
        app.reset();
        assert_eq!(app.input, InputSpec::default());
        assert!(app.result.is_none());
    }

    #[test]
    fn test_breakdown_needs_result() {
        let mut app = app();
        app.show_breakdown();
        assert_eq!(app.input_mode, InputMode::Normal);
        app.predict();
        app.show_breakdown();
        assert_eq!(app.input_mode, InputMode::Breakdown);
    }

    #[test]
    fn test_toggle_view() {
        let mut app = app();
        app.toggle_view();
        assert_eq!(app.current_view, View::Sample);
        app.toggle_view();
        assert_eq!(app.current_view, View::Estimate);
    }
}
