use letterwheel::layout::{InteractionState, LETTER_COUNT};
use letterwheel::ports::{PresentationPort, StartControlMode};
use letterwheel::validator::{Field, TimeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterView {
    pub state: InteractionState,
    pub enabled: bool,
}

/// What the terminal currently shows; the widget renders straight from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub timer: String,
    pub letters: Vec<LetterView>,
    pub control: StartControlMode,
    pub min_error: bool,
    pub max_error: bool,
    pub notice_open: bool,
    pub error: Option<String>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            timer: "00:00".to_string(),
            letters: vec![
                LetterView {
                    state: InteractionState::Disabled,
                    enabled: false,
                };
                LETTER_COUNT
            ],
            control: StartControlMode::Start,
            min_error: false,
            max_error: false,
            notice_open: false,
            error: None,
        }
    }
}

impl Board {
    pub fn field_error(&self, field: Field) -> bool {
        match field {
            Field::Min => self.min_error,
            Field::Max => self.max_error,
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

impl PresentationPort for Board {
    fn render_timer(&mut self, text: &str) {
        self.timer = text.to_string();
    }

    fn set_element_visual_state(&mut self, index: usize, state: InteractionState) {
        if let Some(letter) = self.letters.get_mut(index) {
            letter.state = state;
        }
    }

    fn set_element_enabled(&mut self, index: usize, enabled: bool) {
        if let Some(letter) = self.letters.get_mut(index) {
            letter.enabled = enabled;
        }
    }

    fn set_start_control_mode(&mut self, mode: StartControlMode) {
        self.control = mode;
    }

    fn mark_field_error(&mut self, field: Field, errored: bool) {
        match field {
            Field::Min => self.min_error = errored,
            Field::Max => self.max_error = errored,
        }
    }

    fn show_end_of_game_notice(&mut self) {
        self.notice_open = true;
    }

    fn close_end_of_game_notice(&mut self) {
        self.notice_open = false;
    }

    fn show_error_notice(&mut self, error: &TimeError) {
        self.error = Some(error.notice().to_string());
    }
}
