use crate::layout::InteractionState;
use crate::validator::{Field, TimeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum StartControlMode {
    Start,
    Stop,
}

/// Everything the game core asks the screen to do.
pub trait PresentationPort {
    fn render_timer(&mut self, text: &str);
    fn set_element_visual_state(&mut self, index: usize, state: InteractionState);
    fn set_element_enabled(&mut self, index: usize, enabled: bool);
    fn set_start_control_mode(&mut self, mode: StartControlMode);
    fn mark_field_error(&mut self, field: Field, errored: bool);
    /// The acknowledgement comes back through `GameController::acknowledge_notice`.
    fn show_end_of_game_notice(&mut self);
    fn close_end_of_game_notice(&mut self);
    fn show_error_notice(&mut self, error: &TimeError);
}

/// Sounds are rewound to the beginning before each play.
pub trait AudioPort {
    fn play_ticking(&mut self);
    fn stop_ticking(&mut self);
    fn play_alarm(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCall {
    RenderTimer(String),
    ElementVisualState(usize, InteractionState),
    ElementEnabled(usize, bool),
    StartControlMode(StartControlMode),
    FieldError(Field, bool),
    ShowNotice,
    CloseNotice,
    ErrorNotice(TimeError),
}

/// Presentation port that only records calls, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub calls: Vec<PresentationCall>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&PresentationCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(*c)).count()
    }

    pub fn last_timer(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            PresentationCall::RenderTimer(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl PresentationPort for RecordingPresentation {
    fn render_timer(&mut self, text: &str) {
        self.calls.push(PresentationCall::RenderTimer(text.to_string()));
    }

    fn set_element_visual_state(&mut self, index: usize, state: InteractionState) {
        self.calls
            .push(PresentationCall::ElementVisualState(index, state));
    }

    fn set_element_enabled(&mut self, index: usize, enabled: bool) {
        self.calls.push(PresentationCall::ElementEnabled(index, enabled));
    }

    fn set_start_control_mode(&mut self, mode: StartControlMode) {
        self.calls.push(PresentationCall::StartControlMode(mode));
    }

    fn mark_field_error(&mut self, field: Field, errored: bool) {
        self.calls.push(PresentationCall::FieldError(field, errored));
    }

    fn show_end_of_game_notice(&mut self) {
        self.calls.push(PresentationCall::ShowNotice);
    }

    fn close_end_of_game_notice(&mut self) {
        self.calls.push(PresentationCall::CloseNotice);
    }

    fn show_error_notice(&mut self, error: &TimeError) {
        self.calls.push(PresentationCall::ErrorNotice(error.clone()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    PlayTicking,
    StopTicking,
    PlayAlarm,
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, call: AudioCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl AudioPort for RecordingAudio {
    fn play_ticking(&mut self) {
        self.calls.push(AudioCall::PlayTicking);
    }

    fn stop_ticking(&mut self) {
        self.calls.push(AudioCall::StopTicking);
    }

    fn play_alarm(&mut self) {
        self.calls.push(AudioCall::PlayAlarm);
    }
}
