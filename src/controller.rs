use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::clock::{ClockEvent, GameClock};
use crate::layout::{letter_elements, InteractionState, LayoutParams, LetterElement};
use crate::ports::{AudioPort, PresentationPort, StartControlMode};
use crate::time_codec;
use crate::validator::{self, Field, TimeError, TimeRange};

/// Gives the alarm a head start before the end-of-game notice pops up
pub const NOTICE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub status: SessionStatus,
    pub remaining_seconds: u32,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            status: SessionStatus::Idle,
            remaining_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeState {
    Hidden,
    Pending(Instant),
    Showing,
}

/// Owns the session, the letters and the clock; every state change goes
/// through here and is mirrored to the presentation and audio ports.
pub struct GameController<P: PresentationPort, A: AudioPort, R: Rng> {
    presentation: P,
    audio: A,
    rng: R,
    clock: GameClock,
    session: GameSession,
    elements: Vec<LetterElement>,
    range: TimeRange,
    notice: NoticeState,
}

impl<P: PresentationPort, A: AudioPort, R: Rng> GameController<P, A, R> {
    pub fn new(presentation: P, audio: A, rng: R, range: TimeRange, layout: LayoutParams) -> Self {
        Self {
            presentation,
            audio,
            rng,
            clock: GameClock::new(),
            session: GameSession::default(),
            elements: letter_elements(layout),
            range,
            notice: NoticeState::Hidden,
        }
    }

    pub fn with_clock(mut self, clock: GameClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.session.status == SessionStatus::Running
    }

    pub fn elements(&self) -> &[LetterElement] {
        &self.elements
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    pub fn notice(&self) -> NoticeState {
        self.notice
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Pushes the idle state to the screen once at startup.
    pub fn initialize(&mut self) {
        self.presentation.render_timer(&time_codec::format(0));
        for element in &self.elements {
            self.presentation
                .set_element_visual_state(element.index, element.state);
            self.presentation.set_element_enabled(element.index, false);
        }
        self.presentation
            .set_start_control_mode(StartControlMode::Start);
        self.mark_field(Field::Min);
        self.mark_field(Field::Max);
    }

    /// Live validation, run on every edit of a time field.
    pub fn set_field_text(&mut self, field: Field, text: &str) -> bool {
        let bound = validator::validate(text);
        match field {
            Field::Min => self.range.min = bound,
            Field::Max => self.range.max = bound,
        }
        let valid = self.mark_field(field);
        debug!(%field, valid, "time field edited");
        valid
    }

    fn mark_field(&mut self, field: Field) -> bool {
        let valid = self.range.bound(field).is_valid();
        self.presentation.mark_field_error(field, !valid);
        valid
    }

    pub fn request_start(&mut self, now: Instant) -> Result<u32, TimeError> {
        self.mark_field(Field::Min);
        self.mark_field(Field::Max);

        let (min, max) = match self.range.check() {
            Ok(bounds) => bounds,
            Err(e) => {
                warn!(error = %e, min = %self.range.min.raw_text, max = %self.range.max.raw_text, "start rejected");
                self.presentation.show_error_notice(&e);
                return Err(e);
            }
        };

        if self.is_running() {
            self.request_stop(false, now);
        }
        self.dismiss_notice();

        let duration = self.rng.gen_range(min..=max);
        self.clock.start(duration, now)?;
        self.session.remaining_seconds = duration;
        self.presentation.render_timer(&time_codec::format(duration));

        self.audio.stop_ticking();
        self.audio.play_ticking();

        self.reset_elements();
        self.presentation
            .set_start_control_mode(StartControlMode::Stop);
        self.session.status = SessionStatus::Running;

        info!(duration, min, max, "session started");
        Ok(duration)
    }

    /// Ends the running session, either by the player or by the clock.
    /// Does nothing when no session is running.
    pub fn request_stop(&mut self, is_expiry: bool, now: Instant) {
        if !self.is_running() {
            debug!(is_expiry, "stop ignored, no session running");
            return;
        }

        self.clock.stop();
        self.audio.stop_ticking();

        if is_expiry {
            self.audio.play_alarm();
            self.notice = NoticeState::Pending(now + NOTICE_DELAY);
        } else {
            self.reset_elements();
        }

        self.disable_elements();
        self.presentation
            .set_start_control_mode(StartControlMode::Start);
        self.session.status = SessionStatus::Idle;
        self.session.remaining_seconds = 0;
        self.presentation.render_timer(&time_codec::format(0));

        info!(is_expiry, "session stopped");
    }

    /// Drives the clock and the delayed notice; called on every loop tick.
    pub fn poll(&mut self, now: Instant) {
        for event in self.clock.poll(now) {
            match event {
                ClockEvent::Tick(remaining) => {
                    debug!(remaining, "tick");
                    self.session.remaining_seconds = remaining;
                    self.presentation
                        .render_timer(&time_codec::format(remaining));
                }
                ClockEvent::Expired => self.request_stop(true, now),
            }
        }

        if let NoticeState::Pending(due) = self.notice {
            if now >= due {
                self.notice = NoticeState::Showing;
                self.presentation.show_end_of_game_notice();
            }
        }
    }

    /// The player closed the end-of-game notice.
    pub fn acknowledge_notice(&mut self) {
        if self.notice != NoticeState::Showing {
            return;
        }
        self.notice = NoticeState::Hidden;
        self.presentation.close_end_of_game_notice();

        self.reset_elements();
        // a session is over, so the letters stay locked until the next start
        self.disable_elements();
    }

    pub fn handle_element_activation(&mut self, index: usize) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(element) = self.elements.get_mut(index) else {
            return false;
        };
        if element.state == InteractionState::Activated {
            return false;
        }

        element.state = InteractionState::Activated;
        self.presentation
            .set_element_visual_state(index, InteractionState::Activated);
        self.presentation.set_element_enabled(index, false);

        info!(letter = %element.symbol, "letter picked");
        true
    }

    fn dismiss_notice(&mut self) {
        match self.notice {
            NoticeState::Hidden => {}
            NoticeState::Pending(_) => self.notice = NoticeState::Hidden,
            NoticeState::Showing => {
                self.notice = NoticeState::Hidden;
                self.presentation.close_end_of_game_notice();
            }
        }
    }

    fn reset_elements(&mut self) {
        for element in &mut self.elements {
            element.state = InteractionState::Enabled;
            self.presentation
                .set_element_visual_state(element.index, InteractionState::Enabled);
            self.presentation.set_element_enabled(element.index, true);
        }
    }

    /// Locks every letter; picked letters keep their mark until the next reset.
    fn disable_elements(&mut self) {
        for element in &mut self.elements {
            if element.state == InteractionState::Enabled {
                element.state = InteractionState::Disabled;
                self.presentation
                    .set_element_visual_state(element.index, InteractionState::Disabled);
            }
            self.presentation.set_element_enabled(element.index, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LETTER_COUNT;
    use crate::ports::{AudioCall, PresentationCall, RecordingAudio, RecordingPresentation};
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestController = GameController<RecordingPresentation, RecordingAudio, StdRng>;

    fn controller(min: &str, max: &str) -> TestController {
        let mut c = GameController::new(
            RecordingPresentation::new(),
            RecordingAudio::new(),
            StdRng::seed_from_u64(7),
            TimeRange::new(min, max),
            LayoutParams::default(),
        );
        c.initialize();
        c
    }

    fn states(c: &TestController) -> Vec<InteractionState> {
        c.elements().iter().map(|e| e.state).collect()
    }

    fn all(c: &TestController, state: InteractionState) -> bool {
        states(c).iter().all(|s| *s == state)
    }

    #[test]
    fn test_initialize() {
        let c = controller("01:00", "02:00");
        let p = c.presentation();

        assert_eq!(p.last_timer(), Some("00:00"));
        assert_eq!(
            p.count(|call| matches!(call, PresentationCall::ElementEnabled(_, false))),
            LETTER_COUNT
        );
        assert!(p
            .calls
            .contains(&PresentationCall::StartControlMode(StartControlMode::Start)));
        assert!(p.calls.contains(&PresentationCall::FieldError(Field::Min, false)));
        assert!(p.calls.contains(&PresentationCall::FieldError(Field::Max, false)));
        assert!(all(&c, InteractionState::Disabled));
        assert_eq!(c.session().status, SessionStatus::Idle);
    }

    #[test]
    fn test_live_validation_marks_fields() {
        let mut c = controller("01:00", "02:00");
        c.presentation_mut().clear();

        assert!(!c.set_field_text(Field::Min, "00:0"));
        assert!(!c.set_field_text(Field::Max, "09:00"));
        assert!(c.set_field_text(Field::Min, "00:45"));

        assert_eq!(
            c.presentation().calls,
            vec![
                PresentationCall::FieldError(Field::Min, true),
                PresentationCall::FieldError(Field::Max, true),
                PresentationCall::FieldError(Field::Min, false),
            ]
        );
        assert_eq!(c.range().min.seconds, Some(45));
    }

    #[test]
    fn test_start_fixed_range() {
        let now = Instant::now();
        for seed in 0..20 {
            let mut c = GameController::new(
                RecordingPresentation::new(),
                RecordingAudio::new(),
                StdRng::seed_from_u64(seed),
                TimeRange::new("00:30", "00:30"),
                LayoutParams::default(),
            );
            assert_eq!(c.request_start(now), Ok(30));
        }
    }

    #[test]
    fn test_start_duration_within_range() {
        let now = Instant::now();
        let mut c = controller("01:00", "01:10");
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            let d = c.request_start(now).unwrap();
            assert!((60..=70).contains(&d));
            seen.insert(d);
        }
        // both endpoints are reachable
        assert!(seen.contains(&60));
        assert!(seen.contains(&70));
    }

    #[test]
    fn test_start_effects() {
        let now = Instant::now();
        let mut c = controller("01:30", "01:30");
        c.presentation_mut().clear();

        assert_eq!(c.request_start(now), Ok(90));

        assert_eq!(c.session().status, SessionStatus::Running);
        assert_eq!(c.session().remaining_seconds, 90);
        assert!(all(&c, InteractionState::Enabled));
        assert_eq!(c.presentation().last_timer(), Some("01:30"));
        assert!(c
            .presentation()
            .calls
            .contains(&PresentationCall::StartControlMode(StartControlMode::Stop)));
        assert_eq!(
            c.audio().calls,
            vec![AudioCall::StopTicking, AudioCall::PlayTicking]
        );
    }

    #[test]
    fn test_start_rejects_below_minimum() {
        let now = Instant::now();
        let mut c = controller("00:05", "01:00");
        c.presentation_mut().clear();

        assert_matches!(c.request_start(now), Err(TimeError::Range));
        assert_eq!(c.session().status, SessionStatus::Idle);
        assert!(all(&c, InteractionState::Disabled));
        assert!(c.audio().calls.is_empty());
        assert!(c
            .presentation()
            .calls
            .contains(&PresentationCall::FieldError(Field::Min, true)));
        assert!(c
            .presentation()
            .calls
            .contains(&PresentationCall::ErrorNotice(TimeError::Range)));

        // no clock was started, so nothing ever ticks
        c.poll(now + Duration::from_secs(5));
        assert_eq!(c.presentation().last_timer(), None);
    }

    #[test]
    fn test_start_rejects_bad_format() {
        let mut c = controller("1:00", "02:00");
        assert_matches!(c.request_start(Instant::now()), Err(TimeError::Format));
        assert!(!c.is_running());
    }

    #[test]
    fn test_start_rejects_min_above_max() {
        let mut c = controller("02:00", "01:00");
        c.presentation_mut().clear();

        assert_matches!(c.request_start(Instant::now()), Err(TimeError::Order));
        assert!(!c.is_running());
        assert_eq!(
            c.presentation()
                .count(|call| matches!(call, PresentationCall::FieldError(_, true))),
            0
        );
        assert!(c
            .presentation()
            .calls
            .contains(&PresentationCall::ErrorNotice(TimeError::Order)));
    }

    #[test]
    fn test_ticks_update_timer() {
        let now = Instant::now();
        let mut c = controller("00:45", "00:45");
        c.request_start(now).unwrap();

        c.poll(now + Duration::from_secs(1));
        assert_eq!(c.session().remaining_seconds, 44);
        assert_eq!(c.presentation().last_timer(), Some("00:44"));

        c.poll(now + Duration::from_secs(15));
        assert_eq!(c.session().remaining_seconds, 30);
        assert_eq!(c.presentation().last_timer(), Some("00:30"));
    }

    #[test]
    fn test_manual_stop() {
        let now = Instant::now();
        let mut c = controller("01:00", "02:00");
        c.request_start(now).unwrap();
        c.handle_element_activation(3);
        c.presentation_mut().clear();

        c.request_stop(false, now + Duration::from_secs(2));

        assert_eq!(c.session(), &GameSession::default());
        assert!(all(&c, InteractionState::Disabled));
        assert_eq!(c.presentation().last_timer(), Some("00:00"));
        assert_eq!(c.audio().count(AudioCall::PlayAlarm), 0);
        assert_eq!(c.notice(), NoticeState::Hidden);
        assert!(c
            .presentation()
            .calls
            .contains(&PresentationCall::StartControlMode(StartControlMode::Start)));

        // the clock is cancelled
        c.presentation_mut().clear();
        c.poll(now + Duration::from_secs(300));
        assert!(c.presentation().calls.is_empty());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut c = controller("01:00", "02:00");
        c.presentation_mut().clear();

        c.request_stop(false, Instant::now());
        c.request_stop(true, Instant::now());

        assert!(c.presentation().calls.is_empty());
        assert!(c.audio().calls.is_empty());
    }

    #[test]
    fn test_expiry_alarm_notice_and_reset() {
        let now = Instant::now();
        let mut c = controller("00:30", "00:30");
        c.request_start(now).unwrap();
        c.handle_element_activation(0);
        c.handle_element_activation(25);

        let expiry = now + Duration::from_secs(30);
        c.poll(expiry);

        assert!(!c.is_running());
        assert_eq!(c.audio().count(AudioCall::PlayAlarm), 1);
        assert_eq!(c.notice(), NoticeState::Pending(expiry + NOTICE_DELAY));
        // picked letters keep their mark until the notice is closed
        assert_eq!(c.elements()[0].state, InteractionState::Activated);
        assert_eq!(c.elements()[1].state, InteractionState::Disabled);

        c.poll(expiry + Duration::from_millis(10));
        assert_eq!(c.notice(), NoticeState::Pending(expiry + NOTICE_DELAY));

        c.poll(expiry + NOTICE_DELAY);
        assert_eq!(c.notice(), NoticeState::Showing);
        assert_eq!(
            c.presentation()
                .count(|call| *call == PresentationCall::ShowNotice),
            1
        );

        c.presentation_mut().clear();
        c.acknowledge_notice();
        c.acknowledge_notice();
        c.request_stop(true, expiry + Duration::from_secs(1));
        c.poll(expiry + Duration::from_secs(5));

        let p = c.presentation();
        assert_eq!(p.count(|call| *call == PresentationCall::CloseNotice), 1);
        for i in 0..LETTER_COUNT {
            assert_eq!(
                p.count(|call| *call
                    == PresentationCall::ElementVisualState(i, InteractionState::Enabled)),
                1,
                "letter {} reset count",
                i
            );
        }
        assert_eq!(p.count(|call| *call == PresentationCall::ShowNotice), 0);
        assert_eq!(c.audio().count(AudioCall::PlayAlarm), 1);
        assert!(all(&c, InteractionState::Disabled));
    }

    #[test]
    fn test_notice_alarm_ordering() {
        let now = Instant::now();
        let mut c = controller("00:30", "00:30");
        c.request_start(now).unwrap();

        // one late poll covers both the expiry and the notice delay
        c.poll(now + Duration::from_secs(40));
        assert_eq!(c.notice(), NoticeState::Pending(now + Duration::from_secs(40) + NOTICE_DELAY));

        c.poll(now + Duration::from_secs(41));
        assert_eq!(c.notice(), NoticeState::Showing);
        assert_eq!(
            c.audio().calls,
            vec![
                AudioCall::StopTicking,
                AudioCall::PlayTicking,
                AudioCall::StopTicking,
                AudioCall::PlayAlarm
            ]
        );
    }

    #[test]
    fn test_manual_stop_after_expiry_is_ignored() {
        let now = Instant::now();
        let mut c = controller("00:30", "00:30");
        c.request_start(now).unwrap();
        c.handle_element_activation(4);

        let expiry = now + Duration::from_secs(30);
        c.poll(expiry);
        assert_eq!(c.notice(), NoticeState::Pending(expiry + NOTICE_DELAY));
        c.presentation_mut().clear();

        // the player hits stop while the alarm is already ringing
        c.request_stop(false, expiry + Duration::from_millis(10));
        assert_eq!(c.notice(), NoticeState::Pending(expiry + NOTICE_DELAY));
        assert_eq!(c.elements()[4].state, InteractionState::Activated);

        c.poll(expiry + NOTICE_DELAY);
        c.acknowledge_notice();

        let p = c.presentation();
        assert_eq!(c.audio().count(AudioCall::PlayAlarm), 1);
        assert_eq!(p.count(|call| *call == PresentationCall::ShowNotice), 1);
        for i in 0..LETTER_COUNT {
            assert_eq!(
                p.count(|call| *call
                    == PresentationCall::ElementVisualState(i, InteractionState::Enabled)),
                1,
                "letter {} reset count",
                i
            );
        }
        assert!(all(&c, InteractionState::Disabled));
        assert_eq!(c.notice(), NoticeState::Hidden);
    }

    #[test]
    fn test_activation_only_while_running() {
        let mut c = controller("01:00", "02:00");
        assert!(!c.handle_element_activation(4));
        assert_eq!(c.elements()[4].state, InteractionState::Disabled);

        c.request_start(Instant::now()).unwrap();
        assert!(c.handle_element_activation(4));
        assert_eq!(c.elements()[4].state, InteractionState::Activated);
        assert!(!c.handle_element_activation(LETTER_COUNT));
    }

    #[test]
    fn test_second_activation_is_noop() {
        let mut c = controller("01:00", "02:00");
        c.request_start(Instant::now()).unwrap();

        assert!(c.handle_element_activation(7));
        c.presentation_mut().clear();
        assert!(!c.handle_element_activation(7));

        assert_eq!(c.elements()[7].state, InteractionState::Activated);
        assert!(c.presentation().calls.is_empty());
    }

    #[test]
    fn test_restart_while_running_stops_prior_session() {
        let now = Instant::now();
        let mut c = controller("00:30", "00:30");
        c.request_start(now).unwrap();
        c.handle_element_activation(2);

        let later = now + Duration::from_millis(10_500);
        c.poll(later);
        assert_eq!(c.session().remaining_seconds, 20);

        c.request_start(later).unwrap();
        assert_eq!(c.session().remaining_seconds, 30);
        assert!(all(&c, InteractionState::Enabled));

        // only the new countdown ticks: first tick one period after restart
        c.poll(now + Duration::from_secs(11));
        assert_eq!(c.session().remaining_seconds, 30);
        c.poll(later + Duration::from_secs(1));
        assert_eq!(c.session().remaining_seconds, 29);
    }

    #[test]
    fn test_start_cancels_pending_notice() {
        let now = Instant::now();
        let mut c = controller("00:30", "00:30");
        c.request_start(now).unwrap();
        let expiry = now + Duration::from_secs(30);
        c.poll(expiry);
        assert_matches!(c.notice(), NoticeState::Pending(_));

        c.request_start(expiry).unwrap();
        assert_eq!(c.notice(), NoticeState::Hidden);

        c.poll(expiry + Duration::from_millis(100));
        assert_eq!(
            c.presentation()
                .count(|call| *call == PresentationCall::ShowNotice),
            0
        );
    }

    #[test]
    fn test_invalid_start_keeps_running_session() {
        let now = Instant::now();
        let mut c = controller("00:30", "00:30");
        c.request_start(now).unwrap();

        c.set_field_text(Field::Max, "00:10");
        assert_matches!(c.request_start(now), Err(TimeError::Range));
        assert!(c.is_running());
    }
}
