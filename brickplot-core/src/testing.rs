//! Recording fakes for unit tests

use crate::traits::{Arrow, Axis, Feedback, Icon, MotorInterface};

/// One call made on a [`RecordingMotors`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Axis(Axis, i8),
    Pen(i8),
    Wait(u32),
}

/// Motor fake that logs every call against a virtual clock
#[derive(Debug, Default)]
pub struct RecordingMotors {
    pub actions: Vec<Action>,
    /// Virtual time advanced by `wait`
    pub now_ms: u64,
    pub x: i8,
    pub y: i8,
    pub pen: i8,
}

impl RecordingMotors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every motor is braked
    pub fn is_stopped(&self) -> bool {
        self.x == 0 && self.y == 0 && self.pen == 0
    }

    /// Waits in call order
    pub fn waits(&self) -> Vec<u32> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Wait(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    /// Drain the recorded actions
    pub fn take(&mut self) -> Vec<Action> {
        core::mem::take(&mut self.actions)
    }
}

impl MotorInterface for RecordingMotors {
    fn set_axis_speed(&mut self, axis: Axis, speed: i8) {
        match axis {
            Axis::X => self.x = speed,
            Axis::Y => self.y = speed,
        }
        self.actions.push(Action::Axis(axis, speed));
    }

    fn set_pen_speed(&mut self, speed: i8) {
        self.pen = speed;
        self.actions.push(Action::Pen(speed));
    }

    fn wait(&mut self, ms: u32) {
        self.now_ms += u64::from(ms);
        self.actions.push(Action::Wait(ms));
    }
}

/// One call made on a [`RecordingFeedback`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    Icon(Icon),
    Arrow(Arrow),
    Text(String),
    Number(u8),
    Clear,
}

/// Feedback fake that logs every call
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    pub events: Vec<FeedbackEvent>,
}

impl RecordingFeedback {
    /// Number of `"-"` markers shown
    pub fn compensations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, FeedbackEvent::Text(t) if t == "-"))
            .count()
    }
}

impl Feedback for RecordingFeedback {
    fn show_icon(&mut self, icon: Icon) {
        self.events.push(FeedbackEvent::Icon(icon));
    }

    fn show_arrow(&mut self, arrow: Arrow) {
        self.events.push(FeedbackEvent::Arrow(arrow));
    }

    fn show_text(&mut self, text: &str) {
        self.events.push(FeedbackEvent::Text(text.into()));
    }

    fn show_number(&mut self, value: u8) {
        self.events.push(FeedbackEvent::Number(value));
    }

    fn clear(&mut self) {
        self.events.push(FeedbackEvent::Clear);
    }
}
