//! Text printing
//!
//! Lays out characters left to right along X and draws each one with a
//! single sequencer run.

pub mod glyphs;

pub use glyphs::{BlockFont, GlyphTable, Stroke, GLYPH_HEIGHT, GLYPH_WIDTH, MAX_GLYPH_STROKES};

use heapless::Deque;

use crate::config::{ConfigError, PrintConfig};
use crate::geometry::{Point, Segment};
use crate::motion::{PlotterState, Sequencer};
use crate::traits::{Feedback, MotorInterface};

/// Segment queue for one glyph
pub type GlyphQueue = Deque<Segment, MAX_GLYPH_STROKES>;

/// Draws text with a glyph table
#[derive(Debug, Clone, Copy)]
pub struct Printer<G = BlockFont> {
    font: G,
    scale_mm: f32,
    advance_mm: f32,
}

impl Printer<BlockFont> {
    /// Printer using the built-in font
    pub fn new(config: &PrintConfig) -> Result<Self, ConfigError> {
        Self::with_font(BlockFont, config)
    }
}

impl<G: GlyphTable> Printer<G> {
    /// Printer using a custom glyph table
    pub fn with_font(font: G, config: &PrintConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            font,
            scale_mm: config.glyph_scale_mm,
            advance_mm: config.letter_advance_mm,
        })
    }

    /// Scale strokes onto the plotter with the glyph origin at `cursor`
    ///
    /// At most [`MAX_GLYPH_STROKES`] strokes are taken.
    pub fn layout(&self, strokes: &[Stroke], cursor: Point) -> GlyphQueue {
        let mut queue = GlyphQueue::new();
        for &[start, end] in strokes.iter().take(MAX_GLYPH_STROKES) {
            let segment = Segment::new(self.place(start, cursor), self.place(end, cursor));
            // Capacity is guaranteed by the take above
            let _ = queue.push_back(segment);
        }
        queue
    }

    /// Print `text`, returning the cursor after the last character
    ///
    /// The cursor starts at `origin`, or at the current pen position when
    /// none is given. Characters without a glyph draw nothing but still
    /// take up a letter's width.
    pub fn print<M: MotorInterface, F: Feedback>(
        &self,
        sequencer: &mut Sequencer<M, F>,
        state: &mut PlotterState,
        text: &str,
        origin: Option<Point>,
    ) -> Point {
        let mut cursor = origin.unwrap_or(state.position);

        for ch in text.chars() {
            let strokes: &[Stroke] = match self.font.glyph(ch) {
                Some(strokes) => strokes,
                None => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("No glyph for {}", ch);
                    &[]
                }
            };

            if strokes.is_empty() {
                sequencer.run(state, &mut GlyphQueue::new());
            }
            // Oversized custom glyphs take several runs
            for chunk in strokes.chunks(MAX_GLYPH_STROKES) {
                sequencer.run(state, &mut self.layout(chunk, cursor));
            }

            cursor = cursor.offset(self.advance_mm, 0.0);
        }

        cursor
    }

    fn place(&self, [x, y]: [i8; 2], cursor: Point) -> Point {
        cursor.offset(f32::from(x) * self.scale_mm, f32::from(y) * self.scale_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotterConfig;
    use crate::testing::{Action, FeedbackEvent, RecordingFeedback, RecordingMotors};
    use crate::traits::Axis;

    fn sequencer() -> Sequencer<RecordingMotors, RecordingFeedback> {
        Sequencer::with_feedback(
            RecordingMotors::new(),
            RecordingFeedback::default(),
            &PlotterConfig::default(),
        )
        .unwrap()
    }

    fn runs(seq: &Sequencer<RecordingMotors, RecordingFeedback>) -> usize {
        seq.feedback()
            .events
            .iter()
            .filter(|e| **e == FeedbackEvent::Clear)
            .count()
    }

    #[test]
    fn test_layout_scales_and_translates() {
        let printer = Printer::new(&PrintConfig::default()).unwrap();
        let strokes = BlockFont.glyph('L').unwrap();

        let queue = printer.layout(strokes, Point::new(10.0, 5.0));
        let segments: Vec<Segment> = queue.iter().copied().collect();
        assert_eq!(
            segments,
            vec![
                Segment::new(Point::new(10.0, 25.0), Point::new(10.0, 5.0)),
                Segment::new(Point::new(10.0, 5.0), Point::new(20.0, 5.0)),
            ]
        );
    }

    #[test]
    fn test_print_advances_per_character() {
        let printer = Printer::new(&PrintConfig::default()).unwrap();
        let mut seq = sequencer();
        let mut state = PlotterState::new();

        let cursor = printer.print(&mut seq, &mut state, "HI", Some(Point::new(0.0, 10.0)));

        assert_eq!(cursor, Point::new(30.0, 10.0));
        assert_eq!(runs(&seq), 2);
        assert!(seq.motors().is_stopped());
        assert_eq!(state.pen, crate::motion::PenState::Up);
    }

    #[test]
    fn test_unknown_character_only_advances() {
        let printer = Printer::new(&PrintConfig::default()).unwrap();
        let mut seq = sequencer();
        let mut state = PlotterState::new();
        state.position = Point::new(7.0, 3.0);

        let cursor = printer.print(&mut seq, &mut state, "~", None);

        assert_eq!(cursor, Point::new(22.0, 3.0));
        assert_eq!(runs(&seq), 1);
        assert_eq!(
            seq.motors().actions,
            vec![Action::Axis(Axis::X, 0), Action::Axis(Axis::Y, 0)]
        );
        assert_eq!(state.position, Point::new(7.0, 3.0));
    }

    #[test]
    fn test_lowercase_prints_like_uppercase() {
        let printer = Printer::new(&PrintConfig::default()).unwrap();

        let mut upper = sequencer();
        printer.print(&mut upper, &mut PlotterState::new(), "OK", None);
        let mut lower = sequencer();
        printer.print(&mut lower, &mut PlotterState::new(), "ok", None);

        assert_eq!(upper.motors().actions, lower.motors().actions);
    }

    #[test]
    fn test_diagonal_stroke_is_fused() {
        let printer = Printer::new(&PrintConfig::default()).unwrap();
        let mut seq = sequencer();
        let mut state = PlotterState::new();

        printer.print(&mut seq, &mut state, "7", None);

        // X reverses into the diagonal, Y is already heading down
        let fused = [
            Action::Axis(Axis::X, -7),
            Action::Wait(258),
            Action::Axis(Axis::X, -7),
            Action::Axis(Axis::Y, -7),
            Action::Wait(1724),
        ];
        assert!(seq.motors().actions.windows(fused.len()).any(|w| w == fused));
        assert_eq!(state.position, Point::ORIGIN);
    }

    struct Ladder;

    impl GlyphTable for Ladder {
        fn glyph(&self, ch: char) -> Option<&[Stroke]> {
            static RUNGS: [Stroke; 10] = {
                let mut rungs = [[[0, 0], [2, 0]]; 10];
                let mut i = 0;
                while i < 10 {
                    rungs[i] = [[0, i as i8], [2, i as i8]];
                    i += 1;
                }
                rungs
            };
            (ch == '#').then_some(&RUNGS[..])
        }
    }

    #[test]
    fn test_custom_font_with_long_glyph() {
        let printer = Printer::with_font(Ladder, &PrintConfig::default()).unwrap();
        let mut seq = sequencer();
        let mut state = PlotterState::new();

        printer.print(&mut seq, &mut state, "#", None);

        assert_eq!(runs(&seq), 2);
        assert_eq!(state.position, Point::new(10.0, 45.0));
    }

    #[test]
    fn test_invalid_print_config() {
        let config = PrintConfig {
            letter_advance_mm: f32::NAN,
            ..Default::default()
        };
        assert_eq!(
            Printer::new(&config).err(),
            Some(ConfigError::InvalidGlyphScale)
        );
    }
}
