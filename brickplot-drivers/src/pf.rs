//! Power Functions infrared motor link
//!
//! A Power Functions receiver has four channels, each with a red and a
//! blue output. The "combo" command sets both outputs of one channel at
//! once, so the driver remembers the last speed of every output and
//! resends the partner output unchanged.
//!
//! Default wiring:
//!
//! | Motor | Channel | Output |
//! |-------|---------|--------|
//! | X     | 1       | red    |
//! | Y     | 1       | blue   |
//! | Pen   | 2       | red    |

use embedded_hal::delay::DelayNs;

use brickplot_core::traits::{Axis, MotorInterface, MAX_SPEED};

/// Number of receiver channels
pub const CHANNELS: u8 = 4;

/// One of the two outputs of a receiver channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PfOutput {
    Red = 0,
    Blue = 1,
}

/// Where a motor is plugged in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PfPort {
    /// Receiver channel (1-4)
    pub channel: u8,
    pub output: PfOutput,
    /// Motor is mounted mirrored: positive speeds run it backwards
    pub reversed: bool,
}

impl PfPort {
    /// A port with normal polarity
    pub const fn new(channel: u8, output: PfOutput) -> Self {
        Self {
            channel,
            output,
            reversed: false,
        }
    }

    /// The same port with the polarity flipped
    pub const fn reversed(self) -> Self {
        Self {
            reversed: !self.reversed,
            ..self
        }
    }

    fn index(&self) -> usize {
        (self.channel - 1) as usize
    }
}

/// Motor-to-port assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PfWiring {
    pub x: PfPort,
    pub y: PfPort,
    pub pen: PfPort,
}

impl Default for PfWiring {
    fn default() -> Self {
        Self {
            x: PfPort::new(1, PfOutput::Red),
            y: PfPort::new(1, PfOutput::Blue),
            pen: PfPort::new(2, PfOutput::Red),
        }
    }
}

impl PfWiring {
    /// Check channels are in range and no output is used twice
    pub fn validate(&self) -> Result<(), PfError> {
        let ports = [self.x, self.y, self.pen];
        for port in ports {
            if port.channel == 0 || port.channel > CHANNELS {
                return Err(PfError::InvalidChannel(port.channel));
            }
        }
        for (i, a) in ports.iter().enumerate() {
            for b in &ports[i + 1..] {
                if a.channel == b.channel && a.output == b.output {
                    return Err(PfError::PortConflict {
                        channel: a.channel,
                        output: a.output,
                    });
                }
            }
        }
        Ok(())
    }

    fn axis(&self, axis: Axis) -> PfPort {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Wiring errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PfError {
    /// Channel outside 1-4
    InvalidChannel(u8),
    /// Two motors on the same output
    PortConflict { channel: u8, output: PfOutput },
}

/// Sends Power Functions combo commands
///
/// Implemented by whatever drives the infrared LED. Sending is
/// fire-and-forget; the receiver never answers.
pub trait IrTransmitter {
    /// Set both outputs of a channel (speeds -7..=7, 0 brakes)
    fn send_combo(&mut self, channel: u8, red: i8, blue: i8);
}

impl<T: IrTransmitter + ?Sized> IrTransmitter for &mut T {
    fn send_combo(&mut self, channel: u8, red: i8, blue: i8) {
        (**self).send_combo(channel, red, blue);
    }
}

/// Plotter motors on Power Functions receivers
pub struct PfMotors<T, D> {
    ir: T,
    delay: D,
    wiring: PfWiring,
    /// Last commanded speed per channel, `[red, blue]`
    outputs: [[i8; 2]; CHANNELS as usize],
}

impl<T: IrTransmitter, D: DelayNs> PfMotors<T, D> {
    /// Create the driver; all outputs are assumed braked
    pub fn new(ir: T, delay: D, wiring: PfWiring) -> Result<Self, PfError> {
        wiring.validate()?;
        Ok(Self {
            ir,
            delay,
            wiring,
            outputs: [[0; 2]; CHANNELS as usize],
        })
    }

    /// Last speed sent to an output, after polarity
    pub fn output(&self, channel: u8, output: PfOutput) -> i8 {
        match channel {
            1..=CHANNELS => self.outputs[(channel - 1) as usize][output as usize],
            _ => 0,
        }
    }

    /// Release the transmitter and delay
    pub fn release(self) -> (T, D) {
        (self.ir, self.delay)
    }

    fn drive(&mut self, port: PfPort, speed: i8) {
        let speed = speed.clamp(-MAX_SPEED, MAX_SPEED);
        let speed = if port.reversed { -speed } else { speed };

        let outputs = &mut self.outputs[port.index()];
        outputs[port.output as usize] = speed;
        let [red, blue] = *outputs;

        #[cfg(feature = "defmt")]
        defmt::trace!("PF ch{}: red={} blue={}", port.channel, red, blue);

        self.ir.send_combo(port.channel, red, blue);
    }
}

impl<T: IrTransmitter, D: DelayNs> MotorInterface for PfMotors<T, D> {
    fn set_axis_speed(&mut self, axis: Axis, speed: i8) {
        self.drive(self.wiring.axis(axis), speed);
    }

    fn set_pen_speed(&mut self, speed: i8) {
        self.drive(self.wiring.pen, speed);
    }

    fn wait(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Brake every output on every channel, wired or not
    fn halt(&mut self) {
        for channel in 1..=CHANNELS {
            self.outputs[(channel - 1) as usize] = [0, 0];
            self.ir.send_combo(channel, 0, 0);
        }
    }
}
