//! [`embedded_hal::digital`] wrappers over the raw GPIO helpers in
//! [`hw_init`](super::hw_init).
//!
//! The hardware adapter is generic over `embedded-hal` pins; these are the
//! concrete pins used on the board.  Register access cannot fail once a pin
//! is configured, so the error type is [`Infallible`].

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::hw_init;

/// Output pin configured by `hw_init::init_peripherals`.
pub struct RawOutput {
    gpio: i32,
}

impl RawOutput {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl ErrorType for RawOutput {
    type Error = Infallible;
}

impl OutputPin for RawOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, true);
        Ok(())
    }
}

/// Input pin configured by `hw_init::init_peripherals`.
pub struct RawInput {
    gpio: i32,
}

impl RawInput {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl ErrorType for RawInput {
    type Error = Infallible;
}

impl InputPin for RawInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(hw_init::gpio_read(self.gpio))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!hw_init::gpio_read(self.gpio))
    }
}
