//! Raspberry Pi backend using rppal.
//!
//! Pins are claimed once in [`open`] and stay configured for the life of the
//! process. rppal resets them to their previous state when dropped.

use super::{AlarmHardware, Button, DigitalOutput, GasSensor, PinConfig, PressHandler};
use crate::error::{AlarmError, Result};
use rppal::gpio::{Gpio, InputPin, OutputPin, Trigger};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use std::sync::{Arc, Mutex};

/// SPI clock for the MCP3008, well within its 3.6 MHz limit at 5 V.
const MCP3008_CLOCK_HZ: u32 = 1_000_000;

/// Full-scale value of the MCP3008's 10-bit conversion.
const MCP3008_FULL_SCALE: f32 = 1023.0;

/// Claim every pin named in `pins` and hand back the configured devices.
pub fn open(pins: &PinConfig) -> Result<AlarmHardware> {
    pins.validate()?;

    let gpio = Gpio::new()
        .map_err(|e| AlarmError::gpio_error(format!("Failed to initialize GPIO: {}", e)))?;

    let indicator = RpiOutput::claim(&gpio, pins.indicator_pin)?;
    let buzzer = RpiOutput::claim(&gpio, pins.buzzer_pin)?;
    let button = RpiButton::claim(&gpio, pins.button_pin)?;
    let sensor = Mcp3008::open(pins.sensor_channel)?;

    tracing::info!(
        "GPIO ready: indicator={} buzzer={} button={} sensor=MCP3008 ch{}",
        pins.indicator_pin,
        pins.buzzer_pin,
        pins.button_pin,
        pins.sensor_channel
    );

    Ok(AlarmHardware {
        indicator: Arc::new(indicator),
        buzzer: Arc::new(buzzer),
        sensor: Arc::new(sensor),
        button: Box::new(button),
    })
}

/// Push-pull output pin.
pub struct RpiOutput {
    pin_number: u8,
    pin: Mutex<OutputPin>,
}

impl RpiOutput {
    fn claim(gpio: &Gpio, pin_number: u8) -> Result<Self> {
        let mut pin = gpio
            .get(pin_number)
            .map_err(|e| {
                AlarmError::gpio_error(format!("Failed to access pin {}: {}", pin_number, e))
            })?
            .into_output();
        pin.set_low();

        Ok(Self {
            pin_number,
            pin: Mutex::new(pin),
        })
    }
}

impl DigitalOutput for RpiOutput {
    fn set(&self, on: bool) -> Result<()> {
        let mut pin = self.pin.lock().map_err(|_| {
            AlarmError::gpio_error(format!("Pin {} lock poisoned", self.pin_number))
        })?;
        if on {
            pin.set_high();
        } else {
            pin.set_low();
        }
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.pin
            .lock()
            .map(|pin| pin.is_set_high())
            .unwrap_or(false)
    }
}

/// Input pin with the internal pull-up enabled.
pub struct RpiButton {
    pin_number: u8,
    pin: InputPin,
}

impl RpiButton {
    fn claim(gpio: &Gpio, pin_number: u8) -> Result<Self> {
        let pin = gpio
            .get(pin_number)
            .map_err(|e| {
                AlarmError::gpio_error(format!("Failed to access pin {}: {}", pin_number, e))
            })?
            .into_input_pullup();

        Ok(Self { pin_number, pin })
    }
}

impl Button for RpiButton {
    fn is_pressed(&self) -> Result<bool> {
        Ok(self.pin.is_low())
    }

    fn set_press_handler(&mut self, mut handler: PressHandler) -> Result<()> {
        // Runs on rppal's interrupt thread, not on the tokio runtime.
        self.pin
            .set_async_interrupt(Trigger::FallingEdge, move |_level| handler())
            .map_err(|e| {
                AlarmError::gpio_error(format!(
                    "Failed to set interrupt on pin {}: {}",
                    self.pin_number, e
                ))
            })
    }
}

/// MCP3008 analog-to-digital converter on SPI0, chip select 0.
pub struct Mcp3008 {
    channel: u8,
    spi: Mutex<Spi>,
}

impl Mcp3008 {
    fn open(channel: u8) -> Result<Self> {
        if channel > 7 {
            return Err(AlarmError::config_error(format!(
                "MCP3008 has channels 0-7, got {}",
                channel
            )));
        }

        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, MCP3008_CLOCK_HZ, Mode::Mode0)
            .map_err(|e| AlarmError::sensor_error(format!("Failed to open SPI0: {}", e)))?;

        Ok(Self {
            channel,
            spi: Mutex::new(spi),
        })
    }
}

impl GasSensor for Mcp3008 {
    fn read(&self) -> Result<f32> {
        // Start bit, then single-ended mode and channel in the high nibble.
        let write = [0x01, (0x08 | self.channel) << 4, 0x00];
        let mut read = [0u8; 3];

        let spi = self
            .spi
            .lock()
            .map_err(|_| AlarmError::sensor_error("SPI lock poisoned"))?;
        spi.transfer(&mut read, &write)
            .map_err(|e| AlarmError::sensor_error(format!("SPI transfer failed: {}", e)))?;

        let raw = (u16::from(read[1] & 0x03) << 8) | u16::from(read[2]);
        Ok(f32::from(raw) / MCP3008_FULL_SCALE)
    }
}
