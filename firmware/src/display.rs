//! # Display
//! The SSD1306 OLED as the [`TextSurface`] the control loop prints on.
use crate::resources::{DisplayResources, Irqs};
use defmt::{error, info};
use embassy_rp::i2c::{self, Config, I2c};
use embassy_rp::peripherals::I2C0;
use medibox::{Error, FontSize, Result, TextSurface, draw_text};
use ssd1306_async::{I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*};

/// The concrete display type: 128x64 pixels on I2C0, drawn into a frame buffer
type Display = Ssd1306<
    I2CInterface<I2c<'static, I2C0, i2c::Async>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// The OLED, buffered: `clear` blanks the buffer, `print` draws and flushes it.
pub struct OledSurface {
    /// The driver
    display: Display,
}

impl OledSurface {
    /// Bring up the I2C bus and initialise the display.
    ///
    /// # Errors
    /// [`Error::Display`] if the display does not answer.
    pub async fn init(r: DisplayResources) -> Result<Self> {
        info!("init display");
        let mut config = Config::default();
        config.frequency = 400_000;
        let i2c = I2c::new_async(r.i2c0, r.scl, r.sda, Irqs, config);

        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        if let Err(e) = display.init().await {
            error!("Failed to initialize display: {}", defmt::Debug2Format(&e));
            return Err(Error::Display);
        }
        display.clear();
        if display.flush().await.is_err() {
            return Err(Error::Display);
        }
        Ok(Self { display })
    }
}

impl TextSurface for OledSurface {
    async fn clear(&mut self) -> Result<()> {
        self.display.clear();
        Ok(())
    }

    async fn print(&mut self, text: &str, x: i32, y: i32, size: FontSize) -> Result<()> {
        draw_text(&mut self.display, text, x, y, size)?;
        self.display.flush().await.map_err(|e| {
            error!("Failed to flush display: {}", defmt::Debug2Format(&e));
            Error::Display
        })
    }
}
