//! # Display
//! The text surface every screen of the device is drawn on, plus where each text goes.
//!
//! The device only ever prints lines of text in two sizes. [`TextSurface`] is that and nothing
//! more; [`draw_text`] is how a pixel display implements it with `embedded-graphics`.
use crate::error::{Error, Result};
use embedded_graphics::{
    mono_font::{
        MonoTextStyleBuilder,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

/// Font scale of a printed line
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSize {
    /// 6x10 pixel glyphs, 21 characters per line
    Small,
    /// 10x20 pixel glyphs, 12 characters per line
    Large,
}

/// Where and how big a line of text is printed
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Placement {
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Font scale
    pub size: FontSize,
}

impl Placement {
    /// Create a new `Placement`
    pub const fn new(x: i32, y: i32, size: FontSize) -> Self {
        Self { x, y, size }
    }

    /// The live `DD:HH:MM:SS` time on the main screen
    pub const TIME: Self = Self::new(0, 0, FontSize::Large);
    /// "Failed to obtain time" and the startup progress lines
    pub const STATUS: Self = Self::new(0, 0, FontSize::Small);
    /// "MEDICINE TIME!" while the alarm rings
    pub const RINGING: Self = Self::new(0, 15, FontSize::Large);
    /// Menu entries and editor prompts
    pub const MENU: Self = Self::new(0, 0, FontSize::Large);
    /// "Time is set" and friends
    pub const CONFIRMATION: Self = Self::new(0, 0, FontSize::Large);
    /// Temperature warning line
    pub const TEMPERATURE_WARNING: Self = Self::new(0, 40, FontSize::Small);
    /// Humidity warning line
    pub const HUMIDITY_WARNING: Self = Self::new(0, 50, FontSize::Small);
    /// "Welcome to Medibox"
    pub const SPLASH: Self = Self::new(15, 30, FontSize::Large);
}

/// A screen that can be cleared and printed on.
#[allow(async_fn_in_trait)]
pub trait TextSurface {
    /// Blank the screen. On buffered displays this only blanks the buffer, the next
    /// [`print`](Self::print) makes it visible.
    ///
    /// # Errors
    /// [`Error::Display`] if the display rejects the operation.
    async fn clear(&mut self) -> Result<()>;

    /// Print `text` with its top left corner at `x`,`y` and show the result.
    ///
    /// # Errors
    /// [`Error::Display`] if the display rejects the draw or the flush.
    async fn print(&mut self, text: &str, x: i32, y: i32, size: FontSize) -> Result<()>;

    /// Print `text` at a predefined place
    ///
    /// # Errors
    /// See [`print`](Self::print).
    async fn print_at(&mut self, text: &str, placement: Placement) -> Result<()> {
        self.print(text, placement.x, placement.y, placement.size).await
    }

    /// Clear the screen and print a single line on it
    ///
    /// # Errors
    /// See [`print`](Self::print).
    async fn show(&mut self, text: &str, placement: Placement) -> Result<()> {
        self.clear().await?;
        self.print_at(text, placement).await
    }
}

/// Draw one line of text onto a monochrome display buffer.
///
/// # Errors
/// [`Error::Display`] if the target rejects the draw.
pub fn draw_text<D>(target: &mut D, text: &str, x: i32, y: i32, size: FontSize) -> Result<()>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let font = match size {
        FontSize::Small => &FONT_6X10,
        FontSize::Large => &FONT_10X20,
    };
    let style = MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::On)
        .build();
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
        .draw(target)
        .map_err(|_| Error::Display)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::primitives::Rectangle;

    /// Bounding box of everything that is switched on
    fn lit_area(display: &MockDisplay<BinaryColor>) -> Rectangle {
        display.affected_area()
    }

    #[test]
    fn small_text_starts_at_its_top_left_corner() {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        draw_text(&mut display, "LOW", 0, 40, FontSize::Small).unwrap();

        let area = lit_area(&display);
        assert!(area.top_left.x >= 0 && area.top_left.x < 6);
        assert!(area.top_left.y >= 40);
        assert!(area.bottom_right().unwrap().y < 50);
        // three glyphs of six pixels
        assert!(area.bottom_right().unwrap().x < 18);
    }

    #[test]
    fn large_text_is_taller() {
        let mut display = MockDisplay::new();
        draw_text(&mut display, "12", 0, 0, FontSize::Large).unwrap();

        let area = lit_area(&display);
        assert!(area.size.height > 10);
        assert!(area.bottom_right().unwrap().y < 20);
        assert!(area.bottom_right().unwrap().x < 20);
    }

    #[test]
    fn rejected_draw_is_a_display_error() {
        let mut display: MockDisplay<BinaryColor> = MockDisplay::new();
        /// Target that refuses every draw
        struct Refusing;
        impl OriginDimensions for Refusing {
            fn size(&self) -> Size {
                Size::new(128, 64)
            }
        }
        impl DrawTarget for Refusing {
            type Color = BinaryColor;
            type Error = ();
            fn draw_iter<I>(&mut self, _pixels: I) -> core::result::Result<(), Self::Error>
            where
                I: IntoIterator<Item = Pixel<Self::Color>>,
            {
                Err(())
            }
        }

        assert_eq!(
            draw_text(&mut Refusing, "x", 0, 0, FontSize::Small),
            Err(Error::Display)
        );
        assert!(draw_text(&mut display, "x", 0, 0, FontSize::Small).is_ok());
    }
}
