//! SSD1306 OLED display wrapper.

use embedded_graphics::mono_font::ascii::{
    FONT_5X8, FONT_8X13, FONT_8X13_BOLD, FONT_8X13_ITALIC,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use crate::error::Error;
use crate::ui::render::{self, Line, Style, TextRenderer};

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

const WIDTH_PX: u32 = 128;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(display)
}

fn font(style: Style, size: render::Size) -> &'static MonoFont<'static> {
    match (size, style) {
        (render::Size::Small, _) => &FONT_5X8,
        (render::Size::Large, Style::Bold) => &FONT_8X13_BOLD,
        (render::Size::Large, Style::Italic) => &FONT_8X13_ITALIC,
        (render::Size::Large, Style::Normal) => &FONT_8X13,
    }
}

/// Draws menu text lines into the display buffer.
///
/// Bold lines are drawn inverted, which is how the selected row and the
/// header stand out.
pub struct OledRenderer<I2C> {
    display: Display<I2C>,
}

impl<I2C> OledRenderer<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(display: Display<I2C>) -> Self {
        Self { display }
    }
}

impl<I2C> TextRenderer for OledRenderer<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn print(&mut self, x: u8, line: Line, text: &str, style: Style, size: render::Size) {
        let font = font(style, size);
        let inverted = style == Style::Bold;
        let (fg, bg) = if inverted {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };

        let left = x as u32 * font.character_size.width;
        let top = line.y() as i32;
        let band = Rectangle::new(
            Point::new(left as i32, top),
            Size::new(WIDTH_PX.saturating_sub(left), line.height() as u32),
        );
        let _ = band
            .into_styled(PrimitiveStyle::with_fill(bg))
            .draw(&mut self.display);

        let text_style = MonoTextStyleBuilder::new()
            .font(font)
            .text_color(fg)
            .background_color(bg)
            .build();
        let _ = Text::with_baseline(text, Point::new(left as i32, top), text_style, Baseline::Top)
            .draw(&mut self.display);
    }

    fn flush(&mut self) {
        if self.display.flush().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Display flush failed");
        }
    }
}
