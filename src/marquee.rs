// OLED Panel - Address Marquee
//
// Horizontal scroll state for the top status line.  Text that fits the
// display never moves; wider text is drawn twice, `gap` pixels apart, and the
// offset wraps once the first copy has fully slid past.

use crate::config::{CHAR_WIDTH, SCREEN_WIDTH, SCROLL_GAP, SCROLL_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marquee {
    text_width: u32,
    offset: u32,
}

impl Marquee {
    /// Marquee for `text` rendered in the 6 px wide status font.
    pub fn for_text(text: &str) -> Self {
        Self {
            text_width: text.chars().count() as u32 * CHAR_WIDTH,
            offset: 0,
        }
    }

    pub fn text_width(&self) -> u32 {
        self.text_width
    }

    /// Whether the text is wider than the display and needs scrolling.
    pub fn overflows(&self) -> bool {
        self.text_width > SCREEN_WIDTH
    }

    /// Distance after which the second copy sits where the first started.
    pub fn period(&self) -> u32 {
        self.text_width + SCROLL_GAP
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Step the scroll by one tick.  Returns `false` (and does nothing) when
    /// the text fits and there is nothing to animate.
    pub fn advance(&mut self) -> bool {
        if !self.overflows() {
            return false;
        }
        self.offset += SCROLL_STEP;
        if self.offset >= self.period() {
            self.offset = 0;
        }
        true
    }

    /// X positions of the copies to draw for the current offset.
    pub fn copies(&self) -> Copies {
        if self.overflows() {
            let x = -(self.offset as i32);
            Copies::Two(x, x + self.period() as i32)
        } else {
            Copies::One(0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Copies {
    One(i32),
    Two(i32, i32),
}
