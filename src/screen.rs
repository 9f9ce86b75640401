//! Display renderer.
//!
//! Turns the panel state into a handful of positioned text runs and draws
//! them into the frame buffer.  Layout is kept separate from drawing so the
//! positions can be checked without decoding glyph bitmaps.

use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::battery::format_volts;
use crate::framebuffer::FrameBuffer;
use crate::marquee::{Copies, Marquee};
use crate::message::split_lines;

const ADDRESS_BASELINE: i32 = 9;
const STATUS_BASELINE: i32 = 20;
const MESSAGE_BASELINE: i32 = 32;
const MESSAGE_WRAP_BASELINE: i32 = 40;
const BANNER_BASELINES: [i32; 2] = [10, 22];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// 5x8, used when the status line carries a voltage.
    Small,
    /// 6x10, everything else.
    Regular,
}

impl TextSize {
    fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &FONT_5X8,
            TextSize::Regular => &FONT_6X10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: i32,
    pub baseline: i32,
    pub size: TextSize,
}

impl TextRun {
    fn regular(text: impl Into<String>, x: i32, baseline: i32) -> Self {
        Self {
            text: text.into(),
            x,
            baseline,
            size: TextSize::Regular,
        }
    }
}

/// Everything the renderer reads from the panel.
#[derive(Debug, Clone, Copy)]
pub struct ScreenState<'a> {
    pub address: &'a str,
    pub marquee: Marquee,
    pub led_on: bool,
    pub battery_volts: Option<f32>,
    pub message: &'a str,
}

/// Second line: LED label, plus the voltage once a sample exists.
pub fn status_line(led_on: bool, battery_volts: Option<f32>) -> (String, TextSize) {
    let label = if led_on { "LED: ON" } else { "LED: OFF" };
    match battery_volts {
        Some(v) => (format!("{} {}V", label, format_volts(v)), TextSize::Small),
        None => (label.to_string(), TextSize::Regular),
    }
}

pub fn layout(state: &ScreenState<'_>) -> Vec<TextRun> {
    let mut runs = Vec::with_capacity(5);

    match state.marquee.copies() {
        Copies::One(x) => runs.push(TextRun::regular(state.address, x, ADDRESS_BASELINE)),
        Copies::Two(a, b) => {
            runs.push(TextRun::regular(state.address, a, ADDRESS_BASELINE));
            runs.push(TextRun::regular(state.address, b, ADDRESS_BASELINE));
        }
    }

    let (status, size) = status_line(state.led_on, state.battery_volts);
    runs.push(TextRun {
        text: status,
        x: 0,
        baseline: STATUS_BASELINE,
        size,
    });

    let (first, second) = split_lines(state.message);
    runs.push(TextRun::regular(first, 0, MESSAGE_BASELINE));
    if let Some(second) = second {
        runs.push(TextRun::regular(second, 0, MESSAGE_WRAP_BASELINE));
    }

    runs
}

/// Static two-line screen used during bring-up.
pub fn banner_layout(lines: [&str; 2]) -> Vec<TextRun> {
    lines
        .iter()
        .zip(BANNER_BASELINES)
        .map(|(text, baseline)| TextRun::regular(*text, 0, baseline))
        .collect()
}

pub fn draw<D>(target: &mut D, runs: &[TextRun]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    for run in runs {
        let style = MonoTextStyle::new(run.size.font(), BinaryColor::On);
        Text::with_baseline(&run.text, Point::new(run.x, run.baseline), style, Baseline::Alphabetic)
            .draw(target)?;
    }
    Ok(())
}

/// Clear the frame and draw the full panel screen.
pub fn render(frame: &mut FrameBuffer, state: &ScreenState<'_>) {
    frame.clear_all();
    draw(frame, &layout(state)).unwrap_or_else(|e| match e {});
}

pub fn render_banner(frame: &mut FrameBuffer, lines: [&str; 2]) {
    frame.clear_all();
    draw(frame, &banner_layout(lines)).unwrap_or_else(|e| match e {});
}
