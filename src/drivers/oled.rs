// OLED Panel - SSD1306 72x40 Display Driver
//
// Register-level driver over I2C.  The 72x40 glass is wired to GDDRAM
// columns 28..100, so every flush sets a column window before streaming the
// five pages of the frame buffer.

use anyhow::Context;
use esp_idf_hal::i2c::I2cDriver;

use oled_panel::config::*;
use oled_panel::framebuffer::FrameBuffer;
use oled_panel::hw::FrameSink;
use oled_panel::screen;

/// I2C control bytes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_IREF: u8 = 0xAD;
    pub const RESUME_FROM_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const NOP: u8 = 0xE3;
}

pub struct OledDisplay {
    i2c: I2cDriver<'static>,
}

impl OledDisplay {
    pub fn new(i2c: I2cDriver<'static>) -> Self {
        Self { i2c }
    }

    /// Probe the controller with a no-op command.
    pub fn is_connected(&mut self) -> bool {
        self.commands(&[cmd::NOP]).is_ok()
    }

    pub fn init(&mut self) -> anyhow::Result<()> {
        self.commands(&[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            (SCREEN_HEIGHT - 1) as u8,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Enable charge pump
            cmd::SET_MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_IREF,
            0x30, // Internal IREF, needed by the 0.42" glass
            cmd::RESUME_FROM_RAM,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ])
        .context("SSD1306 init sequence")?;

        log::info!("SSD1306 initialised ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);
        Ok(())
    }

    /// Replace the screen with a two-line banner (bring-up status).
    pub fn show_banner(&mut self, lines: [&str; 2]) -> anyhow::Result<()> {
        let mut frame = FrameBuffer::new();
        screen::render_banner(&mut frame, lines);
        self.show(&frame)
    }

    fn commands(&mut self, cmds: &[u8]) -> anyhow::Result<()> {
        let mut buf = Vec::with_capacity(cmds.len() + 1);
        buf.push(CONTROL_COMMAND);
        buf.extend_from_slice(cmds);
        self.i2c.write(I2C_ADDR_OLED, &buf, I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}

impl FrameSink for OledDisplay {
    fn show(&mut self, frame: &FrameBuffer) -> anyhow::Result<()> {
        self.commands(&[
            cmd::SET_COLUMN_ADDR,
            SCREEN_COLUMN_OFFSET,
            SCREEN_COLUMN_OFFSET + (SCREEN_WIDTH - 1) as u8,
            cmd::SET_PAGE_ADDR,
            0,
            (SCREEN_PAGES - 1) as u8,
        ])?;

        let mut data = [0u8; SCREEN_WIDTH as usize + 1];
        data[0] = CONTROL_DATA;
        for page in frame.pages() {
            data[1..].copy_from_slice(page);
            self.i2c
                .write(I2C_ADDR_OLED, &data, I2C_TIMEOUT_TICKS)
                .context("SSD1306 page write")?;
        }
        Ok(())
    }
}
