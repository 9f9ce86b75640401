// OLED Panel - Hardware & System Configuration
// Target: ESP32-C3 SuperMini with on-board 0.42" SSD1306 (72x40)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions
// ---------------------------------------------------------------------------
pub const PIN_LED: i32 = 8;         // On-board blue LED (active LOW)
pub const PIN_I2C_SDA: i32 = 5;     // OLED data line
pub const PIN_I2C_SCL: i32 = 6;     // OLED clock line
pub const PIN_BATTERY_ADC: i32 = 2; // Battery divider midpoint (ADC1 channel 2)

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_BAUDRATE_HZ: u32 = 400_000;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 72x40, mapped into the middle of the 128-column GDDRAM)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 72;
pub const SCREEN_HEIGHT: u32 = 40;
pub const SCREEN_PAGES: usize = SCREEN_HEIGHT as usize / 8;
pub const SCREEN_COLUMN_OFFSET: u8 = 28;
pub const DISPLAY_BUFFER_SIZE: usize = SCREEN_WIDTH as usize * SCREEN_PAGES; // 360

/// Glyph advance of the main 6x10 font.
pub const CHAR_WIDTH: u32 = 6;
/// Pixel gap between the two copies of a scrolling address.
pub const SCROLL_GAP: u32 = 30;
/// Pixels advanced per scroll tick.
pub const SCROLL_STEP: u32 = 2;
/// Characters per message line; two lines are shown.
pub const MESSAGE_LINE_CHARS: usize = 12;
pub const MESSAGE_MAX_CHARS: usize = MESSAGE_LINE_CHARS * 2;
pub const DEFAULT_MESSAGE: &str = "Hello!";

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------
pub const WIFI_SSID: &str = env!("PANEL_WIFI_SSID");
pub const WIFI_PASS: &str = env!("PANEL_WIFI_PASS");
pub const WIFI_CONNECT_ATTEMPTS: u32 = 30;
pub const WIFI_RETRY_DELAY_MS: u64 = 1000;
pub const WIFI_MAX_TX_POWER: i8 = 34; // 0.25 dBm units -> 8.5 dBm
pub const HTTP_PORT: u16 = 80;

pub const BOOT_NOTIFY_URL: &str = env!("PANEL_BOOT_NOTIFY_URL");
pub const ALERT_NOTIFY_URL: &str = env!("PANEL_ALERT_NOTIFY_URL");
pub const NOTIFY_QUEUE_DEPTH: usize = 4;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_NOTIFIER: usize = 10240; // TLS handshake lives on this stack
pub const STACK_HTTPD: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const LOOP_POLL_INTERVAL_MS: u64 = 10;
pub const SCROLL_INTERVAL_MS: u64 = 300;
pub const BATTERY_CHECK_INTERVAL_MS: u64 = 10_000;
pub const HALT_IDLE_MS: u64 = 1000;

// ---------------------------------------------------------------------------
// Battery (1S LiPo through a 1:2 divider)
// ---------------------------------------------------------------------------
pub const ADC_FULL_SCALE: f32 = 4095.0;
pub const ADC_REFERENCE_VOLTS: f32 = 3.3;
pub const BATTERY_DIVIDER_RATIO: f32 = 2.0;

pub const LOW_BATTERY_VOLTS: f32 = 3.4;
/// Readings at or below this are an unpopulated divider or a missing sample.
pub const BATTERY_NOISE_FLOOR_VOLTS: f32 = 0.5;
pub const LOW_BATTERY_COOLDOWN_MS: u64 = 300_000;
