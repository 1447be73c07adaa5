//! Phonebox Firmware: Main Entry Point
//!
//! Hexagonal architecture around a single periodic control cycle.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink   NvsAdapter            │
//! │  (Precondition+Actuator   (EventSink)    (ConfigPort)          │
//! │   +Feedback)                                                   │
//! │  Esp32TimeAdapter   HttpCalendarAdapter   BleRemoteLink        │
//! │  (ClockPort)        (CalendarPort)        (inbox + EventSink)  │
//! │  WifiAdapter (ConnectivityPort)                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            LockController (pure logic)                 │    │
//! │  │  Window · CalendarCache · AlarmEscalation · Override   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::{Ets, FreeRtos};
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_svc::hal::ledc::config::TimerConfig;
use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::spi::config::Config as SpiConfig;
use esp_idf_svc::hal::spi::{SpiBusDriver, SpiDriver, SpiDriverConfig};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::{EspSntp, SntpConf, SyncStatus};
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use phonebox::adapters::ble::BleRemoteLink;
use phonebox::adapters::calendar::HttpCalendarAdapter;
use phonebox::adapters::hardware::HardwareAdapter;
use phonebox::adapters::log_sink::LogEventSink;
use phonebox::adapters::nvs::NvsAdapter;
use phonebox::adapters::time::{configure_timezone, Esp32TimeAdapter};
use phonebox::adapters::wifi::{ConnectivityPort, WifiAdapter};
use phonebox::app::ports::{ClockPort, Colour, ConfigPort, FeedbackPort};
use phonebox::app::service::LockController;
use phonebox::config::LockboxConfig;
use phonebox::drivers::buzzer::Buzzer;
use phonebox::drivers::dotstar::DotStarStrip;
use phonebox::drivers::servo::ServoDriver;
use phonebox::drivers::switch::SwitchInput;
use phonebox::override_channel::REMOTE_INBOX;
use phonebox::pins;

/// How long boot waits for the first SNTP sync before carrying on.
const SNTP_WAIT_MS: u32 = 10_000;
const SNTP_POLL_MS: u32 = 250;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Phonebox v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new().and_then(|nvs| nvs.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config unavailable ({}), using defaults", e);
            LockboxConfig::default()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    info!(
        "Pins: servo={} led_din={} led_cin={} piezo={} phone={} lid={}",
        pins::SERVO_GPIO,
        pins::LED_DATA_GPIO,
        pins::LED_CLOCK_GPIO,
        pins::PIEZO_GPIO,
        pins::PHONE_SWITCH_GPIO,
        pins::LID_SWITCH_GPIO,
    );

    // LED strip first so boot progress is visible.
    let spi = SpiDriver::new(
        peripherals.spi2,
        peripherals.pins.gpio12,
        peripherals.pins.gpio11,
        None::<AnyIOPin>,
        &SpiDriverConfig::new(),
    )?;
    let spi_bus = SpiBusDriver::new(spi, &SpiConfig::new().baudrate(Hertz(pins::LED_SPI_HZ)))?;
    let strip = DotStarStrip::new(spi_bus, config.led_brightness);

    let servo_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(Hertz(pins::SERVO_PWM_HZ))
            .resolution(Resolution::Bits14),
    )?;
    let servo_pwm = LedcDriver::new(peripherals.ledc.channel0, &servo_timer, peripherals.pins.gpio10)?;
    let servo = ServoDriver::new(servo_pwm, FreeRtos);

    let mut lid_pin = PinDriver::input(peripherals.pins.gpio9)?;
    lid_pin.set_pull(Pull::Down)?;
    let mut phone_pin = PinDriver::input(peripherals.pins.gpio6)?;
    phone_pin.set_pull(Pull::Down)?;

    let piezo = PinDriver::output(peripherals.pins.gpio5)?;
    let buzzer = Buzzer::new(piezo, Ets);

    let mut hw = HardwareAdapter::new(
        servo,
        SwitchInput::new(lid_pin, "lid"),
        SwitchInput::new(phone_pin, "phone"),
        strip,
        buzzer,
    );
    hw.show(Colour::Orange);

    // ── 4. BLE remote link ────────────────────────────────────
    let mut ble = BleRemoteLink::new(heapless::String::try_from("phonebox").unwrap_or_default());
    ble.start();

    // ── 5. WiFi + wall clock ──────────────────────────────────
    let mut clock = Esp32TimeAdapter::new();
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?;
    let mut wifi = WifiAdapter::new(BlockingWifi::wrap(esp_wifi, sysloop)?);
    match wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        Ok(()) => {
            if let Err(e) = wifi.connect(clock.uptime()) {
                warn!("WiFi: {}, will keep retrying", e);
            }
        }
        Err(e) => warn!("WiFi: {}, running offline", e),
    }

    configure_timezone(&config.timezone);
    let mut sntp_conf = SntpConf::default();
    sntp_conf.servers[0] = config.sntp_server.as_str();
    let sntp = EspSntp::new(&sntp_conf)?;
    let mut waited = 0;
    while sntp.get_sync_status() != SyncStatus::Completed && waited < SNTP_WAIT_MS {
        FreeRtos::delay_ms(SNTP_POLL_MS);
        waited += SNTP_POLL_MS;
    }
    if sntp.get_sync_status() == SyncStatus::Completed {
        info!("SNTP: time synchronised");
    } else {
        warn!("SNTP: not synchronised yet, cycles skip until it is");
    }

    // ── 6. Controller ─────────────────────────────────────────
    let mut calendar = HttpCalendarAdapter::new(
        &config.calendar_url,
        core::time::Duration::from_millis(u64::from(config.calendar_timeout_ms)),
    );
    let mut sink = (LogEventSink::new(), ble);
    let mut controller = LockController::new(&config);
    controller.start(&mut hw, &mut sink);

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    let cycle_ms = u32::try_from(config.cycle_period().as_millis()).unwrap_or(u32::MAX);
    loop {
        FreeRtos::delay_ms(cycle_ms);

        controller.drain_inbox(&REMOTE_INBOX, &mut hw, &mut sink);
        controller.tick(&mut clock, &mut calendar, &mut hw, &mut sink);

        // WiFi reconnection poll (exponential backoff).
        wifi.poll(clock.uptime());
    }
}
