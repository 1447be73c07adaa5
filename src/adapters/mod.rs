//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to               |
//! |----------------|--------------------|---------------------------|
//! | `ble`          | EventSink          | Bluedroid NUS GATT server |
//! |                | (remote inbox)     |                           |
//! | `calendar`     | CalendarPort       | HTTPS calendar endpoint   |
//! | `hardware`     | PreconditionPort   | Lid / phone switches      |
//! |                | ActuatorPort       | Latch servo (LEDC PWM)    |
//! |                | FeedbackPort       | DotStar strip, piezo      |
//! | `log_sink`     | EventSink          | Serial log output         |
//! | `nvs`          | ConfigPort         | NVS / in-memory store     |
//! | `time`         | ClockPort          | SNTP-synced system clock  |
//! | `wifi`         | ConnectivityPort   | ESP-IDF WiFi STA          |

pub mod ble;
pub mod calendar;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod wifi;
