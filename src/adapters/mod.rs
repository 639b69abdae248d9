//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements         | Connects to                    |
//! |--------------|--------------------|--------------------------------|
//! | `event_log`  | EventLogPort       | NVS slots (activity namespace) |
//! | `hardware`   | DisplayPort        | LCD driver                     |
//! |              | LedPort            | RGB PWM driver                 |
//! |              | AudioPort          | Speaker worker queue           |
//! | `log_sink`   | EventSink          | Serial log output              |
//! | `nvs`        | StoragePort        | NVS / in-memory store          |
//! | `time`       | MicrosClock        | ESP32 system timer             |

pub mod event_log;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
