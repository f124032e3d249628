use std::time::Duration;

use conveyor_core::queue::{OrderPolicy, QueueError, QueueOptions, WakePolicy, DEFAULT_CAPACITY};
use conveyor_core::workers::{PauseRange, PoolPlan, WorkerError, WorkerSettings};
use derive_more::derive::From;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Debug, From)]
pub enum ConfigError {
    #[from(ignore)]
    IOError(std::io::Error),

    #[from(ignore)]
    DeserializationFailed(toml::de::Error),

    #[from(ignore)]
    SerializationFailed(toml::ser::Error),

    InvalidPath(std::path::PathBuf),

    InvalidQueue(QueueError),

    InvalidWorkers(WorkerError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::DeserializationFailed(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        Self::SerializationFailed(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidQueue(err) => write!(f, "invalid queue configuration: {err}"),
            ConfigError::InvalidWorkers(err) => write!(f, "invalid worker configuration: {err}"),
            other => write!(f, "{other:?}"),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Reads and deserializes the TOML file at `target` without validating it.
///
/// # Errors
///
/// [`ConfigError::InvalidPath`] when `target` is not a file, otherwise any
/// read or parse failure.
pub fn from_path<T, V>(target: V) -> ConfigResult<T>
where
    T: DeserializeOwned,
    V: Into<std::path::PathBuf>,
{
    let target_path = target.into();
    if !target_path.is_file() {
        return Err(ConfigError::InvalidPath(target_path));
    }
    let config_content = std::fs::read_to_string(target_path)?;
    let config_obj: T = toml::from_str(&config_content)?;
    Ok(config_obj)
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum OrderSetting {
    #[default]
    #[serde(rename = "lifo")]
    Lifo,

    #[serde(rename = "fifo")]
    Fifo,
}

impl From<OrderSetting> for OrderPolicy {
    fn from(value: OrderSetting) -> Self {
        match value {
            OrderSetting::Lifo => OrderPolicy::Lifo,
            OrderSetting::Fifo => OrderPolicy::Fifo,
        }
    }
}

impl From<OrderPolicy> for OrderSetting {
    fn from(value: OrderPolicy) -> Self {
        match value {
            OrderPolicy::Lifo => OrderSetting::Lifo,
            OrderPolicy::Fifo => OrderSetting::Fifo,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum WakeSetting {
    #[default]
    #[serde(rename = "broadcast")]
    Broadcast,

    #[serde(rename = "targeted")]
    Targeted,
}

impl From<WakeSetting> for WakePolicy {
    fn from(value: WakeSetting) -> Self {
        match value {
            WakeSetting::Broadcast => WakePolicy::Broadcast,
            WakeSetting::Targeted => WakePolicy::Targeted,
        }
    }
}

impl From<WakePolicy> for WakeSetting {
    fn from(value: WakePolicy) -> Self {
        match value {
            WakePolicy::Broadcast => WakeSetting::Broadcast,
            WakePolicy::Targeted => WakeSetting::Targeted,
        }
    }
}

/// `[queue]` table of a conveyor configuration file.
///
/// `capacity` is signed so that a negative value in the file is reported
/// as an invalid capacity rather than a parse failure.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct QueueSection {
    pub capacity: i64,
    pub order: OrderSetting,
    pub wake: WakeSetting,
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            capacity: i64::try_from(DEFAULT_CAPACITY).unwrap_or(i64::MAX),
            order: OrderSetting::default(),
            wake: WakeSetting::default(),
        }
    }
}

/// `[workers]` table of a conveyor configuration file.
#[skip_serializing_none]
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WorkersSection {
    pub producers: usize,
    pub consumers: usize,

    /// Items each producer puts before stopping, run until interrupted
    /// when absent.
    pub items: Option<u64>,
    pub pause_min_ms: u64,
    pub pause_max_ms: u64,
}

impl Default for WorkersSection {
    fn default() -> Self {
        Self {
            producers: 2,
            consumers: 2,
            items: None,
            pause_min_ms: 50,
            pause_max_ms: 250,
        }
    }
}

/// ConveyorConfig is the full configuration of a conveyor run.
///
/// ```toml
/// [queue]
/// capacity = 10
/// order = "lifo"
/// wake = "broadcast"
///
/// [workers]
/// producers = 2
/// consumers = 2
/// items = 100
/// pause_min_ms = 50
/// pause_max_ms = 250
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConveyorConfig {
    pub queue: QueueSection,
    pub workers: WorkersSection,
}

impl ConveyorConfig {
    pub fn load<V: Into<std::path::PathBuf>>(target: V) -> ConfigResult<Self> {
        let config: Self = from_path(target)?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Checks every value can be turned into runtime options.
    pub fn validate(&self) -> ConfigResult<()> {
        self.queue_options()?;
        self.pause()?;
        Ok(())
    }

    pub fn queue_options(&self) -> ConfigResult<QueueOptions> {
        let capacity = usize::try_from(self.queue.capacity)
            .ok()
            .filter(|capacity| *capacity > 0)
            .ok_or(ConfigError::InvalidQueue(QueueError::InvalidCapacity(
                self.queue.capacity,
            )))?;

        Ok(QueueOptions::new(capacity)
            .order(self.queue.order.into())
            .wake(self.queue.wake.into()))
    }

    pub fn pause(&self) -> ConfigResult<PauseRange> {
        PauseRange::new(
            Duration::from_millis(self.workers.pause_min_ms),
            Duration::from_millis(self.workers.pause_max_ms),
        )
        .map_err(ConfigError::InvalidWorkers)
    }

    /// Builds the pool plan: producers stop after `items` each when set,
    /// consumers always run until the queue is closed and drained.
    pub fn pool_plan(&self) -> ConfigResult<PoolPlan> {
        let pause = self.pause()?;
        let producer = match self.workers.items {
            Some(items) => WorkerSettings::default().limit(items),
            None => WorkerSettings::default().unlimited(),
        }
        .pause(pause);
        let consumer = WorkerSettings::default().unlimited().pause(pause);

        Ok(PoolPlan::new(self.workers.producers, self.workers.consumers)
            .producer_settings(producer)
            .consumer_settings(consumer))
    }
}
