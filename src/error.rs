//! Error types of the collaborator seams.
//!
//! None of these stop the loop. They are logged where they surface and the
//! affected feature falls back to its last good or default value.

/// Errors reported by a [`ConfigStore`](crate::config::ConfigStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Reading a key failed.
    #[error("failed to read `{key}`")]
    Read {
        /// Key that was being read.
        key: &'static str,
    },

    /// Writing a key failed.
    #[error("failed to write `{key}`")]
    Write {
        /// Key that was being written.
        key: &'static str,
    },

    /// No room left for another key.
    #[error("config store is full")]
    Full,
}

/// Errors reported by [`Instruments`](crate::instruments::Instruments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    /// The sensor did not answer on the bus.
    #[error("sensor not responding")]
    NotResponding,

    /// The sensor answered with a value it cannot produce (e.g. negative lux).
    #[error("invalid sensor reading")]
    InvalidReading,

    /// A bus transaction failed.
    #[error("bus error")]
    Bus,
}

/// Errors raised while pushing values to the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OutputError {
    /// A PWM channel rejected its duty cycle.
    #[error("failed to set duty cycle on channel {channel}")]
    Pwm {
        /// Auxiliary channel index.
        channel: usize,
    },

    /// The strip driver failed to transmit a frame.
    #[error("failed to transmit strip frame")]
    Strip,
}
