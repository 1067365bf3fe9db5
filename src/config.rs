//! Durable settings
//!
//! Only the chipset variant and the active LED count survive a power cycle.
//! The storage itself is a collaborator behind [`ConfigStore`]; this module
//! owns the keys, the validation applied at load, and the commit path.

use heapless::{FnvIndexMap, String};
use log::{info, warn};

use crate::chipset::ChipsetVariant;
use crate::error::StoreError;

/// Namespace holding the strip settings
pub const CONFIG_NAMESPACE: &str = "strip";
/// Key of the chipset variant
pub const KEY_CHIPSET: &str = "chipset";
/// Key of the active LED count
pub const KEY_LED_COUNT: &str = "led_count";

/// Integer key-value storage that survives restarts
pub trait ConfigStore {
    /// Read `key`, returning `default` when the key was never written
    fn get_int(&mut self, namespace: &str, key: &'static str, default: i32)
    -> Result<i32, StoreError>;

    /// Write `key`
    fn put_int(&mut self, namespace: &str, key: &'static str, value: i32)
    -> Result<(), StoreError>;
}

/// The durable subset of the controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedConfig {
    pub chipset: ChipsetVariant,
    pub led_count: u16,
}

impl PersistedConfig {
    /// Defaults used when nothing (or nothing valid) is stored
    pub const fn defaults(max_leds: u16) -> Self {
        Self {
            chipset: ChipsetVariant::Ws2812,
            led_count: max_leds,
        }
    }

    /// Load both keys, replacing unreadable or out-of-range values
    ///
    /// Never fails: any problem is logged and the default takes its place.
    pub fn load<S: ConfigStore>(store: &mut S, max_leds: u16) -> Self {
        let defaults = Self::defaults(max_leds);

        let chipset = read_key(
            store,
            KEY_CHIPSET,
            i32::from(defaults.chipset.raw()),
        )
        .and_then(|raw| u8::try_from(raw).ok())
        .and_then(ChipsetVariant::from_raw)
        .unwrap_or_else(|| {
            warn!("stored chipset invalid, using {}", defaults.chipset.as_str());
            defaults.chipset
        });

        let led_count = read_key(store, KEY_LED_COUNT, i32::from(defaults.led_count))
            .and_then(|raw| u16::try_from(raw).ok())
            .filter(|count| (1..=max_leds).contains(count))
            .unwrap_or_else(|| {
                warn!("stored LED count invalid, using {}", max_leds);
                max_leds
            });

        info!("config loaded: chipset={} leds={}", chipset.as_str(), led_count);
        Self { chipset, led_count }
    }

    /// Persist the chipset variant
    pub fn commit_chipset<S: ConfigStore>(
        &mut self,
        store: &mut S,
        chipset: ChipsetVariant,
    ) -> Result<(), StoreError> {
        // The in-memory value wins for this session even if the write fails.
        self.chipset = chipset;
        store.put_int(CONFIG_NAMESPACE, KEY_CHIPSET, i32::from(chipset.raw()))
    }

    /// Persist the active LED count
    pub fn commit_led_count<S: ConfigStore>(
        &mut self,
        store: &mut S,
        led_count: u16,
    ) -> Result<(), StoreError> {
        self.led_count = led_count;
        store.put_int(CONFIG_NAMESPACE, KEY_LED_COUNT, i32::from(led_count))
    }
}

fn read_key<S: ConfigStore>(store: &mut S, key: &'static str, default: i32) -> Option<i32> {
    match store.get_int(CONFIG_NAMESPACE, key, default) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("config read of `{}` failed: {}", key, err);
            None
        }
    }
}

/// Maximum length of a `namespace/key` pair in [`MemoryStore`]
const STORE_KEY_LEN: usize = 32;

type StoreKey = String<STORE_KEY_LEN>;

/// RAM-backed [`ConfigStore`]
///
/// Keeps its entries for as long as the instance lives, which is enough to
/// stand in for flash on the host: reloading from the same instance behaves
/// like a restart. `N` must be a power of two.
#[derive(Debug, Default)]
pub struct MemoryStore<const N: usize> {
    entries: FnvIndexMap<StoreKey, i32, N>,
}

impl<const N: usize> MemoryStore<N> {
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(namespace: &str, key: &'static str) -> Option<StoreKey> {
        let mut full = StoreKey::new();
        full.push_str(namespace).ok()?;
        full.push('/').ok()?;
        full.push_str(key).ok()?;
        Some(full)
    }
}

impl<const N: usize> ConfigStore for MemoryStore<N> {
    fn get_int(
        &mut self,
        namespace: &str,
        key: &'static str,
        default: i32,
    ) -> Result<i32, StoreError> {
        let full = Self::key(namespace, key).ok_or(StoreError::Read { key })?;
        Ok(self.entries.get(&full).copied().unwrap_or(default))
    }

    fn put_int(
        &mut self,
        namespace: &str,
        key: &'static str,
        value: i32,
    ) -> Result<(), StoreError> {
        let full = Self::key(namespace, key).ok_or(StoreError::Write { key })?;
        self.entries
            .insert(full, value)
            .map(|_| ())
            .map_err(|_| StoreError::Full)
    }
}
