//! Live configuration with change notification
//!
//! The registry owns the current [`Configuration`] snapshot. Replacing it
//! computes which properties changed and notifies every subscribed
//! [`ConfigurationListener`] once per changed property. Listeners are held
//! weakly so a subscriber going away never keeps itself alive through the
//! registry.

use super::types::Configuration;
use serde::Serialize;
use std::sync::{Arc, Mutex, RwLock, Weak};

pub const PROPERTY_FILE_TYPES: &str = "repository-scanning.file-types";
pub const PROPERTY_KNOWN_CONSUMERS: &str = "repository-scanning.known-content-consumers";
pub const PROPERTY_INVALID_CONSUMERS: &str = "repository-scanning.invalid-content-consumers";
pub const PROPERTY_SCAN: &str = "scan";
pub const PROPERTY_LOGGING: &str = "logging";

/// A single changed property and its new value rendered as JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationEvent {
    pub property_name: String,
    pub value: String,
}

/// Observer of configuration changes
pub trait ConfigurationListener: Send + Sync {
    fn configuration_changed(&self, event: &ConfigurationEvent);
}

/// Holder of the application's current configuration
pub struct ConfigurationRegistry {
    current: RwLock<Arc<Configuration>>,
    listeners: Mutex<Vec<Weak<dyn ConfigurationListener>>>,
}

impl ConfigurationRegistry {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            current: RwLock::new(Arc::new(configuration)),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<Configuration> {
        match self.current.read() {
            Ok(current) => Arc::clone(&current),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Subscribe a listener for future changes
    pub fn subscribe(&self, listener: Weak<dyn ConfigurationListener>) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }

    /// Number of listeners still alive
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .map(|l| l.iter().filter(|w| w.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Replace the configuration and notify listeners of each changed property.
    ///
    /// Returns the events that were delivered.
    pub fn update(&self, configuration: Configuration) -> Vec<ConfigurationEvent> {
        let previous = self.snapshot();
        let events = diff(&previous, &configuration);

        match self.current.write() {
            Ok(mut current) => *current = Arc::new(configuration),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(configuration),
        }

        if events.is_empty() {
            return events;
        }

        // Notify outside the listener lock so listeners may read the registry
        let live: Vec<Arc<dyn ConfigurationListener>> = match self.listeners.lock() {
            Ok(mut listeners) => {
                listeners.retain(|w| w.strong_count() > 0);
                listeners.iter().filter_map(Weak::upgrade).collect()
            }
            Err(_) => Vec::new(),
        };

        for event in &events {
            log::debug!("Configuration property changed: {}", event.property_name);
            for listener in &live {
                listener.configuration_changed(event);
            }
        }

        events
    }
}

impl std::fmt::Debug for ConfigurationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationRegistry")
            .field("current", &self.snapshot())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn diff(old: &Configuration, new: &Configuration) -> Vec<ConfigurationEvent> {
    let mut events = Vec::new();
    let old_scanning = &old.repository_scanning;
    let new_scanning = &new.repository_scanning;

    push_if_changed(
        &mut events,
        PROPERTY_FILE_TYPES,
        &old_scanning.file_types,
        &new_scanning.file_types,
    );
    push_if_changed(
        &mut events,
        PROPERTY_KNOWN_CONSUMERS,
        &old_scanning.known_content_consumers,
        &new_scanning.known_content_consumers,
    );
    push_if_changed(
        &mut events,
        PROPERTY_INVALID_CONSUMERS,
        &old_scanning.invalid_content_consumers,
        &new_scanning.invalid_content_consumers,
    );
    push_if_changed(&mut events, PROPERTY_SCAN, &old.scan, &new.scan);
    push_if_changed(&mut events, PROPERTY_LOGGING, &old.logging, &new.logging);

    events
}

fn push_if_changed<T: PartialEq + Serialize>(
    events: &mut Vec<ConfigurationEvent>,
    property_name: &str,
    old: &T,
    new: &T,
) {
    if old != new {
        events.push(ConfigurationEvent {
            property_name: property_name.to_string(),
            value: serde_json::to_string(new).unwrap_or_default(),
        });
    }
}
