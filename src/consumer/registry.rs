//! Consumer Registry
//!
//! Explicit registry of the consumers available to scans. Consumers are
//! registered at startup, enabled or disabled from configuration, and lent
//! to a scan by mutable reference in the order the caller asks for them.

use crate::config::RepositoryScanningConfig;
use crate::consumer::error::{ConsumerError, ConsumerResult};
use crate::consumer::traits::{Consumer, InvalidContentConsumer, KnownContentConsumer};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Which set a consumer is registered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsumerKind {
    Known,
    Invalid,
}

/// Read-only view of a registered consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumerDescriptor {
    pub id: String,
    pub description: String,
    pub kind: ConsumerKind,
    pub is_permanent: bool,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub enabled: bool,
}

struct Registered<C: ?Sized> {
    consumer: Box<C>,
    enabled: bool,
}

impl<C: ?Sized + Consumer> Registered<C> {
    fn is_enabled(&self) -> bool {
        self.enabled || self.consumer.is_permanent()
    }
}

/// Consumers lent to one scan, in selection order
pub struct Selection<'a> {
    pub known: Vec<&'a mut dyn KnownContentConsumer>,
    pub invalid: Vec<&'a mut dyn InvalidContentConsumer>,
}

impl Selection<'_> {
    pub fn known_ids(&self) -> Vec<String> {
        self.known.iter().map(|c| c.id().to_string()).collect()
    }

    pub fn invalid_ids(&self) -> Vec<String> {
        self.invalid.iter().map(|c| c.id().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.invalid.is_empty()
    }
}

/// Registry of known and invalid content consumers
#[derive(Default)]
pub struct ConsumerRegistry {
    known: Vec<Registered<dyn KnownContentConsumer>>,
    invalid: Vec<Registered<dyn InvalidContentConsumer>>,
}

impl std::fmt::Debug for ConsumerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerRegistry")
            .field(
                "known",
                &self.known.iter().map(|r| r.consumer.id()).collect::<Vec<_>>(),
            )
            .field(
                "invalid",
                &self.invalid.iter().map(|r| r.consumer.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ConsumerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a known content consumer; it starts enabled
    pub fn register_known(
        &mut self,
        consumer: Box<dyn KnownContentConsumer>,
    ) -> ConsumerResult<()> {
        self.check_unique(consumer.id())?;
        log::debug!("Registered known content consumer '{}'", consumer.id());
        self.known.push(Registered {
            consumer,
            enabled: true,
        });
        Ok(())
    }

    /// Register an invalid content consumer; it starts enabled
    pub fn register_invalid(
        &mut self,
        consumer: Box<dyn InvalidContentConsumer>,
    ) -> ConsumerResult<()> {
        self.check_unique(consumer.id())?;
        log::debug!("Registered invalid content consumer '{}'", consumer.id());
        self.invalid.push(Registered {
            consumer,
            enabled: true,
        });
        Ok(())
    }

    fn check_unique(&self, id: &str) -> ConsumerResult<()> {
        if self.contains(id) {
            return Err(ConsumerError::Duplicate {
                consumer_id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.known.iter().any(|r| r.consumer.id() == id)
            || self.invalid.iter().any(|r| r.consumer.id() == id)
    }

    pub fn len(&self) -> usize {
        self.known.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enable or disable a consumer. Permanent consumers stay enabled.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> ConsumerResult<()> {
        let slot = self
            .known
            .iter_mut()
            .find(|r| r.consumer.id() == id)
            .map(|r| (&mut r.enabled, r.consumer.is_permanent()))
            .or_else(|| {
                self.invalid
                    .iter_mut()
                    .find(|r| r.consumer.id() == id)
                    .map(|r| (&mut r.enabled, r.consumer.is_permanent()))
            });

        match slot {
            Some((flag, permanent)) => {
                if permanent && !enabled {
                    log::warn!("Consumer '{}' is permanent and cannot be disabled", id);
                }
                *flag = enabled || permanent;
                Ok(())
            }
            None => Err(ConsumerError::NotFound {
                consumer_id: id.to_string(),
            }),
        }
    }

    pub fn is_enabled(&self, id: &str) -> Option<bool> {
        self.known
            .iter()
            .find(|r| r.consumer.id() == id)
            .map(|r| r.is_enabled())
            .or_else(|| {
                self.invalid
                    .iter()
                    .find(|r| r.consumer.id() == id)
                    .map(|r| r.is_enabled())
            })
    }

    /// Enable exactly the consumers named in the configuration, plus permanent ones.
    ///
    /// Configured ids that are not registered are logged and ignored.
    pub fn apply_configuration(&mut self, config: &RepositoryScanningConfig) {
        let known: HashSet<&str> = config
            .known_content_consumers
            .iter()
            .map(String::as_str)
            .collect();
        let invalid: HashSet<&str> = config
            .invalid_content_consumers
            .iter()
            .map(String::as_str)
            .collect();

        for entry in &mut self.known {
            entry.enabled = known.contains(entry.consumer.id()) || entry.consumer.is_permanent();
        }
        for entry in &mut self.invalid {
            entry.enabled = invalid.contains(entry.consumer.id()) || entry.consumer.is_permanent();
        }

        for id in known.iter().chain(invalid.iter()) {
            if !self.contains(id) {
                log::warn!("Configured consumer '{}' is not registered", id);
            }
        }
    }

    /// Descriptors for every registered consumer, known first, in registration order
    pub fn descriptors(&self) -> Vec<ConsumerDescriptor> {
        let known = self.known.iter().map(|r| ConsumerDescriptor {
            id: r.consumer.id().to_string(),
            description: r.consumer.description().to_string(),
            kind: ConsumerKind::Known,
            is_permanent: r.consumer.is_permanent(),
            includes: r.consumer.includes(),
            excludes: r.consumer.excludes(),
            enabled: r.is_enabled(),
        });
        let invalid = self.invalid.iter().map(|r| ConsumerDescriptor {
            id: r.consumer.id().to_string(),
            description: r.consumer.description().to_string(),
            kind: ConsumerKind::Invalid,
            is_permanent: r.consumer.is_permanent(),
            includes: Vec::new(),
            excludes: Vec::new(),
            enabled: r.is_enabled(),
        });
        known.chain(invalid).collect()
    }

    /// Lend the named consumers to a scan, in the order given.
    ///
    /// Disabled consumers are left out entirely and repeated ids are lent
    /// once. An id that is not registered in the matching set fails the
    /// whole selection.
    pub fn select<K, I>(
        &mut self,
        known_ids: &[K],
        invalid_ids: &[I],
    ) -> ConsumerResult<Selection<'_>>
    where
        K: AsRef<str>,
        I: AsRef<str>,
    {
        let known = lend(&mut self.known, known_ids)?
            .into_iter()
            .map(|c| c as &mut dyn KnownContentConsumer)
            .collect();
        let invalid = lend(&mut self.invalid, invalid_ids)?
            .into_iter()
            .map(|c| c as &mut dyn InvalidContentConsumer)
            .collect();
        Ok(Selection { known, invalid })
    }

    /// Lend every enabled consumer in registration order
    pub fn select_enabled(&mut self) -> Selection<'_> {
        let known = self
            .known
            .iter_mut()
            .filter(|r| r.is_enabled())
            .map(|r| r.consumer.as_mut() as &mut dyn KnownContentConsumer)
            .collect();
        let invalid = self
            .invalid
            .iter_mut()
            .filter(|r| r.is_enabled())
            .map(|r| r.consumer.as_mut() as &mut dyn InvalidContentConsumer)
            .collect();
        Selection { known, invalid }
    }
}

fn lend<'a, C, S>(
    entries: &'a mut [Registered<C>],
    ids: &[S],
) -> ConsumerResult<Vec<&'a mut C>>
where
    C: ?Sized + Consumer,
    S: AsRef<str>,
{
    let mut by_id: HashMap<String, &'a mut Registered<C>> = entries
        .iter_mut()
        .map(|r| (r.consumer.id().to_string(), r))
        .collect();

    let mut lent = Vec::with_capacity(ids.len());
    let mut seen = HashSet::new();
    for id in ids {
        let id = id.as_ref();
        if !seen.insert(id.to_string()) {
            log::debug!("Consumer '{}' requested more than once", id);
            continue;
        }
        match by_id.remove(id) {
            Some(entry) if entry.is_enabled() => lent.push(entry.consumer.as_mut()),
            Some(_) => log::debug!("Skipping disabled consumer '{}'", id),
            None => {
                return Err(ConsumerError::NotFound {
                    consumer_id: id.to_string(),
                })
            }
        }
    }
    Ok(lent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::RepositoryDescriptor;
    use std::time::SystemTime;

    struct Stub {
        id: &'static str,
        permanent: bool,
    }

    impl Consumer for Stub {
        fn id(&self) -> &str {
            self.id
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn is_permanent(&self) -> bool {
            self.permanent
        }

        fn begin_scan(
            &mut self,
            _repository: &RepositoryDescriptor,
            _when: SystemTime,
            _execute_on_entire_repo: bool,
        ) -> ConsumerResult<()> {
            Ok(())
        }

        fn process_file(
            &mut self,
            _path: &str,
            _execute_on_entire_repo: bool,
        ) -> ConsumerResult<()> {
            Ok(())
        }

        fn complete_scan(&mut self, _execute_on_entire_repo: bool) -> ConsumerResult<()> {
            Ok(())
        }
    }

    impl KnownContentConsumer for Stub {
        fn includes(&self) -> Vec<String> {
            vec!["**/*.jar".to_string()]
        }
    }

    impl InvalidContentConsumer for Stub {}

    fn known(id: &'static str) -> Box<dyn KnownContentConsumer> {
        Box::new(Stub { id, permanent: false })
    }

    fn invalid(id: &'static str) -> Box<dyn InvalidContentConsumer> {
        Box::new(Stub { id, permanent: false })
    }

    fn registry() -> ConsumerRegistry {
        let mut registry = ConsumerRegistry::new();
        registry.register_known(known("a")).unwrap();
        registry.register_known(known("b")).unwrap();
        registry.register_known(known("c")).unwrap();
        registry.register_invalid(invalid("x")).unwrap();
        registry
    }

    const NONE: [&str; 0] = [];

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut registry = registry();
        assert!(matches!(
            registry.register_known(known("a")),
            Err(ConsumerError::Duplicate { .. })
        ));
        assert!(matches!(
            registry.register_invalid(invalid("b")),
            Err(ConsumerError::Duplicate { .. })
        ));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_select_preserves_caller_order() {
        let mut registry = registry();
        let selection = registry.select(&["c", "a"], &["x"]).unwrap();
        assert_eq!(selection.known_ids(), vec!["c", "a"]);
        assert_eq!(selection.invalid_ids(), vec!["x"]);
    }

    #[test]
    fn test_select_unknown_id_fails() {
        let mut registry = registry();
        match registry.select(&["a", "missing"], &NONE) {
            Err(ConsumerError::NotFound { consumer_id }) => assert_eq!(consumer_id, "missing"),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("selection should fail"),
        }
        // a known id is not valid as an invalid consumer
        assert!(registry.select(&NONE, &["a"]).is_err());
    }

    #[test]
    fn test_disabled_consumers_are_not_lent() {
        let mut registry = registry();
        registry.set_enabled("b", false).unwrap();

        let selection = registry.select(&["a", "b", "c"], &NONE).unwrap();
        assert_eq!(selection.known_ids(), vec!["a", "c"]);
        drop(selection);

        let enabled = registry.select_enabled();
        assert_eq!(enabled.known_ids(), vec!["a", "c"]);
        assert_eq!(enabled.invalid_ids(), vec!["x"]);
    }

    #[test]
    fn test_repeated_ids_are_lent_once() {
        let mut registry = registry();
        let selection = registry.select(&["a", "a", "b"], &NONE).unwrap();
        assert_eq!(selection.known_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_permanent_consumer_stays_enabled() {
        let mut registry = ConsumerRegistry::new();
        registry
            .register_known(Box::new(Stub {
                id: "core",
                permanent: true,
            }))
            .unwrap();
        registry.set_enabled("core", false).unwrap();
        assert_eq!(registry.is_enabled("core"), Some(true));
        assert!(registry.set_enabled("nope", true).is_err());
    }

    #[test]
    fn test_apply_configuration_enables_configured_ids() {
        let mut registry = registry();
        let config = RepositoryScanningConfig {
            file_types: Vec::new(),
            known_content_consumers: vec!["b".to_string(), "ghost".to_string()],
            invalid_content_consumers: Vec::new(),
        };
        registry.apply_configuration(&config);

        assert_eq!(registry.is_enabled("a"), Some(false));
        assert_eq!(registry.is_enabled("b"), Some(true));
        assert_eq!(registry.is_enabled("x"), Some(false));
        assert_eq!(registry.select_enabled().known_ids(), vec!["b"]);
    }

    #[test]
    fn test_descriptors_report_state() {
        let mut registry = registry();
        registry.set_enabled("a", false).unwrap();
        let descriptors = registry.descriptors();

        assert_eq!(descriptors.len(), 4);
        assert_eq!(descriptors[0].id, "a");
        assert!(!descriptors[0].enabled);
        assert_eq!(descriptors[0].includes, vec!["**/*.jar"]);
        assert_eq!(descriptors[3].kind, ConsumerKind::Invalid);
        assert!(descriptors[3].includes.is_empty());
    }
}
