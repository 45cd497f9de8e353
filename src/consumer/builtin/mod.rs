//! Built-in consumers
//!
//! Registration is explicit: [`register_builtin_consumers`] adds every
//! built-in consumer to a registry at startup.

pub mod artifact_listing;
pub mod auto_remove;
pub mod invalid_report;

pub use artifact_listing::{ArtifactListingConsumer, ListingEntry, ListingFormat, ListingHandle};
pub use auto_remove::AutoRemoveConsumer;
pub use invalid_report::InvalidContentReportConsumer;

use crate::consumer::error::ConsumerResult;
use crate::consumer::registry::ConsumerRegistry;
use crate::filetypes::FileTypes;
use std::sync::Arc;

/// Options for the built-in consumers
#[derive(Debug, Clone, Default)]
pub struct BuiltinOptions {
    pub listing_format: ListingFormat,
    pub listing_file: Option<std::path::PathBuf>,
    pub auto_remove_dry_run: bool,
}

/// Register the built-in consumers, returning the artifact listing handle
pub fn register_builtin_consumers(
    registry: &mut ConsumerRegistry,
    file_types: &Arc<FileTypes>,
    options: &BuiltinOptions,
) -> ConsumerResult<ListingHandle> {
    let mut listing = ArtifactListingConsumer::new(Arc::clone(file_types))
        .with_format(options.listing_format);
    if let Some(path) = &options.listing_file {
        listing = listing.with_output_file(path);
    }
    let handle = listing.listing();

    registry.register_known(Box::new(listing))?;
    registry.register_known(Box::new(
        AutoRemoveConsumer::new(Arc::clone(file_types)).dry_run(options.auto_remove_dry_run),
    ))?;
    registry.register_invalid(Box::new(InvalidContentReportConsumer::new()))?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, ConfigurationRegistry};

    #[test]
    fn test_register_builtin_consumers() {
        let config = Arc::new(ConfigurationRegistry::new(Configuration::default()));
        let file_types = FileTypes::new(config);
        let mut registry = ConsumerRegistry::new();

        register_builtin_consumers(&mut registry, &file_types, &BuiltinOptions::default()).unwrap();

        assert!(registry.contains(artifact_listing::ID));
        assert!(registry.contains(auto_remove::ID));
        assert!(registry.contains(invalid_report::ID));
        let options = BuiltinOptions::default();
        assert!(register_builtin_consumers(&mut registry, &file_types, &options).is_err());
    }
}
