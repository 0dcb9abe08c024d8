//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{BundleBuilder, MessageReader, MessageService};
use crate::config::Settings;
use crate::domain::Customer;
use crate::infrastructure::traits::{InMemoryRepository, LabelMapping, Repository, SegmentMapping};

/// Container holding the collaborators shared by all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Label tables
    pub mapping: Arc<dyn SegmentMapping>,

    /// Customer registry
    pub customers: Arc<dyn Repository<Customer>>,
}

impl ServiceContainer {
    /// Create a container with the ASWM label tables and an empty in-memory registry.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(LabelMapping::aswm()),
            Arc::new(InMemoryRepository::<Customer>::new()),
        )
    }

    /// Create a container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        mapping: Arc<dyn SegmentMapping>,
        customers: Arc<dyn Repository<Customer>>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            mapping,
            customers,
        }
    }

    pub fn message_reader(&self) -> MessageReader {
        MessageReader::new(self.settings.separators.clone())
    }

    pub fn message_service(&self) -> MessageService {
        MessageService::new(
            self.message_reader(),
            self.mapping.clone(),
            self.customers.clone(),
        )
    }

    pub fn bundle_builder(&self) -> BundleBuilder {
        BundleBuilder::new(self.customers.clone())
    }
}
