//! The `import_from_file` service and its registration
//!
//! The host dispatches service calls through a [`ServiceRegistry`]. The
//! handler registered by [`setup`] runs one import per call: parse the
//! whole file, then submit every series. A failing file submits nothing.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::app::services::observer::{ImportObserver, TracingObserver};
use crate::app::services::sink::StatisticsSink;
use crate::app::services::statistics_parser::{ImportSummary, StatisticsParser};
use crate::config::ImportConfig;
use crate::constants::{DOMAIN, SERVICE_IMPORT_FROM_FILE};
use crate::{Error, Result};

/// Handler invoked for a service call
pub type ServiceHandler = Box<dyn FnMut(ImportConfig) -> Result<ImportSummary>>;

/// Host-side service registration
pub trait ServiceRegistry {
    fn register_service(&mut self, domain: &str, service: &str, handler: ServiceHandler);
}

/// In-process registry dispatching calls by domain and service name
#[derive(Default)]
pub struct LocalServiceRegistry {
    handlers: HashMap<(String, String), ServiceHandler>,
}

impl LocalServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_service(&self, domain: &str, service: &str) -> bool {
        self.handlers
            .contains_key(&(domain.to_string(), service.to_string()))
    }

    /// Invoke a registered service
    pub fn call(&mut self, domain: &str, service: &str, config: ImportConfig) -> Result<ImportSummary> {
        let handler = self
            .handlers
            .get_mut(&(domain.to_string(), service.to_string()))
            .ok_or_else(|| {
                Error::configuration(format!("Service {}.{} is not registered", domain, service))
            })?;
        handler(config)
    }
}

impl ServiceRegistry for LocalServiceRegistry {
    fn register_service(&mut self, domain: &str, service: &str, handler: ServiceHandler) {
        self.handlers
            .insert((domain.to_string(), service.to_string()), handler);
    }
}

/// Imports files from a base directory into a statistics sink
#[derive(Debug)]
pub struct ImportService<S, O = TracingObserver> {
    base_dir: PathBuf,
    sink: S,
    observer: O,
}

impl<S: StatisticsSink> ImportService<S, TracingObserver> {
    /// Create a service that logs through `tracing`
    pub fn new(base_dir: impl Into<PathBuf>, sink: S) -> Self {
        Self {
            base_dir: base_dir.into(),
            sink,
            observer: TracingObserver,
        }
    }
}

impl<S: StatisticsSink, O: ImportObserver> ImportService<S, O> {
    /// Replace the observer
    pub fn with_observer<P: ImportObserver>(self, observer: P) -> ImportService<S, P> {
        ImportService {
            base_dir: self.base_dir,
            sink: self.sink,
            observer,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Handle one `import_from_file` call
    pub fn handle_import_from_file(&mut self, config: &ImportConfig) -> Result<ImportSummary> {
        self.observer.import_started(config, &self.base_dir);

        self.run_import(config)
            .inspect(|summary| self.observer.import_finished(summary))
            .inspect_err(|error| self.observer.import_failed(error))
    }

    /// Parse without submitting anything
    pub fn dry_run(&self, config: &ImportConfig) -> Result<ImportSummary> {
        self.observer.import_started(config, &self.base_dir);

        let result = config.validate().and_then(|()| {
            let session =
                StatisticsParser::new(config, &self.observer).parse_file(&self.base_dir)?;
            Ok(ImportSummary::from_session(
                config.filename.display().to_string(),
                &session,
            ))
        });
        result.inspect_err(|error| self.observer.import_failed(error))
    }

    fn run_import(&mut self, config: &ImportConfig) -> Result<ImportSummary> {
        config.validate()?;

        let session = StatisticsParser::new(config, &self.observer).parse_file(&self.base_dir)?;
        let summary = ImportSummary::from_session(config.filename.display().to_string(), &session);

        let submitted = session.submit(&mut self.sink, &self.observer)?;
        Ok(summary.with_points_submitted(submitted))
    }
}

/// Register the `import_from_file` service
pub fn setup<R, S, O>(registry: &mut R, mut service: ImportService<S, O>)
where
    R: ServiceRegistry + ?Sized,
    S: StatisticsSink + 'static,
    O: ImportObserver + 'static,
{
    registry.register_service(
        DOMAIN,
        SERVICE_IMPORT_FROM_FILE,
        Box::new(move |config| service.handle_import_from_file(&config)),
    );
}
