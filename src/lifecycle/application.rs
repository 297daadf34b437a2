//! Application Bootstrap
//!
//! Builds a container, installs the lifecycle callback processor, runs every
//! configuration unit and pre-instantiates singletons.

use super::{LifecycleCallbacks, ShutdownHandler};
use crate::config::ContainerSettings;
use crate::di::Container;
use crate::error::Result;
use crate::functional::{Configuration, FunctionalConfig};
use std::sync::Arc;

/// A bootstrapped container with its registration facade
///
/// # Example
///
/// ```rust
/// use fnbeans::{Application, BeanOptions, FunctionalConfig, Result};
///
/// let app = Application::builder()
///     .configuration(|beans: &FunctionalConfig| -> Result<()> {
///         beans.bean(BeanOptions::named("greeting"), || Ok(String::from("hello")))?;
///         Ok(())
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(*app.beans().get_bean::<String>("greeting").unwrap(), "hello");
/// app.shutdown();
/// ```
pub struct Application {
    beans: FunctionalConfig,
    callbacks: Arc<LifecycleCallbacks>,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub fn container(&self) -> &Arc<Container> {
        self.beans.container()
    }

    pub fn beans(&self) -> &FunctionalConfig {
        &self.beans
    }

    pub fn callbacks(&self) -> &Arc<LifecycleCallbacks> {
        &self.callbacks
    }

    /// Create a shutdown handler for graceful shutdown
    pub fn shutdown_handler(&self) -> ShutdownHandler {
        ShutdownHandler::new(Arc::clone(self.container()))
    }

    /// Close the container, running destroy callbacks
    pub fn shutdown(&self) {
        tracing::info!("Shutting down application...");
        self.container().close();
        tracing::info!("Application shutdown complete");
    }

    /// Spawn a background task that waits for shutdown signals
    /// and closes the container.
    pub fn spawn_shutdown_handler(&self) -> tokio::task::JoinHandle<()> {
        let shutdown_handler = self.shutdown_handler();
        tokio::spawn(async move {
            shutdown_handler.wait_for_shutdown().await;
        })
    }
}

/// Builder for Application
pub struct ApplicationBuilder {
    settings: ContainerSettings,
    parent: Option<Arc<Container>>,
    configurations: Vec<Box<dyn Configuration>>,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            settings: ContainerSettings::default(),
            parent: None,
            configurations: Vec::new(),
        }
    }

    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Read settings from `FNBEANS_*` environment variables
    pub fn settings_from_env(self) -> Self {
        self.settings(ContainerSettings::from_env())
    }

    pub fn parent(mut self, parent: Arc<Container>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add a configuration unit; units run in the order they were added
    pub fn configuration(mut self, configuration: impl Configuration + 'static) -> Self {
        self.configurations.push(Box::new(configuration));
        self
    }

    /// Build the container, apply every configuration and pre-instantiate
    /// non-lazy singletons
    ///
    /// # Errors
    ///
    /// Returns the first registration or construction error.
    pub fn build(self) -> Result<Application> {
        tracing::info!("Starting application initialization...");

        let mut container = Container::with_settings(self.settings);
        if let Some(parent) = self.parent {
            container = container.with_parent(parent);
        }
        let container = Arc::new(container);
        let callbacks = LifecycleCallbacks::install(&container)?;
        let beans = FunctionalConfig::new(Arc::clone(&container), Arc::clone(&callbacks));

        for configuration in &self.configurations {
            beans.apply(configuration.as_ref())?;
        }
        container.refresh()?;

        tracing::info!(
            "Application initialization complete ({} beans)",
            container.len()
        );
        Ok(Application { beans, callbacks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContainerError;
    use crate::functional::BeanOptions;
    use std::sync::Mutex;

    struct Pool {
        size: usize,
    }

    struct PoolConfig {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Configuration for PoolConfig {
        fn configure(&self, beans: &FunctionalConfig) -> Result<()> {
            let pool = beans.bean(BeanOptions::named("pool").alias("db"), || {
                Ok(Pool { size: 4 })
            })?;
            beans.init(&pool, |mut pool| {
                pool.size *= 2;
                pool
            })?;
            let events = Arc::clone(&self.events);
            beans.destroy(&pool, move |pool| {
                events.lock().unwrap().push(format!("closed {}", pool.size));
            })?;
            Ok(())
        }
    }

    #[test]
    fn test_build_runs_configurations_and_refreshes() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let app = Application::builder()
            .configuration(PoolConfig {
                events: Arc::clone(&events),
            })
            .build()
            .unwrap();

        let described = app.container().describe();
        let pool = described.iter().find(|d| d.name == "pool").unwrap();
        assert!(pool.instantiated);
        assert_eq!(app.beans().get_bean::<Pool>("db").unwrap().size, 8);

        app.shutdown();
        assert_eq!(*events.lock().unwrap(), vec!["closed 8".to_string()]);
    }

    #[test]
    fn test_build_fails_on_eager_construction_error() {
        let result = Application::builder()
            .configuration(|beans: &FunctionalConfig| -> Result<()> {
                beans.bean(BeanOptions::named("bad"), || -> anyhow::Result<u8> {
                    anyhow::bail!("boom")
                })?;
                Ok(())
            })
            .build();
        assert!(matches!(result, Err(ContainerError::Construction { .. })));
    }

    #[test]
    fn test_parent_beans_visible() {
        let parent = Arc::new(Container::new());
        parent.register_singleton("region", String::from("eu")).unwrap();
        let app = Application::builder()
            .parent(parent)
            .configuration(|beans: &FunctionalConfig| -> Result<()> {
                let region = beans.get_bean::<String>("region")?;
                beans.bean(BeanOptions::named("endpoint"), move || {
                    Ok(format!("https://{}.example.com", region))
                })?;
                Ok(())
            })
            .build()
            .unwrap();
        assert_eq!(
            *app.beans().get_bean::<String>("endpoint").unwrap(),
            "https://eu.example.com"
        );
    }
}
