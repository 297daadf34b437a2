use crate::config::ContainerSettings;
use crate::di::{BeanDefinition, BeanPostProcessor, Container};
use crate::error::Result;
use std::sync::Arc;

/// Builder for constructing a bean container
///
/// Use this to configure settings, a parent and ready-made beans before sharing the
/// container.
///
/// # Example
/// ```
/// use fnbeans::ContainerBuilder;
///
/// let container = ContainerBuilder::new()
///     .singleton("greeting", String::from("hello"))
///     .build()
///     .unwrap();
/// assert_eq!(*container.get_bean::<String>("greeting").unwrap(), "hello");
/// ```
pub struct ContainerBuilder {
    settings: ContainerSettings,
    parent: Option<Arc<Container>>,
    steps: Vec<Box<dyn FnOnce(&Container) -> Result<()>>>,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            settings: ContainerSettings::default(),
            parent: None,
            steps: Vec::new(),
        }
    }

    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn parent(mut self, parent: Arc<Container>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Register a ready-made singleton instance
    pub fn singleton<T: Send + Sync + 'static>(mut self, name: impl Into<String>, instance: T) -> Self {
        let name = name.into();
        self.steps
            .push(Box::new(move |container| container.register_singleton(name, instance)));
        self
    }

    /// Register a bean definition
    pub fn definition(mut self, definition: BeanDefinition) -> Self {
        self.steps
            .push(Box::new(move |container| container.register_definition(definition)));
        self
    }

    pub fn post_processor(mut self, processor: Arc<dyn BeanPostProcessor>) -> Self {
        self.steps.push(Box::new(move |container| {
            container.add_post_processor(processor);
            Ok(())
        }));
        self
    }

    /// Build the container, applying registrations in the order they were given
    pub fn build(self) -> Result<Arc<Container>> {
        let mut container = Container::with_settings(self.settings);
        if let Some(parent) = self.parent {
            container = container.with_parent(parent);
        }
        for step in self.steps {
            step(&container)?;
        }
        Ok(Arc::new(container))
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
