//! Lifecycle callback processor
//!
//! Holds the init and destroy functions registered per bean name and applies them
//! as a [`BeanPostProcessor`].

use crate::di::{BeanPostProcessor, BoxedBean, Container, SharedBean};
use crate::error::{ContainerError, Result};
use dashmap::DashMap;
use std::sync::Arc;

type InitFn = Arc<dyn Fn(&str, BoxedBean) -> Result<BoxedBean> + Send + Sync>;
type DestroyFn = Arc<dyn Fn(&str, &SharedBean) -> Result<()> + Send + Sync>;

/// Container-wide registry of init and destroy callbacks keyed by bean name.
///
/// Init functions run right after a bean is constructed, in registration order; each
/// receives the current instance and its return value replaces it. Destroy functions
/// run when the container closes, in registration order, for cached singletons only.
///
/// # Example
///
/// ```rust
/// use fnbeans::{BeanDefinition, Container, LifecycleCallbacks};
///
/// let container = Container::new();
/// let callbacks = LifecycleCallbacks::install(&container).unwrap();
/// container
///     .register_definition(BeanDefinition::from_factory("five", || Ok(5i32)))
///     .unwrap();
/// callbacks.register_init::<i32, _>("five", |x| x + 1);
/// assert_eq!(*container.get_bean::<i32>("five").unwrap(), 6);
/// ```
#[derive(Default)]
pub struct LifecycleCallbacks {
    init: DashMap<String, Vec<InitFn>>,
    destroy: DashMap<String, Vec<DestroyFn>>,
}

impl LifecycleCallbacks {
    /// Bean name under which [`install`](Self::install) registers the processor.
    pub const BEAN_NAME: &'static str = "lifecycleCallbacks";

    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a processor, registers it as bean [`BEAN_NAME`](Self::BEAN_NAME) and as
    /// a post-processor of `container`.
    pub fn install(container: &Container) -> Result<Arc<Self>> {
        let callbacks = Arc::new(Self::new());
        container.register_shared(Self::BEAN_NAME, Arc::clone(&callbacks))?;
        container.add_post_processor(callbacks.clone());
        Ok(callbacks)
    }

    /// Adds `f` to the init functions of bean `name`.
    pub fn register_init<T, F>(&self, name: &str, f: F)
    where
        T: Send + Sync + 'static,
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        let callback: InitFn = Arc::new(move |name: &str, bean: BoxedBean| -> Result<BoxedBean> {
            let value = bean.downcast::<T>().map_err(|_| {
                ContainerError::type_mismatch::<T>(name, "a different type")
            })?;
            Ok(Box::new(f(*value)) as BoxedBean)
        });
        tracing::debug!("Registering init callback for '{}'", name);
        self.init.entry(name.to_string()).or_default().push(callback);
    }

    /// Adds `f` to the destroy functions of bean `name`.
    pub fn register_destroy<T, F>(&self, name: &str, f: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: DestroyFn = Arc::new(move |name: &str, bean: &SharedBean| -> Result<()> {
            let value = (**bean).downcast_ref::<T>().ok_or_else(|| {
                ContainerError::type_mismatch::<T>(name, "a different type")
            })?;
            f(value);
            Ok(())
        });
        tracing::debug!("Registering destroy callback for '{}'", name);
        self.destroy
            .entry(name.to_string())
            .or_default()
            .push(callback);
    }

    pub fn init_callback_count(&self, name: &str) -> usize {
        self.init.get(name).map_or(0, |c| c.len())
    }

    pub fn destroy_callback_count(&self, name: &str) -> usize {
        self.destroy.get(name).map_or(0, |c| c.len())
    }

    fn init_callbacks(&self, name: &str) -> Vec<InitFn> {
        self.init.get(name).map(|c| c.clone()).unwrap_or_default()
    }

    fn destroy_callbacks(&self, name: &str) -> Vec<DestroyFn> {
        self.destroy.get(name).map(|c| c.clone()).unwrap_or_default()
    }
}

impl BeanPostProcessor for LifecycleCallbacks {
    fn post_process_after_initialization(&self, name: &str, mut bean: BoxedBean) -> Result<BoxedBean> {
        for callback in self.init_callbacks(name) {
            tracing::debug!("Initializing: {}", name);
            bean = callback(name, bean)?;
        }
        Ok(bean)
    }

    fn requires_destruction(&self, name: &str) -> bool {
        self.destroy.contains_key(name)
    }

    fn post_process_before_destruction(&self, name: &str, bean: &SharedBean) -> Result<()> {
        let mut first_error = None;
        for callback in self.destroy_callbacks(name) {
            if let Err(e) = callback(name, bean) {
                // Log error but continue with the remaining callbacks
                tracing::error!("Destroy callback failed for {}: {}", name, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
