//! Functional bean registration
//!
//! [`FunctionalConfig`] turns closures into managed beans:
//!
//! ```rust
//! use fnbeans::{BeanOptions, Container, FunctionalConfig, LifecycleCallbacks};
//! use std::sync::Arc;
//!
//! let container = Arc::new(Container::new());
//! let callbacks = LifecycleCallbacks::install(&container).unwrap();
//! let beans = FunctionalConfig::new(Arc::clone(&container), callbacks);
//!
//! let five = beans.bean(BeanOptions::named("five"), || Ok(5i32)).unwrap();
//! beans.init(&five, |x| x + 1).unwrap();
//! assert_eq!(*beans.get_bean::<i32>("five").unwrap(), 6);
//! ```

mod configuration;
mod handle;
mod options;

pub use configuration::Configuration;
pub use handle::BeanRef;
pub use options::BeanOptions;

use crate::di::{BeanDefinition, Container, Scope};
use crate::error::{ContainerError, Result};
use crate::lifecycle::LifecycleCallbacks;
use std::sync::Arc;

#[derive(Clone)]
enum CallbackSource {
    Explicit(Arc<LifecycleCallbacks>),
    Discover,
}

/// Registration facade over a [`Container`].
#[derive(Clone)]
pub struct FunctionalConfig {
    container: Arc<Container>,
    callbacks: CallbackSource,
}

impl FunctionalConfig {
    /// A facade whose `init`/`destroy` calls go to `callbacks`.
    pub fn new(container: Arc<Container>, callbacks: Arc<LifecycleCallbacks>) -> Self {
        Self {
            container,
            callbacks: CallbackSource::Explicit(callbacks),
        }
    }

    /// A facade that looks up the container's [`LifecycleCallbacks`] bean each time
    /// `init` or `destroy` is called. Exactly one must be defined.
    pub fn discovering(container: Arc<Container>) -> Self {
        Self {
            container,
            callbacks: CallbackSource::Discover,
        }
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Looks up bean `name` as a `T`, searching parent containers as well.
    pub fn get_bean<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.container.get_bean::<T>(name)
    }

    /// Registers `factory` as bean of type `T` and returns a handle to it.
    ///
    /// Without a name, one is generated from `T`. The factory is not invoked here.
    pub fn bean<T, F>(&self, options: BeanOptions, factory: F) -> Result<BeanRef<T>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let BeanOptions {
            name,
            aliases,
            scope,
            lazy_init,
        } = options;

        let name = match name {
            Some(name) => name,
            None => self
                .container
                .generate_bean_name(std::any::type_name::<T>()),
        };
        let definition = BeanDefinition::from_factory(name.clone(), factory)
            .with_scope(scope)
            .with_lazy_init(lazy_init);
        self.container.register_definition(definition)?;
        for alias in &aliases {
            self.container.register_alias(&name, alias)?;
        }

        Ok(BeanRef::new(name, Arc::clone(&self.container)))
    }

    /// Registers `factory` as a singleton and returns its instance.
    ///
    /// The scope carried by `options` is replaced with [`Scope::Singleton`].
    pub fn singleton<T, F>(&self, options: BeanOptions, factory: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.bean(options.scope(Scope::Singleton), factory)?.get()
    }

    /// Registers `factory` as a prototype and returns a handle to it.
    ///
    /// The scope carried by `options` is replaced with [`Scope::Prototype`].
    pub fn prototype<T, F>(&self, options: BeanOptions, factory: F) -> Result<BeanRef<T>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.bean(options.scope(Scope::Prototype), factory)
    }

    /// Runs `f` on every new instance of `bean`; its result replaces the instance.
    ///
    /// Instances created before this call are not affected.
    pub fn init<T, F>(&self, bean: &BeanRef<T>, f: F) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.lifecycle_callbacks()?.register_init(bean.name(), f);
        Ok(())
    }

    /// Runs `f` on the cached instance of `bean` when the container closes.
    pub fn destroy<T, F>(&self, bean: &BeanRef<T>, f: F) -> Result<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.lifecycle_callbacks()?.register_destroy(bean.name(), f);
        Ok(())
    }

    /// Runs `configuration` against this facade.
    pub fn apply(&self, configuration: &dyn Configuration) -> Result<()> {
        configuration.configure(self)
    }

    fn lifecycle_callbacks(&self) -> Result<Arc<LifecycleCallbacks>> {
        match &self.callbacks {
            CallbackSource::Explicit(callbacks) => Ok(Arc::clone(callbacks)),
            CallbackSource::Discover => {
                let mut found = self.container.find_all_of_type::<LifecycleCallbacks>()?;
                if found.len() != 1 {
                    return Err(ContainerError::LifecycleProcessorCount { found: found.len() });
                }
                let (_, callbacks) = found.remove(0);
                Ok(callbacks)
            }
        }
    }
}
