use crate::di::Container;
use crate::error::Result;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed handle to a registered bean.
///
/// Holds the bean's name and the container it lives in; it never holds the instance.
/// Use it to attach lifecycle callbacks or to look the bean up again.
pub struct BeanRef<T> {
    name: String,
    container: Arc<Container>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> BeanRef<T> {
    pub(crate) fn new(name: String, container: Arc<Container>) -> Self {
        Self {
            name,
            container,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Looks the bean up. Singletons yield the cached instance, prototypes a new one.
    pub fn get(&self) -> Result<Arc<T>> {
        self.container.get_bean::<T>(&self.name)
    }
}

impl<T> Clone for BeanRef<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            container: Arc::clone(&self.container),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for BeanRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanRef")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
