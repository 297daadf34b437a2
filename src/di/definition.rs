use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use strum_macros::{AsRefStr, Display, EnumString};

/// An owned, type-erased bean instance on its way through post-processing.
pub type BoxedBean = Box<dyn Any + Send + Sync>;

/// A shared, type-erased bean instance as held by the container.
pub type SharedBean = Arc<dyn Any + Send + Sync>;

pub(crate) type BeanFactory = Arc<dyn Fn() -> anyhow::Result<BoxedBean> + Send + Sync>;

/// Bean scope
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One shared instance per container
    #[default]
    Singleton,
    /// A fresh instance on every lookup
    Prototype,
}

#[derive(Clone)]
pub(crate) enum Instantiation {
    Factory(BeanFactory),
    /// Instance handed to the container ready-made; it is never re-created.
    Registered,
}

/// Describes how the container builds one named bean.
#[derive(Clone)]
pub struct BeanDefinition {
    name: String,
    scope: Scope,
    lazy_init: bool,
    type_id: TypeId,
    type_name: &'static str,
    pub(crate) instantiation: Instantiation,
}

impl BeanDefinition {
    /// A definition whose instances are produced by `factory`.
    pub fn from_factory<T, F>(name: impl Into<String>, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let factory: BeanFactory = Arc::new(move || Ok(Box::new(factory()?) as BoxedBean));
        Self {
            name: name.into(),
            scope: Scope::default(),
            lazy_init: false,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instantiation: Instantiation::Factory(factory),
        }
    }

    pub(crate) fn registered<T: Send + Sync + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: Scope::Singleton,
            lazy_init: false,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instantiation: Instantiation::Registered,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_lazy_init(mut self, lazy_init: bool) -> Self {
        self.lazy_init = lazy_init;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_lazy_init(&self) -> bool {
        self.lazy_init
    }

    pub fn declared_type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_type<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("lazy_init", &self.lazy_init)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Serializable snapshot of a registered bean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanDescriptor {
    pub name: String,
    pub aliases: Vec<String>,
    pub scope: Scope,
    pub lazy_init: bool,
    pub type_name: String,
    pub instantiated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_str() {
        assert_eq!("singleton".parse::<Scope>().unwrap(), Scope::Singleton);
        assert_eq!("Prototype".parse::<Scope>().unwrap(), Scope::Prototype);
        assert!("request".parse::<Scope>().is_err());
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Singleton.to_string(), "singleton");
        assert_eq!(Scope::Prototype.as_ref(), "prototype");
        assert_eq!(Scope::default(), Scope::Singleton);
    }

    #[test]
    fn test_definition_defaults() {
        let definition = BeanDefinition::from_factory("answer", || Ok(42u32));
        assert_eq!(definition.name(), "answer");
        assert_eq!(definition.scope(), Scope::Singleton);
        assert!(!definition.is_lazy_init());
        assert!(definition.is_type::<u32>());
        assert!(!definition.is_type::<i32>());
        assert_eq!(definition.type_name(), "u32");
    }
}
