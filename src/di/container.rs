use crate::config::ContainerSettings;
use crate::di::definition::Instantiation;
use crate::di::naming::generate_name;
use crate::di::{BeanDefinition, BeanDescriptor, BeanPostProcessor, BoxedBean, Scope, SharedBean};
use crate::error::{ContainerError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, ThreadId};

/// Thread-safe bean container.
///
/// Beans are registered by name as [`BeanDefinition`]s and resolved by name and
/// expected type. Singletons are created on first lookup (or on [`refresh`](Self::refresh)
/// unless lazy) and cached until [`close`](Self::close); prototypes are created on every
/// lookup. Names not defined locally are looked up in the parent container, if any.
pub struct Container {
    settings: ContainerSettings,
    parent: Option<Arc<Container>>,
    definitions: DashMap<String, BeanDefinition>,
    registration_order: Mutex<Vec<String>>,
    aliases: DashMap<String, String>,
    singletons: DashMap<String, SharedBean>,
    creation_order: Mutex<Vec<String>>,
    in_creation: DashMap<String, ThreadId>,
    post_processors: RwLock<Vec<Arc<dyn BeanPostProcessor>>>,
    closed: AtomicBool,
}

impl Container {
    pub fn new() -> Self {
        Self::with_settings(ContainerSettings::default())
    }

    pub fn with_settings(settings: ContainerSettings) -> Self {
        Self {
            settings,
            parent: None,
            definitions: DashMap::new(),
            registration_order: Mutex::new(Vec::new()),
            aliases: DashMap::new(),
            singletons: DashMap::new(),
            creation_order: Mutex::new(Vec::new()),
            in_creation: DashMap::new(),
            post_processors: RwLock::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Falls back to `parent` for names this container does not define.
    pub fn with_parent(mut self, parent: Arc<Container>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    pub fn parent(&self) -> Option<&Arc<Container>> {
        self.parent.as_ref()
    }

    /// Registers `definition` under its name.
    ///
    /// # Errors
    /// [`ContainerError::DefinitionOverride`] if the name is taken and overriding is disabled.
    pub fn register_definition(&self, definition: BeanDefinition) -> Result<()> {
        self.ensure_open()?;
        let name = definition.name().to_string();
        if self.aliases.contains_key(&name) {
            if !self.settings.allow_definition_overriding {
                return Err(ContainerError::DefinitionOverride { name });
            }
            self.aliases.remove(&name);
        }

        match self.definitions.entry(name.clone()) {
            Entry::Occupied(mut entry) => {
                if !self.settings.allow_definition_overriding {
                    return Err(ContainerError::DefinitionOverride { name });
                }
                tracing::warn!(
                    "Overriding bean definition '{}' ({} -> {})",
                    name,
                    entry.get().type_name(),
                    definition.type_name()
                );
                entry.insert(definition);
            }
            Entry::Vacant(entry) => {
                tracing::debug!(
                    "Registering bean '{}' [{}, scope={}, lazy={}]",
                    name,
                    definition.type_name(),
                    definition.scope(),
                    definition.is_lazy_init()
                );
                entry.insert(definition);
                lock(&self.registration_order).push(name.clone());
                return Ok(());
            }
        }

        if let Some((_, replaced)) = self.singletons.remove(&name) {
            lock(&self.creation_order).retain(|n| n != &name);
            self.destroy_bean(&name, &replaced, &self.post_processors());
        }
        Ok(())
    }

    /// Registers a ready-made singleton. It skips post-processing but still takes part
    /// in destruction on [`close`](Self::close).
    pub fn register_singleton<T: Send + Sync + 'static>(
        &self,
        name: impl Into<String>,
        instance: T,
    ) -> Result<()> {
        self.register_shared(name, Arc::new(instance))
    }

    /// Like [`register_singleton`](Self::register_singleton), for an instance the caller
    /// keeps sharing. Lookups return the same `Arc`.
    pub fn register_shared<T: Send + Sync + 'static>(
        &self,
        name: impl Into<String>,
        instance: Arc<T>,
    ) -> Result<()> {
        let name = name.into();
        self.register_definition(BeanDefinition::registered::<T>(name.clone()))?;
        self.singletons.insert(name.clone(), instance);
        lock(&self.creation_order).push(name);
        Ok(())
    }

    /// Binds `alias` to the bean called `name`.
    ///
    /// An alias equal to `name` is dropped. Re-binding an alias to the same name is a no-op.
    pub fn register_alias(&self, name: &str, alias: &str) -> Result<()> {
        self.ensure_open()?;
        if alias == name {
            self.aliases.remove(alias);
            return Ok(());
        }
        if self.definitions.contains_key(alias) {
            return Err(ContainerError::AliasConflict {
                alias: alias.to_string(),
                name: name.to_string(),
                existing: alias.to_string(),
            });
        }
        if let Some(existing) = self.aliases.get(alias).map(|e| e.value().clone()) {
            if existing == name {
                return Ok(());
            }
            if !self.settings.allow_alias_overriding {
                return Err(ContainerError::AliasConflict {
                    alias: alias.to_string(),
                    name: name.to_string(),
                    existing,
                });
            }
            tracing::warn!("Rebinding alias '{}' from '{}' to '{}'", alias, existing, name);
        }
        if self.alias_chain_reaches(name, alias) {
            return Err(ContainerError::AliasCycle {
                alias: alias.to_string(),
                name: name.to_string(),
            });
        }

        tracing::debug!("Registering alias '{}' for bean '{}'", alias, name);
        self.aliases.insert(alias.to_string(), name.to_string());
        Ok(())
    }

    /// Resolves aliases (transitively) down to a definition name.
    pub fn canonical_name(&self, name: &str) -> String {
        let mut current = name.to_string();
        while let Some(target) = self.aliases.get(&current).map(|t| t.value().clone()) {
            current = target;
        }
        current
    }

    /// All aliases resolving to `name`, sorted.
    pub fn aliases(&self, name: &str) -> Vec<String> {
        let canonical = self.canonical_name(name);
        let all: Vec<String> = self.aliases.iter().map(|entry| entry.key().clone()).collect();
        let mut found: Vec<String> = all
            .into_iter()
            .filter(|alias| alias != name && self.canonical_name(alias) == canonical)
            .collect();
        found.sort();
        found
    }

    /// Generates a name for a bean of type `type_name` that is not used by any
    /// definition or alias of this container.
    pub fn generate_bean_name(&self, type_name: &str) -> String {
        generate_name(type_name, |candidate| {
            self.definitions.contains_key(candidate) || self.aliases.contains_key(candidate)
        })
    }

    /// Looks up the bean `name` as a `T`.
    ///
    /// # Errors
    /// - [`ContainerError::NoSuchBean`] if neither this container nor an ancestor defines it
    /// - [`ContainerError::TypeMismatch`] if the bean is not a `T`
    /// - [`ContainerError::Construction`] if its factory fails
    pub fn get_bean<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        self.ensure_open()?;
        let canonical = self.canonical_name(name);
        let Some(definition) = self.definitions.get(&canonical).map(|d| d.value().clone()) else {
            return match &self.parent {
                Some(parent) => parent.get_bean::<T>(&canonical),
                None => Err(ContainerError::no_such_bean(name)),
            };
        };

        if !definition.is_type::<T>() {
            return Err(ContainerError::type_mismatch::<T>(
                canonical,
                definition.type_name(),
            ));
        }

        self.instance_for(&definition)?
            .downcast::<T>()
            .map_err(|_| ContainerError::type_mismatch::<T>(canonical, definition.type_name()))
    }

    /// Every locally defined bean declared as a `T`, in registration order.
    pub fn find_all_of_type<T: Send + Sync + 'static>(&self) -> Result<Vec<(String, Arc<T>)>> {
        self.bean_definition_names()
            .into_iter()
            .filter(|name| {
                self.definitions
                    .get(name)
                    .is_some_and(|definition| definition.is_type::<T>())
            })
            .map(|name| -> Result<(String, Arc<T>)> {
                let bean = self.get_bean::<T>(&name)?;
                Ok((name, bean))
            })
            .collect()
    }

    pub fn contains_bean(&self, name: &str) -> bool {
        let canonical = self.canonical_name(name);
        self.definitions.contains_key(&canonical)
            || self.parent.as_ref().is_some_and(|p| p.contains_bean(&canonical))
    }

    pub fn is_singleton(&self, name: &str) -> Result<bool> {
        Ok(self.scope_of(name)? == Scope::Singleton)
    }

    pub fn is_prototype(&self, name: &str) -> Result<bool> {
        Ok(self.scope_of(name)? == Scope::Prototype)
    }

    fn scope_of(&self, name: &str) -> Result<Scope> {
        let canonical = self.canonical_name(name);
        match self.definitions.get(&canonical) {
            Some(definition) => Ok(definition.scope()),
            None => match &self.parent {
                Some(parent) => parent.scope_of(&canonical),
                None => Err(ContainerError::no_such_bean(name)),
            },
        }
    }

    pub fn bean_definition(&self, name: &str) -> Option<BeanDefinition> {
        self.definitions
            .get(&self.canonical_name(name))
            .map(|d| d.value().clone())
    }

    /// Names of local definitions in registration order.
    pub fn bean_definition_names(&self) -> Vec<String> {
        lock(&self.registration_order).clone()
    }

    pub fn describe(&self) -> Vec<BeanDescriptor> {
        self.bean_definition_names()
            .into_iter()
            .filter_map(|name| {
                let definition = self.bean_definition(&name)?;
                Some(BeanDescriptor {
                    aliases: self.aliases(&name),
                    scope: definition.scope(),
                    lazy_init: definition.is_lazy_init(),
                    type_name: definition.type_name().to_string(),
                    instantiated: self.singletons.contains_key(&name),
                    name,
                })
            })
            .collect()
    }

    pub fn add_post_processor(&self, processor: Arc<dyn BeanPostProcessor>) {
        self.post_processors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(processor);
    }

    /// Instantiates every non-lazy singleton, in registration order.
    pub fn refresh(&self) -> Result<()> {
        self.ensure_open()?;
        tracing::info!("Pre-instantiating singletons...");

        let mut created = 0;
        for name in self.bean_definition_names() {
            let Some(definition) = self.bean_definition(&name) else {
                continue;
            };
            if definition.scope() == Scope::Singleton && !definition.is_lazy_init() {
                self.instance_for(&definition)?;
                created += 1;
            }
        }

        tracing::info!("Refresh complete ({} singletons ready)", created);
        Ok(())
    }

    /// Destroys cached singletons in reverse creation order. Runs once; later calls are
    /// no-ops and later lookups fail with [`ContainerError::ContainerClosed`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Closing container...");

        let order = std::mem::take(&mut *lock(&self.creation_order));
        let processors = self.post_processors();
        let mut destroyed = 0;
        for name in order.iter().rev() {
            let Some((_, bean)) = self.singletons.remove(name) else {
                continue;
            };
            self.destroy_bean(name, &bean, &processors);
            destroyed += 1;
        }
        self.singletons.clear();

        tracing::info!("Container closed ({} singletons released)", destroyed);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(ContainerError::ContainerClosed);
        }
        Ok(())
    }

    fn destroy_bean(
        &self,
        name: &str,
        bean: &SharedBean,
        processors: &[Arc<dyn BeanPostProcessor>],
    ) {
        for processor in processors.iter().filter(|p| p.requires_destruction(name)) {
            tracing::debug!("Destroying: {}", name);
            if let Err(e) = processor.post_process_before_destruction(name, bean) {
                // Log error but continue with other beans
                tracing::error!("Destruction failed for {}: {}", name, e);
            }
        }
    }

    fn alias_chain_reaches(&self, start: &str, target: &str) -> bool {
        let mut current = start.to_string();
        loop {
            if current == target {
                return true;
            }
            match self.aliases.get(&current).map(|t| t.value().clone()) {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    fn post_processors(&self) -> Vec<Arc<dyn BeanPostProcessor>> {
        self.post_processors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn instance_for(&self, definition: &BeanDefinition) -> Result<SharedBean> {
        let name = definition.name();
        match definition.scope() {
            Scope::Prototype => Ok(Arc::from(self.create_bean(definition)?)),
            Scope::Singleton => {
                if let Some(existing) = self.singletons.get(name) {
                    return Ok(existing.value().clone());
                }
                let created: SharedBean = Arc::from(self.create_bean(definition)?);
                // Another thread may have won the race; keep the first instance.
                let bean = match self.singletons.entry(name.to_string()) {
                    Entry::Occupied(entry) => entry.get().clone(),
                    Entry::Vacant(entry) => {
                        entry.insert(created.clone());
                        lock(&self.creation_order).push(name.to_string());
                        created
                    }
                };
                Ok(bean)
            }
        }
    }

    fn create_bean(&self, definition: &BeanDefinition) -> Result<BoxedBean> {
        let name = definition.name();
        let Instantiation::Factory(factory) = &definition.instantiation else {
            return Err(ContainerError::no_such_bean(name));
        };
        let _guard = CreationGuard::enter(&self.in_creation, name)?;

        tracing::debug!("Creating bean '{}'", name);
        let mut bean = factory().map_err(|source| ContainerError::Construction {
            name: name.to_string(),
            source,
        })?;
        for processor in self.post_processors() {
            bean = processor.post_process_after_initialization(name, bean)?;
        }
        Ok(bean)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a bean as being created by the current thread for as long as it lives.
struct CreationGuard<'a> {
    in_creation: &'a DashMap<String, ThreadId>,
    name: Option<String>,
}

impl<'a> CreationGuard<'a> {
    fn enter(in_creation: &'a DashMap<String, ThreadId>, name: &str) -> Result<Self> {
        let current = thread::current().id();
        let owned = match in_creation.entry(name.to_string()) {
            Entry::Occupied(entry) if *entry.get() == current => {
                return Err(ContainerError::CircularReference {
                    name: name.to_string(),
                });
            }
            // Created concurrently by another thread.
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                entry.insert(current);
                Some(name.to_string())
            }
        };
        Ok(Self {
            in_creation,
            name: owned,
        })
    }
}

impl Drop for CreationGuard<'_> {
    fn drop(&mut self) {
        if let Some(name) = self.name.take() {
            self.in_creation.remove(&name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, PartialEq)]
    struct TestService {
        value: i32,
    }

    #[derive(Default)]
    struct RecordingProcessor {
        destroyed: Mutex<Vec<String>>,
    }

    impl BeanPostProcessor for RecordingProcessor {
        fn requires_destruction(&self, _name: &str) -> bool {
            true
        }

        fn post_process_before_destruction(&self, name: &str, _bean: &SharedBean) -> Result<()> {
            self.destroyed.lock().unwrap().push(name.to_string());
            Ok(())
        }
    }

    fn service_definition(name: &str, value: i32) -> BeanDefinition {
        BeanDefinition::from_factory(name, move || Ok(TestService { value }))
    }

    #[test]
    fn test_register_and_resolve() {
        let container = Container::new();
        container
            .register_definition(service_definition("service", 42))
            .unwrap();
        let service = container.get_bean::<TestService>("service").unwrap();
        assert_eq!(service.value, 42);
    }

    #[test]
    fn test_singleton_is_cached() {
        let container = Container::new();
        container
            .register_definition(service_definition("service", 1))
            .unwrap();
        let first = container.get_bean::<TestService>("service").unwrap();
        let second = container.get_bean::<TestService>("service").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_prototype_is_created_per_lookup() {
        let container = Container::new();
        container
            .register_definition(service_definition("service", 7).with_scope(Scope::Prototype))
            .unwrap();
        let first = container.get_bean::<TestService>("service").unwrap();
        let second = container.get_bean::<TestService>("service").unwrap();
        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(container.is_prototype("service").unwrap());
    }

    #[test]
    fn test_missing_bean() {
        let container = Container::new();
        let err = container.get_bean::<TestService>("nope").unwrap_err();
        assert!(matches!(err, ContainerError::NoSuchBean { name } if name == "nope"));
    }

    #[test]
    fn test_type_mismatch_does_not_construct() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let container = Container::new();
        container
            .register_definition(BeanDefinition::from_factory("number", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(5i32)
            }))
            .unwrap();

        let err = container.get_bean::<String>("number").unwrap_err();
        assert!(matches!(err, ContainerError::TypeMismatch { ref actual, .. } if actual == "i32"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_construction_failure_propagates() {
        let container = Container::new();
        container
            .register_definition(BeanDefinition::from_factory::<TestService, _>(
                "broken",
                || Err(anyhow::anyhow!("database unreachable")),
            ))
            .unwrap();
        let err = container.get_bean::<TestService>("broken").unwrap_err();
        match err {
            ContainerError::Construction { name, source } => {
                assert_eq!(name, "broken");
                assert_eq!(source.to_string(), "database unreachable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let container = Container::new();
        container
            .register_definition(service_definition("service", 1))
            .unwrap();
        let err = container
            .register_definition(service_definition("service", 2))
            .unwrap_err();
        assert!(matches!(err, ContainerError::DefinitionOverride { .. }));
    }

    #[test]
    fn test_definition_overriding_replaces_singleton() {
        let container = Container::with_settings(ContainerSettings {
            allow_definition_overriding: true,
            ..Default::default()
        });
        container
            .register_definition(service_definition("service", 1))
            .unwrap();
        assert_eq!(container.get_bean::<TestService>("service").unwrap().value, 1);

        container
            .register_definition(service_definition("service", 2))
            .unwrap();
        assert_eq!(container.get_bean::<TestService>("service").unwrap().value, 2);
        assert_eq!(container.bean_definition_names(), vec!["service".to_string()]);
    }

    #[test]
    fn test_alias_resolution() {
        let container = Container::new();
        container
            .register_definition(service_definition("service", 3))
            .unwrap();
        container.register_alias("service", "svc").unwrap();
        container.register_alias("svc", "s").unwrap();

        let by_name = container.get_bean::<TestService>("service").unwrap();
        let by_alias = container.get_bean::<TestService>("s").unwrap();
        assert!(Arc::ptr_eq(&by_name, &by_alias));
        assert_eq!(container.aliases("service"), vec!["s".to_string(), "svc".to_string()]);
        assert!(container.contains_bean("svc"));
    }

    #[test]
    fn test_alias_conflict() {
        let container = Container::new();
        container.register_definition(service_definition("a", 1)).unwrap();
        container.register_definition(service_definition("b", 2)).unwrap();
        container.register_alias("a", "shared").unwrap();
        container.register_alias("a", "shared").unwrap();

        let err = container.register_alias("b", "shared").unwrap_err();
        assert!(matches!(err, ContainerError::AliasConflict { ref existing, .. } if existing == "a"));

        let err = container.register_alias("a", "b").unwrap_err();
        assert!(matches!(err, ContainerError::AliasConflict { .. }));
    }

    #[test]
    fn test_alias_overriding_allowed() {
        let container = Container::with_settings(ContainerSettings {
            allow_alias_overriding: true,
            ..Default::default()
        });
        container.register_definition(service_definition("a", 1)).unwrap();
        container.register_definition(service_definition("b", 2)).unwrap();
        container.register_alias("a", "shared").unwrap();
        container.register_alias("b", "shared").unwrap();
        assert_eq!(container.get_bean::<TestService>("shared").unwrap().value, 2);
    }

    #[test]
    fn test_alias_cycle_rejected() {
        let container = Container::new();
        container.register_alias("x", "y").unwrap();
        let err = container.register_alias("y", "x").unwrap_err();
        assert!(matches!(err, ContainerError::AliasCycle { .. }));
    }

    #[test]
    fn test_generated_names_are_unique() {
        let container = Container::new();
        let type_name = std::any::type_name::<TestService>();
        let first = container.generate_bean_name(type_name);
        container
            .register_definition(service_definition(&first, 1))
            .unwrap();
        let second = container.generate_bean_name(type_name);
        assert_ne!(first, second);
        assert_eq!(first, format!("{type_name}#0"));
        assert_eq!(second, format!("{type_name}#1"));
    }

    #[test]
    fn test_parent_fallback() {
        let parent = Arc::new(Container::new());
        parent
            .register_definition(service_definition("shared", 10))
            .unwrap();
        let child = Container::new().with_parent(Arc::clone(&parent));
        child.register_definition(service_definition("local", 20)).unwrap();

        assert_eq!(child.get_bean::<TestService>("shared").unwrap().value, 10);
        assert_eq!(child.get_bean::<TestService>("local").unwrap().value, 20);
        assert!(parent.get_bean::<TestService>("local").is_err());
        assert!(child.is_singleton("shared").unwrap());

        child.register_alias("shared", "s").unwrap();
        assert!(child.contains_bean("s"));
        assert!(child.is_singleton("s").unwrap());
        let by_alias = child.get_bean::<TestService>("s").unwrap();
        let by_name = parent.get_bean::<TestService>("shared").unwrap();
        assert!(Arc::ptr_eq(&by_alias, &by_name));
    }

    #[test]
    fn test_refresh_skips_lazy_singletons() {
        let eager = Arc::new(AtomicUsize::new(0));
        let lazy = Arc::new(AtomicUsize::new(0));
        let container = Container::new();
        let counter = Arc::clone(&eager);
        container
            .register_definition(BeanDefinition::from_factory("eager", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(1u8)
            }))
            .unwrap();
        let counter = Arc::clone(&lazy);
        container
            .register_definition(
                BeanDefinition::from_factory("lazy", move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(2u8)
                })
                .with_lazy_init(true),
            )
            .unwrap();

        container.refresh().unwrap();
        assert_eq!(eager.load(Ordering::SeqCst), 1);
        assert_eq!(lazy.load(Ordering::SeqCst), 0);

        container.get_bean::<u8>("eager").unwrap();
        container.get_bean::<u8>("lazy").unwrap();
        assert_eq!(eager.load(Ordering::SeqCst), 1);
        assert_eq!(lazy.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_destroys_in_reverse_creation_order() {
        let processor = Arc::new(RecordingProcessor::default());
        let container = Container::new();
        container.add_post_processor(processor.clone());
        container.register_definition(service_definition("first", 1)).unwrap();
        container.register_definition(service_definition("second", 2)).unwrap();
        container.register_singleton("manual", 3u64).unwrap();

        container.get_bean::<TestService>("second").unwrap();
        container.get_bean::<TestService>("first").unwrap();

        container.close();
        container.close();
        assert_eq!(
            *processor.destroyed.lock().unwrap(),
            vec!["first".to_string(), "second".to_string(), "manual".to_string()]
        );
        assert!(matches!(
            container.get_bean::<TestService>("first"),
            Err(ContainerError::ContainerClosed)
        ));
    }

    #[test]
    fn test_overridden_singleton_is_destroyed() {
        #[derive(Default)]
        struct ValueRecorder {
            values: Mutex<Vec<u32>>,
        }

        impl BeanPostProcessor for ValueRecorder {
            fn requires_destruction(&self, name: &str) -> bool {
                name == "b"
            }

            fn post_process_before_destruction(&self, _name: &str, bean: &SharedBean) -> Result<()> {
                if let Some(value) = (**bean).downcast_ref::<u32>() {
                    self.values.lock().unwrap().push(*value);
                }
                Ok(())
            }
        }

        let recorder = Arc::new(ValueRecorder::default());
        let container = Container::with_settings(ContainerSettings {
            allow_definition_overriding: true,
            ..Default::default()
        });
        container.add_post_processor(recorder.clone());

        container
            .register_definition(BeanDefinition::from_factory("b", || Ok(1u32)))
            .unwrap();
        assert_eq!(*container.get_bean::<u32>("b").unwrap(), 1);
        container
            .register_definition(BeanDefinition::from_factory("b", || Ok(2u32)))
            .unwrap();
        assert_eq!(*recorder.values.lock().unwrap(), vec![1]);

        assert_eq!(*container.get_bean::<u32>("b").unwrap(), 2);
        container.close();
        assert_eq!(*recorder.values.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_registration_after_close_rejected() {
        let container = Container::new();
        container.register_definition(service_definition("early", 1)).unwrap();
        container.close();

        assert!(matches!(
            container.register_definition(service_definition("late", 2)),
            Err(ContainerError::ContainerClosed)
        ));
        assert!(matches!(
            container.register_alias("early", "e"),
            Err(ContainerError::ContainerClosed)
        ));
        assert!(matches!(
            container.register_singleton("manual", 3u8),
            Err(ContainerError::ContainerClosed)
        ));
        assert!(!container.contains_bean("late"));
    }

    #[test]
    fn test_circular_reference_detected() {
        let container = Arc::new(Container::new());
        let inner = Arc::clone(&container);
        container
            .register_definition(BeanDefinition::from_factory("loop", move || {
                let again = inner.get_bean::<u32>("loop")?;
                Ok(*again)
            }))
            .unwrap();

        let err = container.get_bean::<u32>("loop").unwrap_err();
        match err {
            ContainerError::Construction { source, .. } => assert!(matches!(
                source.downcast_ref::<ContainerError>(),
                Some(ContainerError::CircularReference { .. })
            )),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_find_all_of_type() {
        let container = Container::new();
        container.register_definition(service_definition("a", 1)).unwrap();
        container
            .register_definition(BeanDefinition::from_factory("other", || Ok(0u8)))
            .unwrap();
        container.register_definition(service_definition("b", 2)).unwrap();

        let found = container.find_all_of_type::<TestService>().unwrap();
        let names: Vec<_> = found.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(container.find_all_of_type::<String>().unwrap().is_empty());
    }

    #[test]
    fn test_describe_serializes() {
        let container = Container::new();
        container
            .register_definition(service_definition("service", 1).with_lazy_init(true))
            .unwrap();
        container.register_alias("service", "svc").unwrap();

        let descriptors = container.describe();
        assert_eq!(descriptors.len(), 1);
        assert!(!descriptors[0].instantiated);
        let json = serde_json::to_value(&descriptors[0]).unwrap();
        assert_eq!(json["scope"], "singleton");
        assert_eq!(json["aliases"][0], "svc");
        assert_eq!(json["lazy_init"], true);
    }
}
