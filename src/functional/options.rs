use crate::di::Scope;

/// Options for one bean registration.
///
/// Every field has a default: no name (one is generated), no aliases, singleton scope,
/// eager initialization.
///
/// ```
/// use fnbeans::{BeanOptions, Scope};
///
/// let options = BeanOptions::named("userRepository")
///     .alias("users")
///     .scope(Scope::Prototype)
///     .lazy_init(true);
/// assert_eq!(options.name_hint(), Some("userRepository"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeanOptions {
    pub(crate) name: Option<String>,
    pub(crate) aliases: Vec<String>,
    pub(crate) scope: Scope,
    pub(crate) lazy_init: bool,
}

impl BeanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new().name(name)
    }

    /// An empty name behaves as no name at all.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn lazy_init(mut self, lazy_init: bool) -> Self {
        self.lazy_init = lazy_init;
        self
    }

    pub fn name_hint(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn alias_list(&self) -> &[String] {
        &self.aliases
    }

    pub fn scope_value(&self) -> Scope {
        self.scope
    }

    pub fn is_lazy_init(&self) -> bool {
        self.lazy_init
    }
}
