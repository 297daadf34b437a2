use crate::error::Result;
use crate::functional::FunctionalConfig;

/// A unit of bean registrations
///
/// # Example
/// ```
/// use fnbeans::{BeanOptions, Configuration, FunctionalConfig, Result};
///
/// struct DatabaseConfig;
///
/// impl Configuration for DatabaseConfig {
///     fn configure(&self, beans: &FunctionalConfig) -> Result<()> {
///         let url = beans.bean(BeanOptions::named("databaseUrl"), || {
///             Ok(String::from("postgres://localhost/app"))
///         })?;
///         beans.destroy(&url, |url| tracing::info!("Releasing {}", url))?;
///         Ok(())
///     }
/// }
/// ```
pub trait Configuration {
    fn configure(&self, beans: &FunctionalConfig) -> Result<()>;
}

impl<F> Configuration for F
where
    F: Fn(&FunctionalConfig) -> Result<()>,
{
    fn configure(&self, beans: &FunctionalConfig) -> Result<()> {
        self(beans)
    }
}
