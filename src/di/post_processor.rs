use crate::di::{BoxedBean, SharedBean};
use crate::error::Result;

/// Hook into bean creation and destruction.
///
/// Every instance the container creates, singleton or prototype, is passed through
/// [`post_process_after_initialization`](Self::post_process_after_initialization) of
/// each registered processor, in registration order. The value returned replaces the
/// instance. When the container closes, cached singletons for which
/// [`requires_destruction`](Self::requires_destruction) answers `true` are handed to
/// [`post_process_before_destruction`](Self::post_process_before_destruction).
pub trait BeanPostProcessor: Send + Sync {
    fn post_process_after_initialization(&self, _name: &str, bean: BoxedBean) -> Result<BoxedBean> {
        Ok(bean)
    }

    fn requires_destruction(&self, _name: &str) -> bool {
        false
    }

    fn post_process_before_destruction(&self, _name: &str, _bean: &SharedBean) -> Result<()> {
        Ok(())
    }
}
