mod builder;
mod container;
mod definition;
mod naming;
mod post_processor;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use definition::{BeanDefinition, BeanDescriptor, BoxedBean, Scope, SharedBean};
pub use naming::GENERATED_NAME_SEPARATOR;
pub use post_processor::BeanPostProcessor;
