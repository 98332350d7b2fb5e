//! Description of the Rust side of a binding.

mod class;
mod descriptor;
mod registry;

pub use self::{
    class::{HostClass, HostType},
    descriptor::{
        Accessor, EnumDescriptor, Invoker, Marker, MethodDescriptor, Parameter,
        PropertyDescriptor, TypeDescriptor,
    },
    registry::{LookupError, RegistrationError, TypeDescriptorRegistry},
};
