//! Public macros for ergonomic service resolution.

/// Resolves a service from a container, panicking if it cannot be resolved.
///
/// This is the shorthand for reading a service off the container by name,
/// for wiring code where a missing service is a programming error. It works
/// with both `Container` and `LocalContainer`.
///
/// # Panics
///
/// Panics if nothing is registered under the key or the service has a
/// different type. For a non-panicking version, call `get` directly.
///
/// # Examples
///
/// ```
/// use hotwire_ioc::{resolve, Container};
///
/// let container = Container::new();
/// container.register_instance("greeting", String::from("hello"));
///
/// let greeting = resolve!(container, String, "greeting");
/// assert_eq!(*greeting, "hello");
/// ```
///
/// ```
/// use hotwire_ioc::{resolve, Container};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let container = Container::new();
/// container.register_singleton_trait::<dyn Greeter, _>("greeter", |_| Arc::new(EnglishGreeter));
///
/// let greeter = resolve!(container, trait Greeter, "greeter");
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
    // Arm for resolving a trait object: resolve!(container, trait MyTrait, "key")
    ($container:expr, trait $trait_ident:ident, $key:expr) => {
        match $container.get::<dyn $trait_ident>($key) {
            Ok(service) => service,
            Err(err) => panic!(
                "Failed to resolve required trait service {}: {}",
                std::any::type_name::<dyn $trait_ident>(),
                err
            ),
        }
    };

    // Arm for resolving a concrete type: resolve!(container, MyService, "key")
    ($container:expr, $type:ty, $key:expr) => {
        match $container.get::<$type>($key) {
            Ok(service) => service,
            Err(err) => panic!(
                "Failed to resolve required service {}: {}",
                std::any::type_name::<$type>(),
                err
            ),
        }
    };
}
