//! Deferred resolution handles returned by `lazy` and `factory`.

use crate::container::Container;
use crate::core::Registration;
use std::sync::Arc;

// Generates a handle type bound to a container and a derived registration,
// along with its zero-argument call surface.
macro_rules! resolution_handle {
  (
    $(#[$meta:meta])*
    $name:ident<$container:ty, $registration:ty, $ptr:ident>
    where T: $($bound:tt)+
  ) => {
    $(#[$meta])*
    pub struct $name<'c, T: ?Sized> {
      container: &'c $container,
      key: String,
      registration: $ptr<$registration>,
      _marker: ::std::marker::PhantomData<fn() -> $ptr<T>>,
    }

    impl<'c, T: ?Sized + $($bound)+> $name<'c, T> {
      pub(crate) fn new(container: &'c $container, key: &str, registration: $ptr<$registration>) -> Self {
        Self {
          container,
          key: key.to_owned(),
          registration,
          _marker: ::std::marker::PhantomData,
        }
      }

      /// Resolves the service.
      ///
      /// # Errors
      ///
      /// [`Error::TypeMismatch`](crate::Error::TypeMismatch) if the produced
      /// service is not a `T`.
      pub fn get(&self) -> $crate::Result<$ptr<T>> {
        self.registration.invoke(self.container, &self.key)
      }

      /// Converts the handle into a plain closure.
      pub fn into_fn(self) -> impl Fn() -> $crate::Result<$ptr<T>> + 'c {
        move || self.get()
      }
    }

    impl<'c, T: ?Sized> $name<'c, T> {
      /// The key this handle resolves.
      pub fn key(&self) -> &str {
        &self.key
      }
    }

    impl<'c, T: ?Sized> Clone for $name<'c, T> {
      fn clone(&self) -> Self {
        Self {
          container: self.container,
          key: self.key.clone(),
          registration: $ptr::clone(&self.registration),
          _marker: ::std::marker::PhantomData,
        }
      }
    }

    impl<'c, T: ?Sized> ::std::fmt::Debug for $name<'c, T> {
      fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        f.debug_struct(stringify!($name))
          .field("key", &self.key)
          .field("registration", &self.registration)
          .finish()
      }
    }
  };
}

#[cfg(feature = "local")]
pub(crate) use resolution_handle;

resolution_handle! {
  /// A handle that resolves its service on first use and caches the result.
  ///
  /// Returned by [`Container::lazy`]. Clones share the cache. When the key is
  /// backed by a singleton, the cache is the singleton itself.
  ///
  /// ```
  /// use hotwire_ioc::Container;
  /// use std::sync::Arc;
  ///
  /// let container = Container::new();
  /// container.register("report", |_: &Container| vec![1, 2, 3]);
  ///
  /// let report = container.lazy::<Vec<i32>>("report").unwrap();
  /// let first = report.get().unwrap();
  /// assert!(Arc::ptr_eq(&first, &report.get().unwrap()));
  /// ```
  Lazy<Container, Registration, Arc> where T: ::std::any::Any + Send + Sync
}

resolution_handle! {
  /// A handle that produces a fresh service every time it is called.
  ///
  /// Returned by [`Container::factory`], which only succeeds for keys
  /// registered with [`Container::register`] or [`Container::register_trait`].
  Factory<Container, Registration, Arc> where T: ::std::any::Any + Send + Sync
}
