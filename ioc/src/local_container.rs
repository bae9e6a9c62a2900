// ioc/src/local_container.rs

//! A single-threaded, non-thread-safe Inversion of Control container.

use crate::core::{type_mismatch, RegistrationKind};
use crate::error::{Error, Result};
use crate::handle::resolution_handle;
use once_cell::unsync::OnceCell;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, debug_span, error, trace};

type LocalErased = Box<dyn Any>;
type LocalProducer = Rc<dyn Fn(&LocalContainer) -> LocalErased>;

// A local, non-thread-safe version of the registration enum.
// It uses `Rc` and `unsync::OnceCell`.
pub(crate) enum LocalRegistration {
  Factory {
    producer: LocalProducer,
  },
  Instance {
    value: LocalErased,
  },
  Deferred {
    producer: LocalProducer,
    cell: OnceCell<LocalErased>,
  },
}

impl LocalRegistration {
  fn deferred(producer: LocalProducer) -> Self {
    LocalRegistration::Deferred {
      producer,
      cell: OnceCell::new(),
    }
  }

  fn kind(&self) -> RegistrationKind {
    match self {
      LocalRegistration::Factory { .. } => RegistrationKind::Factory,
      LocalRegistration::Instance { .. } => RegistrationKind::Instance,
      LocalRegistration::Deferred { .. } => RegistrationKind::Deferred,
    }
  }

  pub(crate) fn invoke<T: ?Sized + Any>(&self, container: &LocalContainer, key: &str) -> Result<Rc<T>> {
    let shared = |value: &LocalErased| {
      value
        .downcast_ref::<Rc<T>>()
        .cloned()
        .ok_or_else(|| type_mismatch::<T>(key))
    };

    match self {
      LocalRegistration::Factory { producer } => producer(container)
        .downcast::<Rc<T>>()
        .map(|rc_in_a_box| *rc_in_a_box)
        .map_err(|_| type_mismatch::<T>(key)),
      LocalRegistration::Instance { value } => shared(value),
      LocalRegistration::Deferred { producer, cell } => match cell.get() {
        Some(value) => {
          trace!("Serving cached deferred instance");
          shared(value)
        }
        None => shared(cell.get_or_init(|| {
          debug!("Running deferred producer");
          producer(container)
        })),
      },
    }
  }

  fn to_lazy(this: &Rc<Self>) -> Rc<Self> {
    match this.as_ref() {
      LocalRegistration::Factory { producer } => Rc::new(LocalRegistration::deferred(Rc::clone(producer))),
      _ => Rc::clone(this),
    }
  }

  fn to_factory(this: &Rc<Self>, key: &str) -> Result<Rc<Self>> {
    match this.as_ref() {
      LocalRegistration::Factory { .. } => Ok(Rc::clone(this)),
      other => {
        let err = Error::UnsupportedOperation {
          key: key.to_owned(),
          kind: other.kind(),
        };
        error!("{}", err);
        Err(err)
      }
    }
  }
}

impl fmt::Debug for LocalRegistration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LocalRegistration::Deferred { cell, .. } => f
        .debug_struct("Deferred")
        .field("instantiated", &cell.get().is_some())
        .finish_non_exhaustive(),
      other => f.debug_struct(&format!("{:?}", other.kind())).finish_non_exhaustive(),
    }
  }
}

fn erase_local<I, F>(producer: F) -> LocalProducer
where
  I: ?Sized + Any,
  F: Fn(&LocalContainer) -> Rc<I> + 'static,
{
  Rc::new(move |container: &LocalContainer| -> LocalErased { Box::new(producer(container)) })
}

/// A single-threaded, non-thread-safe Inversion of Control (IoC) container.
///
/// This container is designed for use cases where thread safety is not required.
/// It uses a standard `HashMap` for storage and `Rc` for shared ownership,
/// which avoids the locking of its thread-safe counterpart.
///
/// A key advantage is that it can store types that are not `Send` or `Sync`.
///
/// # Note on API
///
/// Unlike the thread-safe `Container`, registration methods on
/// `LocalContainer` require a mutable reference (`&mut self`) because `HashMap`
/// does not support interior mutability. Producers only ever see `&self`, so
/// they cannot register while a service is being built.
#[derive(Default)]
pub struct LocalContainer {
  registrations: HashMap<String, Rc<LocalRegistration>>,
}

impl LocalContainer {
  /// Creates a new, empty `LocalContainer`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn insert(&mut self, key: String, registration: LocalRegistration) {
    let kind = registration.kind();
    match self.registrations.insert(key.clone(), Rc::new(registration)) {
      Some(previous) => debug!(
        key = key.as_str(),
        %kind,
        previous = %previous.kind(),
        "Replaced registration"
      ),
      None => debug!(key = key.as_str(), %kind, "Registered"),
    }
  }

  fn find(&self, key: &str) -> Result<Rc<LocalRegistration>> {
    self.registrations.get(key).cloned().ok_or_else(|| {
      let err = Error::RegistrationNotFound {
        key: key.to_owned(),
      };
      error!("{}", err);
      err
    })
  }

  // --- PUBLIC API ---

  // --- Factory Registration ---
  pub fn register<T: Any, F>(&mut self, key: impl Into<String>, producer: F)
  where
    F: Fn(&LocalContainer) -> T + 'static,
  {
    let producer = erase_local(move |c: &LocalContainer| Rc::new(producer(c)));
    self.insert(key.into(), LocalRegistration::Factory { producer });
  }

  pub fn register_trait<I: ?Sized + Any, F>(&mut self, key: impl Into<String>, producer: F)
  where
    F: Fn(&LocalContainer) -> Rc<I> + 'static,
  {
    let producer = erase_local(producer);
    self.insert(key.into(), LocalRegistration::Factory { producer });
  }

  // --- Singleton Registration ---
  pub fn register_singleton<T: Any, F>(&mut self, key: impl Into<String>, producer: F)
  where
    F: Fn(&LocalContainer) -> T + 'static,
  {
    let producer = erase_local(move |c: &LocalContainer| Rc::new(producer(c)));
    self.insert(key.into(), LocalRegistration::deferred(producer));
  }

  pub fn register_singleton_trait<I: ?Sized + Any, F>(&mut self, key: impl Into<String>, producer: F)
  where
    F: Fn(&LocalContainer) -> Rc<I> + 'static,
  {
    self.insert(key.into(), LocalRegistration::deferred(erase_local(producer)));
  }

  // --- Instance Registration ---
  pub fn register_instance<T: Any>(&mut self, key: impl Into<String>, instance: T) {
    self.register_instance_trait(key, Rc::new(instance));
  }

  pub fn register_instance_trait<I: ?Sized + Any>(&mut self, key: impl Into<String>, instance: Rc<I>) {
    let value: LocalErased = Box::new(instance);
    self.insert(key.into(), LocalRegistration::Instance { value });
  }

  // --- Resolution ---

  pub fn has(&self, key: &str) -> bool {
    self.registrations.contains_key(key)
  }

  /// Resolves a service from the container.
  ///
  /// Returns `Rc<T>` on success; fails with the same errors as
  /// [`Container::get`](crate::Container::get).
  pub fn get<T: ?Sized + Any>(&self, key: &str) -> Result<Rc<T>> {
    let span = debug_span!("get", key);
    let _guard = span.enter();

    self.find(key)?.invoke(self, key)
  }

  pub fn lazy<T: ?Sized + Any>(&self, key: &str) -> Result<LocalLazy<'_, T>> {
    let span = debug_span!("lazy", key);
    let _guard = span.enter();

    let registration = LocalRegistration::to_lazy(&self.find(key)?);
    Ok(LocalLazy::new(self, key, registration))
  }

  pub fn factory<T: ?Sized + Any>(&self, key: &str) -> Result<LocalFactory<'_, T>> {
    let span = debug_span!("factory", key);
    let _guard = span.enter();

    let registration = LocalRegistration::to_factory(&self.find(key)?, key)?;
    Ok(LocalFactory::new(self, key, registration))
  }

  // --- Introspection ---

  pub fn kind_of(&self, key: &str) -> Option<RegistrationKind> {
    self.registrations.get(key).map(|registration| registration.kind())
  }

  pub fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.registrations.keys().cloned().collect();
    keys.sort_unstable();
    keys
  }

  pub fn len(&self) -> usize {
    self.registrations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.registrations.is_empty()
  }
}

impl fmt::Debug for LocalContainer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut entries: Vec<_> = self.registrations.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    f.debug_map().entries(entries).finish()
  }
}

resolution_handle! {
  /// The single-threaded counterpart of [`Lazy`](crate::Lazy).
  LocalLazy<LocalContainer, LocalRegistration, Rc> where T: ::std::any::Any
}

resolution_handle! {
  /// The single-threaded counterpart of [`Factory`](crate::Factory).
  LocalFactory<LocalContainer, LocalRegistration, Rc> where T: ::std::any::Any
}
