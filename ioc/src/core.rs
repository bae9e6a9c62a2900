//! Core registration strategies shared by the thread-safe container.

use crate::container::Container;
use crate::error::{Error, Result};
use once_cell::sync::OnceCell;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// A type-erased service. Always holds an `Arc<T>` for the registered `T`.
pub(crate) type Erased = Box<dyn Any + Send + Sync>;

/// A producer called with the owning container whenever a value is needed.
pub(crate) type Producer = Arc<dyn Fn(&Container) -> Erased + Send + Sync>;

/// Which strategy a registration uses to produce its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
  /// A fresh value on every resolution.
  Factory,
  /// A value built before registration and returned as-is.
  Instance,
  /// A value built on first resolution and cached from then on.
  Deferred,
}

impl RegistrationKind {
  /// Whether every resolution yields the same value.
  pub fn is_singleton(self) -> bool {
    !matches!(self, RegistrationKind::Factory)
  }
}

impl fmt::Display for RegistrationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      RegistrationKind::Factory => "factory",
      RegistrationKind::Instance => "instance",
      RegistrationKind::Deferred => "deferred instance",
    })
  }
}

pub(crate) enum Registration {
  Factory {
    producer: Producer,
  },
  Instance {
    value: Erased,
  },
  Deferred {
    producer: Producer,
    cell: OnceCell<Erased>,
  },
}

impl Registration {
  pub(crate) fn factory(producer: Producer) -> Self {
    Registration::Factory { producer }
  }

  pub(crate) fn instance(value: Erased) -> Self {
    Registration::Instance { value }
  }

  pub(crate) fn deferred(producer: Producer) -> Self {
    Registration::Deferred {
      producer,
      cell: OnceCell::new(),
    }
  }

  pub(crate) fn kind(&self) -> RegistrationKind {
    match self {
      Registration::Factory { .. } => RegistrationKind::Factory,
      Registration::Instance { .. } => RegistrationKind::Instance,
      Registration::Deferred { .. } => RegistrationKind::Deferred,
    }
  }

  /// Produces (or returns the cached) value for this registration.
  pub(crate) fn invoke<T: ?Sized + Any + Send + Sync>(
    &self,
    container: &Container,
    key: &str,
  ) -> Result<Arc<T>> {
    match self {
      Registration::Factory { producer } => producer(container)
        .downcast::<Arc<T>>()
        .map(|arc_in_a_box| *arc_in_a_box)
        .map_err(|_| type_mismatch::<T>(key)),
      Registration::Instance { value } => downcast_shared(value, key),
      Registration::Deferred { producer, cell } => {
        let value = match cell.get() {
          Some(value) => {
            trace!("Serving cached deferred instance");
            value
          }
          // `get_or_init` blocks concurrent callers until the winner is done,
          // so the producer still runs at most once.
          None => cell.get_or_init(|| {
            debug!("Running deferred producer");
            producer(container)
          }),
        };
        downcast_shared(value, key)
      }
    }
  }

  /// A view of `this` that defers production and caches the first result.
  ///
  /// A factory is wrapped in a new, uninstantiated deferred registration
  /// sharing the same producer. Instances and deferred instances are already
  /// lazy, so the same registration (and its cache) is returned.
  pub(crate) fn to_lazy(this: &Arc<Self>) -> Arc<Self> {
    match this.as_ref() {
      Registration::Factory { producer } => Arc::new(Registration::deferred(Arc::clone(producer))),
      Registration::Instance { .. } | Registration::Deferred { .. } => Arc::clone(this),
    }
  }

  /// A view of `this` that yields a fresh value on every invocation.
  pub(crate) fn to_factory(this: &Arc<Self>, key: &str) -> Result<Arc<Self>> {
    match this.as_ref() {
      Registration::Factory { .. } => Ok(Arc::clone(this)),
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

impl fmt::Debug for Registration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Registration::Deferred { cell, .. } => f
        .debug_struct("Deferred")
        .field("instantiated", &cell.get().is_some())
        .finish_non_exhaustive(),
      other => f.debug_struct(&format!("{:?}", other.kind())).finish_non_exhaustive(),
    }
  }
}

/// Wraps a typed producer into an erased one.
pub(crate) fn erase_producer<I, F>(producer: F) -> Producer
where
  I: ?Sized + Any + Send + Sync,
  F: Fn(&Container) -> Arc<I> + Send + Sync + 'static,
{
  Arc::new(move |container: &Container| -> Erased { Box::new(producer(container)) })
}

fn downcast_shared<T: ?Sized + Any + Send + Sync>(value: &Erased, key: &str) -> Result<Arc<T>> {
  value
    .downcast_ref::<Arc<T>>()
    .cloned()
    .ok_or_else(|| type_mismatch::<T>(key))
}

pub(crate) fn type_mismatch<T: ?Sized>(key: &str) -> Error {
  let err = Error::TypeMismatch {
    key: key.to_owned(),
    expected: type_name::<T>(),
  };
  error!("{}", err);
  err
}
