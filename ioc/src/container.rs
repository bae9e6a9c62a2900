//! The main `Container` struct and its associated methods.

use crate::core::{erase_producer, Erased, Registration, RegistrationKind};
use crate::error::{Error, Result};
use crate::handle::{Factory, Lazy};
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, debug_span, error};

/// The Inversion of Control (IoC) container.
///
/// Holds one registration per string key. It is thread-safe: services can be
/// registered and resolved from any thread through a shared reference, and a
/// singleton's producer runs at most once even under concurrent first access.
///
/// Producers receive the container they are registered in, so a service can
/// resolve its own dependencies while it is being built.
///
/// ```
/// use hotwire_ioc::Container;
/// use std::sync::Arc;
///
/// struct Config {
///   url: String,
/// }
///
/// struct Database {
///   url: String,
/// }
///
/// let container = Container::new();
/// container.register_instance("config", Config { url: "sqlite::memory:".into() });
/// container.register_singleton("db", |c: &Container| {
///   let config = c.get::<Config>("config").unwrap();
///   Database { url: config.url.clone() }
/// });
///
/// let db = container.get::<Database>("db").unwrap();
/// assert_eq!(db.url, "sqlite::memory:");
/// assert!(Arc::ptr_eq(&db, &container.get::<Database>("db").unwrap()));
/// ```
#[derive(Default)]
pub struct Container {
  registrations: DashMap<String, Arc<Registration>>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, key: String, registration: Registration) {
    let kind = registration.kind();
    match self.registrations.insert(key.clone(), Arc::new(registration)) {
      Some(previous) => debug!(
        key = key.as_str(),
        %kind,
        previous = %previous.kind(),
        "Replaced registration"
      ),
      None => debug!(key = key.as_str(), %kind, "Registered"),
    }
  }

  /// Looks a registration up and releases the map guard before returning,
  /// so producers are free to touch the container.
  fn find(&self, key: &str) -> Result<Arc<Registration>> {
    match self.registrations.get(key) {
      Some(entry) => Ok(Arc::clone(entry.value())),
      None => {
        let err = Error::RegistrationNotFound {
          key: key.to_owned(),
        };
        error!("{}", err);
        Err(err)
      }
    }
  }

  // --- PUBLIC API ---

  // --- Factory Registration ---

  /// Registers a producer that runs on every resolution of `key`.
  ///
  /// Any previous registration under `key` is replaced.
  pub fn register<T, F>(&self, key: impl Into<String>, producer: F)
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> T + Send + Sync + 'static,
  {
    let producer = erase_producer(move |c: &Container| Arc::new(producer(c)));
    self.insert(key.into(), Registration::factory(producer));
  }

  /// Like [`register`](Self::register), for producers of trait objects.
  pub fn register_trait<I, F>(&self, key: impl Into<String>, producer: F)
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Container) -> Arc<I> + Send + Sync + 'static,
  {
    self.insert(key.into(), Registration::factory(erase_producer(producer)));
  }

  // --- Singleton Registration ---

  /// Registers a producer that runs once, on the first resolution of `key`.
  /// Every resolution after that returns the same value.
  pub fn register_singleton<T, F>(&self, key: impl Into<String>, producer: F)
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> T + Send + Sync + 'static,
  {
    let producer = erase_producer(move |c: &Container| Arc::new(producer(c)));
    self.insert(key.into(), Registration::deferred(producer));
  }

  /// Like [`register_singleton`](Self::register_singleton), for producers of
  /// trait objects.
  pub fn register_singleton_trait<I, F>(&self, key: impl Into<String>, producer: F)
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Container) -> Arc<I> + Send + Sync + 'static,
  {
    self.insert(key.into(), Registration::deferred(erase_producer(producer)));
  }

  // --- Instance Registration ---

  /// Registers an already-built value. Every resolution returns it.
  pub fn register_instance<T: Any + Send + Sync>(&self, key: impl Into<String>, instance: T) {
    self.register_instance_trait(key, Arc::new(instance));
  }

  /// Registers an already-shared value, which may be a trait object.
  pub fn register_instance_trait<I: ?Sized + Any + Send + Sync>(
    &self,
    key: impl Into<String>,
    instance: Arc<I>,
  ) {
    let value: Erased = Box::new(instance);
    self.insert(key.into(), Registration::instance(value));
  }

  // --- Resolution ---

  /// Returns `true` if anything is registered under `key`.
  pub fn has(&self, key: &str) -> bool {
    self.registrations.contains_key(key)
  }

  /// Resolves the service registered under `key`.
  ///
  /// # Errors
  ///
  /// [`Error::RegistrationNotFound`] if nothing is registered under `key`,
  /// [`Error::TypeMismatch`] if the service is not a `T`.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
    let span = debug_span!("get", key);
    let _guard = span.enter();

    self.find(key)?.invoke(self, key)
  }

  /// Returns a handle that resolves `key` when first asked to and caches the
  /// result. Nothing is produced by this call.
  ///
  /// For a factory registration the handle owns its own cache, separate from
  /// the container. For singletons it shares the singleton's value.
  ///
  /// # Errors
  ///
  /// [`Error::RegistrationNotFound`] if nothing is registered under `key`.
  pub fn lazy<T: ?Sized + Any + Send + Sync>(&self, key: &str) -> Result<Lazy<'_, T>> {
    let span = debug_span!("lazy", key);
    let _guard = span.enter();

    let registration = Registration::to_lazy(&self.find(key)?);
    Ok(Lazy::new(self, key, registration))
  }

  /// Returns a handle that produces a fresh service on every call.
  ///
  /// # Errors
  ///
  /// [`Error::RegistrationNotFound`] if nothing is registered under `key`,
  /// [`Error::UnsupportedOperation`] if `key` is backed by an instance or a
  /// singleton, which have no repeatable producer.
  pub fn factory<T: ?Sized + Any + Send + Sync>(&self, key: &str) -> Result<Factory<'_, T>> {
    let span = debug_span!("factory", key);
    let _guard = span.enter();

    let registration = Registration::to_factory(&self.find(key)?, key)?;
    Ok(Factory::new(self, key, registration))
  }

  // --- Introspection ---

  /// The strategy registered under `key`, if any.
  pub fn kind_of(&self, key: &str) -> Option<RegistrationKind> {
    self.registrations.get(key).map(|entry| entry.value().kind())
  }

  /// All registered keys, sorted.
  pub fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.registrations.iter().map(|entry| entry.key().clone()).collect();
    keys.sort_unstable();
    keys
  }

  /// The number of registered keys.
  pub fn len(&self) -> usize {
    self.registrations.len()
  }

  /// Returns `true` if nothing has been registered yet.
  pub fn is_empty(&self) -> bool {
    self.registrations.is_empty()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut entries: Vec<(String, Arc<Registration>)> = self
      .registrations
      .iter()
      .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
      .collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    f.debug_map()
      .entries(entries.iter().map(|(key, registration)| (key, registration)))
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tracing_test::traced_test;

  #[test]
  #[traced_test]
  fn logs_registration_and_replacement() {
    let container = Container::new();
    container.register("svc", |_: &Container| 1_u32);
    container.register_instance("svc", 2_u32);

    assert!(logs_contain("Registered"));
    assert!(logs_contain("Replaced registration"));
    assert_eq!(container.kind_of("svc"), Some(RegistrationKind::Instance));
  }

  #[test]
  #[traced_test]
  fn logs_missing_registration() {
    let container = Container::new();

    let err = container.get::<u32>("absent").unwrap_err();

    assert_eq!(err.key(), "absent");
    assert!(logs_contain("No registration found for key 'absent'"));
  }

  #[test]
  #[traced_test]
  fn logs_deferred_producer_once() {
    let container = Container::new();
    container.register_singleton("svc", |_: &Container| String::from("built"));

    container.get::<String>("svc").unwrap();
    container.get::<String>("svc").unwrap();

    logs_assert(|lines: &[&str]| {
      match lines.iter().filter(|line| line.contains("Running deferred producer")).count() {
        1 => Ok(()),
        n => Err(format!("expected one producer run, saw {n}")),
      }
    });
  }

  #[test]
  fn debug_lists_keys_with_their_strategy() {
    let container = Container::new();
    container.register_instance("b", 1_u8);
    container.register("a", |_: &Container| 1_u8);

    assert_eq!(
      format!("{container:?}"),
      r#"{"a": Factory { .. }, "b": Instance { .. }}"#
    );
  }

  #[test]
  fn container_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Container>();
  }
}
