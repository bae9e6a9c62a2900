use hotwire_ioc::{Container, Error, RegistrationKind};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

#[derive(Debug)]
struct Thing;

// --- has ---

#[test]
fn test_has_is_false_without_registration() {
  let container = Container::new();
  assert!(!container.has("quux"));
  assert!(container.is_empty());
}

#[test]
fn test_has_is_true_after_registration() {
  let container = Container::new();
  container.register_instance("moose", Thing);

  assert!(container.has("moose"));
  assert_eq!(container.len(), 1);
}

// --- get ---

#[test]
fn test_factory_receives_the_owning_container() {
  let container = Arc::new(Container::new());
  let seen = Arc::new(AtomicBool::new(false));

  let expected = Arc::as_ptr(&container) as usize;
  let seen_in_factory = Arc::clone(&seen);
  container.register("i", move |c: &Container| {
    seen_in_factory.store(c as *const Container as usize == expected, Ordering::SeqCst);
    Thing
  });

  container.get::<Thing>("i").unwrap();
  assert!(seen.load(Ordering::SeqCst));
}

#[test]
fn test_factory_creates_new_instances() {
  let container = Container::new();
  container.register("i", |_: &Container| Thing);

  let t1 = container.get::<Thing>("i").unwrap();
  let t2 = container.get::<Thing>("i").unwrap();

  // Ensure it's a factory by checking the pointers are different.
  assert!(!Arc::ptr_eq(&t1, &t2));
}

#[test]
fn test_singleton_factory_receives_the_owning_container() {
  let container = Arc::new(Container::new());
  let seen = Arc::new(AtomicBool::new(false));

  let expected = Arc::as_ptr(&container) as usize;
  let seen_in_factory = Arc::clone(&seen);
  container.register_singleton("i", move |c: &Container| {
    seen_in_factory.store(c as *const Container as usize == expected, Ordering::SeqCst);
    Thing
  });

  container.get::<Thing>("i").unwrap();
  assert!(seen.load(Ordering::SeqCst));
}

#[test]
fn test_singleton_factory_returns_same_instance() {
  let container = Container::new();
  container.register_singleton("s", |_: &Container| Thing);

  let t1 = container.get::<Thing>("s").unwrap();
  let t2 = container.get::<Thing>("s").unwrap();

  // Ensure it's a singleton by checking pointer equality.
  assert!(Arc::ptr_eq(&t1, &t2));
}

#[test]
fn test_singleton_instance_returns_same_instance() {
  let container = Container::new();
  container.register_instance("s", Thing);

  let t1 = container.get::<Thing>("s").unwrap();
  let t2 = container.get::<Thing>("s").unwrap();

  assert!(Arc::ptr_eq(&t1, &t2));
}

#[test]
fn test_shared_instance_is_returned_as_is() {
  let container = Container::new();
  let thing = Arc::new(Thing);
  container.register_instance_trait("s", Arc::clone(&thing));

  assert!(Arc::ptr_eq(&container.get::<Thing>("s").unwrap(), &thing));
}

#[test]
fn test_singleton_producer_runs_once_across_access_modes() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);

  let container = Container::new();
  container.register_singleton("s", |_: &Container| {
    CALLS.fetch_add(1, Ordering::SeqCst);
    Thing
  });
  assert_eq!(CALLS.load(Ordering::SeqCst), 0);

  let lazy = container.lazy::<Thing>("s").unwrap();
  let t1 = lazy.get().unwrap();
  let t2 = container.get::<Thing>("s").unwrap();
  let t3 = lazy.get().unwrap();

  assert!(Arc::ptr_eq(&t1, &t2));
  assert!(Arc::ptr_eq(&t2, &t3));
  assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

// --- lazy ---

#[test]
fn test_lazy_factory_does_not_instantiate_until_invoked() {
  let called = Arc::new(AtomicBool::new(false));
  let container = Container::new();
  container.register("lazy", {
    let called = Arc::clone(&called);
    move |_: &Container| {
      called.store(true, Ordering::SeqCst);
      Thing
    }
  });

  let lazy = container.lazy::<Thing>("lazy").unwrap();

  assert!(!called.load(Ordering::SeqCst));
  lazy.get().unwrap();
  assert!(called.load(Ordering::SeqCst));
}

#[test]
fn test_lazy_factory_returns_same_instance() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);

  let container = Container::new();
  container.register("lazy", |_: &Container| {
    CALLS.fetch_add(1, Ordering::SeqCst);
    Thing
  });

  let lazy = container.lazy::<Thing>("lazy").unwrap();
  let t1 = lazy.get().unwrap();
  let t2 = lazy.get().unwrap();

  assert!(Arc::ptr_eq(&t1, &t2));
  assert_eq!(CALLS.load(Ordering::SeqCst), 1);

  // The registration itself is still a factory.
  assert!(!Arc::ptr_eq(&t1, &container.get::<Thing>("lazy").unwrap()));
}

#[test]
fn test_lazy_over_instance_returns_the_instance() {
  let container = Container::new();
  container.register_instance("s", Thing);

  let lazy = container.lazy::<Thing>("s").unwrap();

  assert!(Arc::ptr_eq(&lazy.get().unwrap(), &container.get::<Thing>("s").unwrap()));
}

// --- factory ---

#[test]
fn test_factory_creates_different_instances() {
  let container = Container::new();
  container.register("factory", |_: &Container| Thing);

  let factory = container.factory::<Thing>("factory").unwrap();
  let t1 = factory.get().unwrap();
  let t2 = factory.get().unwrap();

  assert!(!Arc::ptr_eq(&t1, &t2));
}

#[test]
fn test_factory_fails_for_singleton_registrations() {
  let container = Container::new();
  container.register_instance("f1", Thing);
  container.register_singleton("f2", |_: &Container| Thing);

  assert_eq!(
    container.factory::<Thing>("f1").unwrap_err(),
    Error::UnsupportedOperation {
      key: "f1".to_string(),
      kind: RegistrationKind::Instance,
    }
  );
  assert_eq!(
    container.factory::<Thing>("f2").unwrap_err(),
    Error::UnsupportedOperation {
      key: "f2".to_string(),
      kind: RegistrationKind::Deferred,
    }
  );
}

// --- missing keys ---

#[test]
fn test_every_access_mode_fails_on_missing_key() {
  let container = Container::new();
  let missing = Error::RegistrationNotFound {
    key: "nope".to_string(),
  };

  assert_eq!(container.get::<Thing>("nope").unwrap_err(), missing);
  assert_eq!(container.lazy::<Thing>("nope").unwrap_err(), missing);
  assert_eq!(container.factory::<Thing>("nope").unwrap_err(), missing);
  assert_eq!(missing.to_string(), "No registration found for key 'nope'");
}
