use hotwire_ioc::{resolve, Container};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  let container = Container::new();

  // --- Singleton Registration ---
  // This producer will only be called ONCE.
  container.register_singleton("singleton_tracker", |_: &Container| {
    println!("Creating SINGLETON RequestTracker...");
    RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }
  });

  // --- Factory Registration ---
  // This producer will be called EVERY time the service is resolved.
  container.register("factory_tracker", |_: &Container| {
    println!("Creating FACTORY RequestTracker...");
    RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }
  });

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(container, RequestTracker, "singleton_tracker");
  let s2 = resolve!(container, RequestTracker, "singleton_tracker");
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert_eq!(s2.id, 0);
  assert!(
    Arc::ptr_eq(&s1, &s2),
    "Singleton instances should be identical"
  );

  println!("\n--- Resolving Factories ---");
  let f1 = resolve!(container, RequestTracker, "factory_tracker");
  let f2 = resolve!(container, RequestTracker, "factory_tracker");
  println!("Factory 1 ID: {}, Factory 2 ID: {}", f1.id, f2.id);
  assert_eq!(f1.id, 1);
  assert_eq!(f2.id, 2);
  assert!(
    !Arc::ptr_eq(&f1, &f2),
    "Factory instances should be different"
  );

  println!("\n--- Lazy view over the factory ---");
  let lazy = container.lazy::<RequestTracker>("factory_tracker").unwrap();
  println!("Nothing created yet; next ID would be {}", ID_COUNTER.load(Ordering::SeqCst));
  let l1 = lazy.get().unwrap();
  let l2 = lazy.get().unwrap();
  println!("Lazy 1 ID: {}, Lazy 2 ID: {}", l1.id, l2.id);
  assert!(Arc::ptr_eq(&l1, &l2), "A lazy handle caches its first value");
}
