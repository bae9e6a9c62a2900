use hotwire_ioc::{resolve, Container, Error};
use std::panic;

struct UnregisteredService;

fn main() {
  let container = Container::new();

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service that was never registered...");

  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    // This line will panic!
    let _service = resolve!(container, UnregisteredService, "unregistered");
  }));

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `get()` method ---
  println!("\nNow, attempting to resolve using the fallible `get()` method...");

  match container.get::<UnregisteredService>("unregistered") {
    Ok(_) => panic!("Should not have found the service!"),
    Err(err @ Error::RegistrationNotFound { .. }) => println!("Correctly received an error: {err}"),
    Err(err) => panic!("Unexpected error: {err}"),
  }

  // --- Asking a singleton for a factory ---
  container.register_instance("config", String::from("debug=true"));
  match container.factory::<String>("config") {
    Err(err @ Error::UnsupportedOperation { .. }) => println!("Correctly refused: {err}"),
    other => panic!("Unexpected result: {other:?}"),
  }
}
