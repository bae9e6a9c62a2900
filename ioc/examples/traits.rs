use hotwire_ioc::{resolve, Container};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  let container = Container::new();

  // The container stores the Arc<dyn Logger> it is handed.
  container.register_singleton_trait::<dyn Logger, _>("logger", |_| Arc::new(ConsoleLogger));

  // The ReportService producer resolves its own dependency from the container.
  container.register("reports", |c: &Container| ReportService {
    logger: resolve!(c, trait Logger, "logger"),
  });

  println!("Resolving the high-level service...");
  let reports = container.factory::<ReportService>("reports").unwrap();

  println!("Using two fresh services sharing one logger...");
  let (first, second) = (reports.get().unwrap(), reports.get().unwrap());
  first.generate_report();
  second.generate_report();
  assert!(Arc::ptr_eq(&first.logger, &second.logger));
}
