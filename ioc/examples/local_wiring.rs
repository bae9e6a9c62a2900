use hotwire_ioc::LocalContainer;
use std::cell::RefCell;
use std::rc::Rc;

// A service holding single-threaded shared state.
struct Journal {
  entries: RefCell<Vec<String>>,
}

struct Clerk {
  journal: Rc<Journal>,
}

impl Clerk {
  fn record(&self, entry: &str) {
    self.journal.entries.borrow_mut().push(entry.to_string());
  }
}

fn main() {
  let mut container = LocalContainer::new();

  container.register_singleton("journal", |_: &LocalContainer| Journal {
    entries: RefCell::new(Vec::new()),
  });
  container.register("clerk", |c: &LocalContainer| Clerk {
    journal: c.get::<Journal>("journal").expect("journal is registered"),
  });

  let clerks = container.factory::<Clerk>("clerk").unwrap();
  clerks.get().unwrap().record("opened");
  clerks.get().unwrap().record("closed");

  let journal = container.get::<Journal>("journal").unwrap();
  println!("Journal: {:?}", journal.entries.borrow());
  assert_eq!(journal.entries.borrow().len(), 2);
  println!("{container:?}");
}
