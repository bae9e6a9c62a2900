//! # Hotwire IoC
//!
//! A small, string-keyed Inversion of Control (IoC) container for Rust.
//!
//! Services are registered under a name together with a strategy that says
//! how and when they are produced, and resolved by that name later on. The
//! container never inspects the services themselves; it only decides when a
//! producer runs and how many times.
//!
//! ## Core Concepts
//!
//! - **Container**: The registry. It is an ordinary value owned by whoever
//!   creates it and handed to every producer, so services can resolve their
//!   own dependencies from it. There is no global instance.
//! - **Strategies**: A *factory* (`register`) builds a fresh service on every
//!   resolution, a *singleton* (`register_singleton`) builds it once on first
//!   resolution, and an *instance* (`register_instance`) is built up front.
//! - **Access modes**: `get` resolves now, `lazy` hands back a [`Lazy`] that
//!   resolves on first use and caches, and `factory` hands back a [`Factory`]
//!   that builds a fresh service on every call.
//!
//! ## Quick Start
//!
//! ```
//! use hotwire_ioc::{resolve, Container, Error};
//! use std::sync::Arc;
//!
//! struct Mailer {
//!   sender: String,
//! }
//!
//! struct Request {
//!   mailer: Arc<Mailer>,
//! }
//!
//! let container = Container::new();
//! container.register_instance("sender", String::from("noreply@example.com"));
//! container.register_singleton("mailer", |c: &Container| Mailer {
//!   sender: (*resolve!(c, String, "sender")).clone(),
//! });
//! container.register("request", |c: &Container| Request {
//!   mailer: resolve!(c, Mailer, "mailer"),
//! });
//!
//! let first = container.get::<Request>("request").unwrap();
//! let second = container.get::<Request>("request").unwrap();
//! assert!(!Arc::ptr_eq(&first, &second));
//! assert!(Arc::ptr_eq(&first.mailer, &second.mailer));
//! assert_eq!(first.mailer.sender, "noreply@example.com");
//!
//! let requests = container.factory::<Request>("request").unwrap();
//! assert!(!Arc::ptr_eq(&requests.get().unwrap(), &requests.get().unwrap()));
//!
//! assert!(matches!(
//!   container.factory::<Mailer>("mailer"),
//!   Err(Error::UnsupportedOperation { .. })
//! ));
//! ```
//!
//! ## Features
//!
//! - `local`: enables [`LocalContainer`], a single-threaded container that can
//!   hold services which are neither `Send` nor `Sync`.

mod container;
mod core;
mod error;
mod handle;
#[cfg(feature = "local")]
mod local_container;
mod macros;

pub use crate::core::RegistrationKind;
pub use container::Container;
pub use error::{Error, Result};
pub use handle::{Factory, Lazy};
#[cfg(feature = "local")]
pub use local_container::{LocalContainer, LocalFactory, LocalLazy};
