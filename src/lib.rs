#![deny(missing_docs)]
//! An embeddable FTP server library for Rust
//!
//! easyftp serves a single sandboxed directory over RFC 959 plus the FEAT,
//! OPTS UTF8, EPSV, EPRT, SIZE, MDTM and REST extensions. It authenticates
//! clients against one configured credential and confines every file
//! operation to the configured root directory.
//!
//! The library is meant to be embedded: the hosting application owns
//! configuration, persistence and process-wide logging, and only talks to
//! the [`Server`] handle.
//!
//! # Quick Start
//!
//! ```no_run
//! let server = easyftp::Server::new(std::env::temp_dir());
//! server.set_credentials("admin", "123456");
//! server.set_port("2121");
//! server.start().unwrap();
//! // ...
//! server.stop().unwrap();
//! ```

pub(crate) mod server;
pub(crate) mod storage;

pub use crate::server::error::ServerError;
pub use crate::server::Server;
