//! Streaming lexical scanner for GraphQL executable documents.
//!
//! [`scan`] decomposes a byte buffer into semantically tagged tokens and
//! pushes them into a caller-supplied sink, one at a time, without building
//! a tree and without allocating per token. Payloads are views into the
//! caller's buffer; scanner working storage is recycled from a process-wide
//! pool, so repeated scans allocate nothing.
//!
//! # Examples
//!
//! ```rust
//! use gqlmodem::{scan, Token};
//!
//! let document = br#"query Hero($ep: Episode!) { hero(episode: $ep) { name } }"#;
//! let mut fields = 0;
//! scan(document, |sc| {
//!     if sc.token() == Token::Field {
//!         fields += 1;
//!     }
//!     false // keep scanning
//! })
//! .unwrap();
//! assert_eq!(fields, 2);
//! ```

mod block_string;
mod classify;
mod error;
mod expect;
mod pool;
mod scan;
mod token;

pub use error::{Error, ErrorCode};
pub use expect::Expect;
pub use scan::{scan, Scanner};
pub use token::Token;

#[cfg(test)]
mod tests;
