//! # usaddr — US postal address parsing
//!
//! This crate splits a raw US address string into tokens and labels each
//! token with its address component (house number, street name, city, state,
//! ZIP code, ...) using a linear-chain conditional random field.
//!
//! ## Architecture
//!
//! The system is a linear pipeline; data flows through it one stage at a
//! time and no stage holds mutable state across calls:
//!
//! 1. **Tokenization** ([`tokenizer`]): the input string is split into
//!    tokens, preserving byte offsets into the original text.
//! 2. **Feature extraction** ([`features`]): each token becomes a sparse
//!    vector of named features (shape, lexicon membership, context window).
//! 3. **Decoding** ([`viterbi`] over [`crf`] scores): the highest-scoring
//!    label sequence is found by dynamic programming, one label per token.
//! 4. **Assembly** ([`parser`]): labels are zipped back onto tokens, or
//!    grouped into ordered components with an address classification.
//!
//! The only loaded state is the immutable [`ParserModel`], shared read-only
//! across threads for the life of the process.
//!
//! ## Example
//!
//! ```rust
//! use usaddr::{AddressParser, AddressType};
//!
//! let parser = AddressParser::new();
//!
//! // token-level view
//! for tagged in parser.parse("123 Main St, Springfield, IL 62704") {
//!     println!("{} -> {}", tagged.token.text, tagged.label);
//! }
//!
//! // grouped view
//! let tagged = parser.tag("123 Main St, Springfield, IL 62704").unwrap();
//! assert_eq!(tagged.get("PlaceName"), Some("Springfield"));
//! assert_eq!(tagged.address_type, AddressType::StreetAddress);
//! ```
//!
//! One-off callers can use the crate-level [`parse`] and [`tag`] functions,
//! which share a lazily initialized process-wide parser. Set the
//! `USADDR_MODEL_PATH` environment variable to point the default parser at
//! a model artifact on disk instead of the built-in weights.

pub mod crf;
pub mod error;
pub mod features;
pub mod labels;
pub mod lexicon;
pub mod model;
pub mod parser;
pub mod tokenizer;
pub mod viterbi;

pub use error::{ModelError, ParseError};
pub use labels::{AddressLabel, TaggedToken};
pub use model::{ParserModel, MODEL_VERSION};
pub use parser::{
    parse, tag, AddressComponent, AddressParser, AddressType, TaggedAddress, MODEL_PATH_ENV,
};
pub use tokenizer::{tokenize, Token};
