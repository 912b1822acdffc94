//! Parse `.env` files into a map of variables.
//!
//! Each line is handled on its own: blank lines, `#` comments and lines
//! without `=` are skipped, an optional `export ` prefix is stripped, and the
//! value is read according to its quoting:
//!
//! - `"double"` values are unescaped, then `$NAME` / `${NAME}` references are
//!   expanded;
//! - `'single'` values are taken verbatim;
//! - `` `backtick` `` values are raw literals: backslashes are kept and no
//!   expansion happens. This is intentional and differs from shells;
//! - unquoted values lose any inline `# comment` and are expanded.
//!
//! References resolve against keys defined earlier in the same input, then
//! against a [`VarSource`] (the process environment unless one is passed in),
//! and otherwise expand to an empty string.
//!
//! [`EnvLoader`] builds on the parser to merge several files and apply them to
//! a [`TargetEnv`].

mod env;
mod error;
mod expand;
mod loader;
mod model;
mod parser;
mod quote;
mod serialize;

pub use env::{EmptyEnv, ProcessEnv, TargetEnv, VarSource};
pub use error::{Error, UnquoteError};
pub use loader::{EnvLoader, dotenv, from_path};
pub use model::LoadReport;
pub use parser::{
    EnvMap, parse, parse_file, parse_file_with, parse_str, parse_str_with, parse_with,
};
pub use serialize::{to_string, write};
