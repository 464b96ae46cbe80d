pub mod config;
pub mod error;
pub mod export;
pub mod interpolate;
pub mod node;
pub mod parser;
pub mod resolver;
pub mod serializer;

pub use config::{FromScalar, JcfConfig, Outcome};
pub use error::JcfError;
pub use interpolate::translate;
pub use node::{Entry, EntryKind, Node};
pub use parser::{parse, parse_file};
pub use resolver::{NodeRef, PathKey, Segment};
