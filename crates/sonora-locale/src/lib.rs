pub mod catalog;
pub mod dictionary;
pub mod template;

pub use catalog::{Catalog, Localizer};
pub use dictionary::{Dictionary, Entry, LoadError, lookup, resolve, resolve_list};
pub use template::{TemplateArgs, apply_template};
