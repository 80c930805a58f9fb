mod attribute;

pub use attribute::{Attribute, Attributes};
