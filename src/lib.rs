pub mod fields;
pub mod form;
pub mod id;
pub mod prelude;
