pub mod model;

pub use model::{FormEntry, FormModel};
