//! Loading of the two source collections: case counts and municipal shapes.

mod cases;
mod shapes;

pub use cases::*;
pub use shapes::*;
