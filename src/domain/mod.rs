pub mod cart;
pub mod money;
pub mod order;
pub mod product;
pub mod view;

pub use cart::*;
pub use money::*;
pub use order::*;
pub use product::*;
pub use view::*;
