mod product;

pub use product::{Product, ProductData, ProductWithCategory};
