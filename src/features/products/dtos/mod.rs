mod product_dto;
mod product_input;

pub use product_dto::{
    PaginationView, ProductDetailDto, ProductListQuery, ProductResponseDto, ProductSearchQuery,
};
pub use product_input::{ProductInput, UploadedImage};
