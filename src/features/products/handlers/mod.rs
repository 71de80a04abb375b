pub mod api_handler;
pub mod product_handler;

pub use api_handler::{__path_get_product, __path_list_products, get_product, list_products};
pub use product_handler::{
    create_form, destroy, edit_form, home, index, override_method, show, store, update,
};
