//! Entity models
//!
//! Typed documents for every collection plus their create/update payloads
//! and public-view projections. The store enforces no schema; required
//! fields are validated here at the serialization boundary instead of being
//! optional everywhere.

pub mod serde_helpers;

pub mod category;
pub mod document_type;
pub mod gender;
pub mod order;
pub mod product;
pub mod reception;
pub mod user;

pub use category::{CATEGORY_COLLECTION, Category, CategoryCreate, CategoryUpdate};
pub use document_type::{
    DOCUMENT_TYPE_COLLECTION, DocumentType, DocumentTypeCreate, DocumentTypeUpdate, Operation,
};
pub use gender::{GENDER_COLLECTION, Gender, GenderPublic};
pub use order::{
    ORDER_COLLECTION, ORDER_DETAILS_COLLECTION, Order, OrderChannel, OrderDetail,
    OrderDetailPublic, OrderPublic, OrderStatus, OrderType, PaymentMethod,
};
pub use product::{PRODUCT_COLLECTION, Product, ProductCreate, ProductPublic, ProductUpdate};
pub use reception::{
    RECEPTION_COLLECTION, Reception, ReceptionCreate, ReceptionPublic, ReceptionUpdate,
};
pub use user::{USER_COLLECTION, User, UserPublic, UserToken};

/// Flags stored as 0/1 in documents (`status`, `available`, `verified`)
pub fn flag_enabled(flag: u8) -> bool {
    flag != 0
}

pub(crate) fn default_flag_on() -> u8 {
    1
}
