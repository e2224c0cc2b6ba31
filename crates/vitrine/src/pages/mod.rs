//! Page abstractions of the storefront and its back-office.
//!
//! Each page keeps its element roles in a `roles` module and wraps a
//! [`PageContext`](crate::page_object::PageContext) borrowed from the
//! scenario that created it.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod login;
pub mod product_detail;
pub mod shop;

pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use login::LoginPage;
pub use product_detail::ProductDetailPage;
pub use shop::ShopPage;
