//! Data models shared between server and clients

pub mod actor;
pub mod checkout;
pub mod order;
pub mod voucher;

pub use actor::{Actor, ActorRole};
pub use checkout::{CheckoutRequest, CheckoutResponse};
pub use order::{
    Order, OrderFilter, OrderLine, OrderPage, OrderStatus, PaymentMethod, PaymentStatus,
    ShippingInfo, UnknownStatus,
};
pub use voucher::{DiscountType, InapplicableReason, Voucher, VoucherCreate, VoucherQuote};
