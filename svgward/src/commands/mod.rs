pub mod validate;
pub mod whitelist;
