pub mod headers;
pub mod packet;
