pub mod packet;
pub mod stream;
