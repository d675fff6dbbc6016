pub mod feeds;
pub mod generate;
pub mod legacy;
pub mod reference;
