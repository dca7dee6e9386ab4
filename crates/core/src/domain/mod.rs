pub mod catalog;
pub mod invoice;
pub mod tenant;
