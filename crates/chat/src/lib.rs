pub mod engine;
pub mod responses;

pub use engine::{ChatEngine, EngineSettings};
pub use responses::{
    ChatReply, ClientInvoiceRow, ClientRow, InvoiceRows, ProductRow, RecentInvoiceRow,
};
