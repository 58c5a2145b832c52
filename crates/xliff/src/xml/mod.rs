//! The XML codec: streaming reader, ordered writer and the namespace
//! bookkeeping they share.

mod namespaces;
mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;
