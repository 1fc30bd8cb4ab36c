// Invoice domain: form decoding, numbering, tax arithmetic, words, storage
// and the HTTP handlers that tie them together.

pub mod form;
pub mod handlers;
pub mod numbering;
pub mod store;
pub mod tax;
pub mod words;
