mod readers;

pub use readers::open_text_reader;
