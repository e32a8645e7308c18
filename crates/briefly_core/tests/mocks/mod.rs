pub mod datastore;
pub mod email;
pub mod metadata;
pub mod summarizer;
