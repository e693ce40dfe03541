pub mod documents;
pub mod workspace;
