pub mod advisory;
pub mod decision;
pub mod request;
