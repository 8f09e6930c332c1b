mod request;

pub use request::FilterRequest;
