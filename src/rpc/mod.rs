pub mod rest;
pub mod submit;
pub mod wrpc;

pub use rest::RestClient;
pub use submit::SubmitClient;
pub use wrpc::WrpcClient;
