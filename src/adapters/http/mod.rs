// HTTP/1.1 surface: one request per connection, `Connection: close`.

pub mod page;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use server::HttpServer;
