mod flights;
mod health;

pub use flights::batch_handler;
pub use health::health_handler;
