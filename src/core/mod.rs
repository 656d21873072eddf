pub mod clock;
pub mod fps;
pub mod gpu_context;
pub mod viewport;

pub use clock::Clock;
pub use fps::FpsCounter;
pub use gpu_context::GpuContext;
pub use viewport::Viewport;
