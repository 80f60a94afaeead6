mod static_platform;

pub use static_platform::StaticPlatform;
