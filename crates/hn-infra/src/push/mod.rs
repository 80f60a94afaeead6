mod channel_messaging;

pub use channel_messaging::ChannelPushMessaging;
