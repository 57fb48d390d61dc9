mod push;

pub use push::{
    DeliveryError, IPushTransport, InMemoryPushTransport, RecordedDelivery, WebPushTransport,
};
