use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;

/// A typed, in-process service registry. A module that exposes a
/// client for other modules to call registers it once at `init()`
/// time; dependents look it up by trait object type, the same pattern
/// the teacher's `ClientHub` uses to decouple modules from each
/// other's crates while keeping calls in-process and synchronous to
/// call (no RPC serialization).
#[derive(Default)]
pub struct ClientHub {
    // Each entry holds an `Arc<T>` boxed behind `Any`; the outer `Box`
    // is always a concrete, `Sized` `Arc<T>`, which is what makes the
    // downcast in `get` possible even though `T` itself may be a trait
    // object.
    services: DashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ClientHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: ?Sized + Send + Sync + 'static>(&self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), Box::new(service));
    }

    /// # Errors
    ///
    /// Returns [`ClientHubError::NotFound`] if no service of type `T`
    /// has been registered yet.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, ClientHubError> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value().downcast_ref::<Arc<T>>().cloned())
            .ok_or(ClientHubError::NotFound)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientHubError {
    #[error("no service of the requested type has been registered")]
    NotFound,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct EnglishGreeter;
    impl Greeter for EnglishGreeter {
        fn greet(&self) -> String {
            "hello".to_owned()
        }
    }

    #[test]
    fn registers_and_resolves_a_trait_object() {
        let hub = ClientHub::new();
        hub.register::<dyn Greeter>(Arc::new(EnglishGreeter));
        let greeter = hub.get::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn unregistered_type_errors() {
        let hub = ClientHub::new();
        assert!(hub.get::<dyn Greeter>().is_err());
    }
}
