//! # Mock Client
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from a
//! queue of scripted responses instead of a running resource. Use it to test code that
//! sits *in front of* an actor (argument validation, output formatting) without touching
//! the file system.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | None (scripted answers) | Real files |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires broken storage) |
//! | **Use Case** | Logic around the client | The resource itself, full system |
//!
//! ```rust,ignore
//! let mut mock = MockClient::<OrderLedger>::new();
//! mock.expect_action()
//!     .return_err(OrderError::OrderNotFound(OrderId(7)));
//!
//! let client = OrderClient::new(mock.client());
//! assert!(client.return_to_courier(OrderId(7)).await.is_err());
//! mock.verify();
//! ```
//!
//! A request that arrives while no expectation is queued panics the mock task, which
//! surfaces in the test as `FrameworkError::ActorDropped`. Requests that must *not*
//! reach the actor are checked with [`MockClient::received`].

use crate::framework::client::ResourceClient;
use crate::framework::message::ResourceRequest;
use crate::framework::resource::ActorResource;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

type Expectations<T> =
    Arc<Mutex<VecDeque<Result<<T as ActorResource>::ActionResult, <T as ActorResource>::Error>>>>;

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorResource> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    received: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorResource> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorResource> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(ResourceRequest { action, respond_to }) = receiver.recv().await {
                received_clone.lock().unwrap().push(format!("{action:?}"));
                let expectation = expectations_clone.lock().unwrap().pop_front();
                match expectation {
                    Some(response) => {
                        let _ = respond_to.send(response);
                    }
                    None => panic!("Unexpected request: {action:?}"),
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            received,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects one more action request.
    pub fn expect_action(&mut self) -> ActionExpectationBuilder<T> {
        ActionExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Debug renderings of every action received so far, in arrival order.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for action expectations.
pub struct ActionExpectationBuilder<T: ActorResource> {
    expectations: Expectations<T>,
}

impl<T: ActorResource> ActionExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, result: T::ActionResult) {
        self.expectations.lock().unwrap().push_back(Ok(result));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: T::Error) {
        self.expectations.lock().unwrap().push_back(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::FrameworkError;
    use async_trait::async_trait;

    struct Counter;

    #[derive(Debug)]
    enum CounterAction {
        Bump,
    }

    #[derive(Debug, thiserror::Error)]
    enum CounterError {
        #[error("overflow")]
        Overflow,
        #[error(transparent)]
        Framework(#[from] FrameworkError),
    }

    #[async_trait]
    impl ActorResource for Counter {
        type Action = CounterAction;
        type ActionResult = u32;
        type Context = ();
        type Error = CounterError;

        async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u32, CounterError> {
            Ok(1)
        }
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Counter>::new();
        mock.expect_action().return_ok(41);
        mock.expect_action().return_err(CounterError::Overflow);

        let client = mock.client();
        assert_eq!(client.perform_action(CounterAction::Bump).await.unwrap(), 41);
        assert!(matches!(
            client.perform_action(CounterAction::Bump).await,
            Err(CounterError::Overflow)
        ));

        mock.verify();
        assert_eq!(mock.received(), vec!["Bump", "Bump"]);
    }

    #[tokio::test]
    async fn test_unexpected_request_surfaces_as_dropped() {
        let mock = MockClient::<Counter>::new();
        let result = mock.client().perform_action(CounterAction::Bump).await;
        assert!(matches!(
            result,
            Err(CounterError::Framework(FrameworkError::ActorDropped))
        ));
    }
}
