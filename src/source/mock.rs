//! # Mock Data Source
//!
//! Utilities for testing account actors against a scripted data source.
//!
//! `MockSource` answers `fetch` calls from a queue of expectations, in order. It lets you
//! inject failures that are hard to produce with a real collaborator (timeouts, outages)
//! and then assert that the actor retried, degraded, or recovered as intended.
//!
//! # Example
//! ```ignore
//! let mut mock = MockSource::new();
//! mock.expect_fetch(AccountId(1)).return_err(AccountError::SourceUnavailable("down".into()));
//! mock.expect_fetch(AccountId(1)).return_ok(profile);
//!
//! let system = AccountSystem::with_source(config, mock.source());
//! // ...
//! mock.verify(); // Ensures all expectations were met
//! ```

use crate::account_actor::AccountError;
use crate::model::{AccountId, AccountProfile};
use crate::source::{AccountSource, SharedSource};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Represents one expected `fetch` call and its scripted response.
struct Expectation {
    id: AccountId,
    response: Result<AccountProfile, AccountError>,
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A data source with expectation tracking for fluent testing.
#[derive(Default)]
pub struct MockSource {
    expectations: Expectations,
}

struct ScriptedSource {
    expectations: Expectations,
}

#[async_trait]
impl AccountSource for ScriptedSource {
    async fn fetch(&self, id: AccountId) -> Result<AccountProfile, AccountError> {
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(expectation) if expectation.id == id => expectation.response,
            Some(expectation) => panic!(
                "Unexpected fetch for {}: next expectation is for {}",
                id, expectation.id
            ),
            None => panic!("Unexpected fetch for {}: no expectations left", id),
        }
    }
}

impl MockSource {
    /// Creates a new mock source with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the source for use in tests.
    pub fn source(&self) -> SharedSource {
        Arc::new(ScriptedSource {
            expectations: self.expectations.clone(),
        })
    }

    /// Expects a `fetch` for `id`.
    pub fn expect_fetch(&mut self, id: AccountId) -> FetchExpectationBuilder {
        FetchExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expectations.lock().unwrap().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder for `fetch` expectations.
pub struct FetchExpectationBuilder {
    id: AccountId,
    expectations: Expectations,
}

impl FetchExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, profile: AccountProfile) {
        self.expectations.lock().unwrap().push_back(Expectation {
            id: self.id,
            response: Ok(profile),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: AccountError) {
        self.expectations.lock().unwrap().push_back(Expectation {
            id: self.id,
            response: Err(error),
        });
    }
}
