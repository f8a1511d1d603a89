//! Mock GraphQL endpoint hosted on a runtime shared across BDD steps.

use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockBuilder, MockServer};

/// Runtime handle that steps can clone out of a `Slot`.
#[derive(Clone)]
pub struct StepRuntime(Rc<RefCell<Runtime>>);

impl StepRuntime {
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

/// Starts the runtime and mock server on first use and returns the runtime.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created.
pub fn start_endpoint(
    runtime: &Slot<StepRuntime>,
    server: &Slot<MockServer>,
) -> io::Result<StepRuntime> {
    let shared = match runtime.get() {
        Some(shared) => shared,
        None => {
            let shared = StepRuntime(Rc::new(RefCell::new(Runtime::new()?)));
            runtime.set(shared.clone());
            shared
        }
    };

    if server.with_ref(|_| ()).is_none() {
        server.set(shared.block_on(MockServer::start()));
    }
    Ok(shared)
}

/// Matcher for the lookup query request.
pub fn graphql_post() -> MockBuilder {
    Mock::given(method("POST")).and(path("/graphql"))
}

/// Mounts `mocks` on the endpoint, starting it if needed.
///
/// # Errors
///
/// Returns an error if the endpoint cannot be started.
pub fn mount(
    runtime: &Slot<StepRuntime>,
    server: &Slot<MockServer>,
    mocks: impl IntoIterator<Item = Mock>,
) -> io::Result<()> {
    let shared = start_endpoint(runtime, server)?;
    server
        .with_ref(|server| {
            for mock in mocks {
                shared.block_on(mock.mount(server));
            }
        })
        .ok_or_else(|| io::Error::other("mock server not initialised"))
}
