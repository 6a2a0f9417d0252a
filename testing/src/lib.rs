//! # todosync Testing
//!
//! Testing utilities and helpers for the todosync architecture.
//!
//! This crate provides:
//! - A fluent Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todosync_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::Add { title: "  ".into() })
//!     .then_state(|state| {
//!         assert!(state.error.is_some());
//!     })
//!     .then_effects(assertions::assert_has_delay_effect)
//!     .run();
//! ```

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};
