//! Unit tests for the finding context.
