//! Shared test utilities for moc-db unit tests.
