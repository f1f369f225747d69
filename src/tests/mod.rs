//! Internal test modules.
