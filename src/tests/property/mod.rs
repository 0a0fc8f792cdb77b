//! Property-based tests for the bestiary flattener.

mod flatten_props;
