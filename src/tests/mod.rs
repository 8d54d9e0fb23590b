//! Scenario tests for the planner, run against the public library API.
