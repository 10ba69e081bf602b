//! Rebuild interaction trees from learner treelogs and render them.
//!
//! Three phases run in sequence: [`domain::RecordParser`] turns the log into
//! records, [`domain::TreeBuilder`] links them into a [`domain::DecisionTree`]
//! and [`application::render()`] writes Graphviz DOT or a text view.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
