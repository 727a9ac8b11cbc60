//! Common utilities shared by the learners and minimizers.

pub(crate) mod checker;
pub(crate) mod utils;
