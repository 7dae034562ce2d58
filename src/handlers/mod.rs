pub(crate) mod scores;
