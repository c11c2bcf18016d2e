mod infill_optimizer;

pub(crate) use infill_optimizer::*;
