//====================================================================

pub mod quad_pipeline;

//====================================================================
